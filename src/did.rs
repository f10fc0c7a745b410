use crate::{Error, LedgerNetwork, TopicId};

/// The DID method name handled by this crate.
pub const DID_METHOD: &str = "ledger";

/// A DID of the form `did:ledger:<network>:<identifier>_<topic-id>`, e.g.
/// `did:ledger:testnet:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK_0.0.5139753`.
///
/// The identifier is chosen by the creator (by default the multibase-encoded root public key),
/// and the topic id names the ledger topic holding the DID's operation log.
#[derive(
    Clone,
    Debug,
    serde_with::DeserializeFromStr,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde_with::SerializeDisplay,
)]
pub struct DID {
    network: LedgerNetwork,
    identifier: String,
    topic_id: TopicId,
}

impl DID {
    pub fn new(
        network: LedgerNetwork,
        identifier: impl Into<String>,
        topic_id: TopicId,
    ) -> Result<Self, Error> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;
        Ok(Self {
            network,
            identifier,
            topic_id,
        })
    }
    pub fn network(&self) -> LedgerNetwork {
        self.network
    }
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }
    /// Produces the DID URL `<did>#<fragment>`.
    pub fn with_fragment(&self, fragment: &str) -> String {
        format!("{}#{}", self, fragment)
    }
    /// Resolves a verification method or service id given either as a bare fragment (`#key-1`)
    /// or as a full DID URL into a full DID URL of this DID.  Returns None if the id is a DID URL
    /// of some other DID, or has an empty fragment.
    pub fn absolutize_fragment_ref(&self, id: &str) -> Option<String> {
        if let Some(fragment) = id.strip_prefix('#') {
            if fragment.is_empty() {
                return None;
            }
            return Some(self.with_fragment(fragment));
        }
        let (did_str, fragment) = id.split_once('#')?;
        if fragment.is_empty() || did_str != self.to_string() {
            return None;
        }
        Some(id.to_string())
    }
}

pub(crate) fn validate_identifier(identifier: &str) -> Result<(), Error> {
    if identifier.is_empty() {
        return Err(Error::Malformed("DID identifier must not be empty".into()));
    }
    if !identifier.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(Error::Malformed(
            "DID identifier must be ASCII alphanumeric".into(),
        ));
    }
    Ok(())
}

impl std::fmt::Display for DID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "did:{}:{}:{}_{}",
            DID_METHOD, self.network, self.identifier, self.topic_id
        )
    }
}

impl std::str::FromStr for DID {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(['?', '#', '/']) {
            return Err(Error::Malformed(
                "DID must not contain a path, query, or fragment".into(),
            ));
        }
        let s = s
            .strip_prefix("did:")
            .ok_or_else(|| Error::Malformed("DID must start with \"did:\"".into()))?;
        let (method, s) = s
            .split_once(':')
            .ok_or_else(|| Error::Malformed("DID is missing its method-specific id".into()))?;
        if method != DID_METHOD {
            return Err(Error::Malformed(
                format!("DID method is not {:?}", DID_METHOD).into(),
            ));
        }
        let (network_str, s) = s
            .split_once(':')
            .ok_or_else(|| Error::Malformed("DID is missing its network component".into()))?;
        let network = network_str.parse::<LedgerNetwork>()?;
        let (identifier, topic_id_str) = s.rsplit_once('_').ok_or_else(|| {
            Error::Malformed("DID is missing the '_' delimiter before its topic id".into())
        })?;
        let topic_id = topic_id_str.parse::<TopicId>()?;
        Self::new(network, identifier, topic_id)
    }
}
