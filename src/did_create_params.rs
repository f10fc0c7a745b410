use std::collections::HashSet;

use crate::{Error, Result, Service};

/// Topic memo used when none is given.
pub const DEFAULT_TOPIC_MEMO: &str = "did:ledger";

/// Inputs to `DIDDriver::create`.
#[derive(Clone, Debug)]
pub struct DIDCreateParams {
    /// Becomes `#did-root-key`, the initial capabilityInvocation key, and signs the Create.
    pub root_signing_key: ed25519_dalek::SigningKey,
    /// The DID's identifier component.  Defaults to the multibase encoding of the root public key.
    pub identifier_o: Option<String>,
    /// Services to list in the initial document.  Ids must be bare fragments (`#hub`), since the
    /// DID isn't known until its topic exists.
    pub service_v: Vec<Service>,
    pub topic_memo_o: Option<String>,
}

impl DIDCreateParams {
    pub fn new(root_signing_key: ed25519_dalek::SigningKey) -> Self {
        Self {
            root_signing_key,
            identifier_o: None,
            service_v: Vec::new(),
            topic_memo_o: None,
        }
    }
    /// Checks everything that doesn't depend on the topic id, so that bad parameters are caught
    /// before any ledger call.  `DIDDriver::create` calls this first.
    pub fn validate(&self) -> Result<()> {
        if let Some(identifier) = self.identifier_o.as_deref() {
            crate::did::validate_identifier(identifier)?;
        }
        let mut fragment_s = HashSet::new();
        for service in &self.service_v {
            let fragment = service
                .id
                .strip_prefix('#')
                .filter(|fragment| !fragment.is_empty())
                .ok_or_else(|| {
                    Error::InvalidArgument(
                        format!(
                            "service id {:?} must be a fragment such as \"#hub\"",
                            service.id
                        )
                        .into(),
                    )
                })?;
            if !fragment_s.insert(fragment) {
                return Err(Error::InvalidArgument(
                    format!("duplicate service id {:?}", service.id).into(),
                ));
            }
        }
        Ok(())
    }
}
