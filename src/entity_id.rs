use crate::Error;

/// A ledger entity identifier of the form `shard.realm.num`, e.g. `0.0.5139753`.  Topics and
/// accounts are both addressed this way; see [`TopicId`] and [`AccountId`].
#[derive(
    Clone,
    Copy,
    Debug,
    serde_with::DeserializeFromStr,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde_with::SerializeDisplay,
)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl EntityId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl std::str::FromStr for EntityId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut component_i = s.split('.');
        let mut parse_next = || -> Result<u64, Error> {
            let component = component_i
                .next()
                .ok_or_else(|| Error::Malformed("entity id must have the form shard.realm.num".into()))?;
            // u64::from_str accepts a leading '+', which is not part of the entity id syntax.
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::Malformed(
                    format!("entity id component {:?} is not a decimal number", component).into(),
                ));
            }
            // Leading zeros would make distinct strings name the same entity.
            if component.len() > 1 && component.starts_with('0') {
                return Err(Error::Malformed(
                    format!("entity id component {:?} has a leading zero", component).into(),
                ));
            }
            component
                .parse::<u64>()
                .map_err(|_| Error::Malformed("entity id component out of range".into()))
        };
        let shard = parse_next()?;
        let realm = parse_next()?;
        let num = parse_next()?;
        if component_i.next().is_some() {
            return Err(Error::Malformed(
                "entity id must have exactly three components".into(),
            ));
        }
        Ok(Self { shard, realm, num })
    }
}

/// Identifier of the append-only topic backing one DID.  Assigned by the ledger at creation and
/// immutable afterwards.
#[derive(
    Clone,
    Copy,
    Debug,
    derive_more::Deref,
    serde::Deserialize,
    derive_more::Display,
    Eq,
    derive_more::From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct TopicId(EntityId);

impl std::str::FromStr for TopicId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(EntityId::from_str(s)?))
    }
}

/// Identifier of a ledger account, used for the operator that pays for submissions.
#[derive(
    Clone,
    Copy,
    Debug,
    derive_more::Deref,
    serde::Deserialize,
    derive_more::Display,
    Eq,
    derive_more::From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct AccountId(EntityId);

impl std::str::FromStr for AccountId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(EntityId::from_str(s)?))
    }
}
