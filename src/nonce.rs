/// Client-assigned value carried by every operation message.  The projector applies at most one
/// operation per nonce, so resubmitting a message with the same nonce can't apply it twice.
/// A deliberate retry of an operation must use a fresh nonce.
#[derive(
    Clone,
    Debug,
    derive_more::Deref,
    serde::Deserialize,
    derive_more::Display,
    Eq,
    derive_more::From,
    Hash,
    derive_more::Into,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct Nonce(String);

impl Nonce {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Nonce {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
