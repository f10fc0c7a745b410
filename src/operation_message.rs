use crate::{Nonce, Operation, DID};

/// The signed content of a topic message: which DID the operation targets, the operation itself,
/// the client-assigned nonce, and the client's timestamp (informational only; ordering comes from
/// consensus).
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct OperationMessage {
    pub did: DID,
    pub nonce: Nonce,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: time::OffsetDateTime,
    pub operation: Operation,
}

impl OperationMessage {
    /// Wraps the operation with a fresh nonce and the current time.
    pub fn new(did: DID, operation: Operation) -> Self {
        Self {
            did,
            nonce: Nonce::generate(),
            timestamp: crate::now_utc_milliseconds(),
            operation,
        }
    }
}
