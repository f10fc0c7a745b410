use crate::{Nonce, DID};
use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Already exists: {0}")]
    AlreadyExists(Cow<'static, str>),
    /// The write may or may not have reached consensus, or did but isn't visible yet.  Resolve
    /// the topic (see `DIDDriver::reconcile(did, nonce)`) to find out whether the operation with
    /// this nonce landed.
    #[error("Ambiguous write outcome for nonce {nonce} on {did}: {reason}")]
    Ambiguous {
        did: DID,
        nonce: Nonce,
        reason: Cow<'static, str>,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(Cow<'static, str>),
    #[error("Invalid state: {0}")]
    InvalidState(Cow<'static, str>),
    #[error("Malformed: {0}")]
    Malformed(Cow<'static, str>),
    #[error("Malformed message: {0}")]
    MalformedMessage(Cow<'static, str>),
    #[error("No operator configured; only resolution is possible")]
    NoOperatorConfigured,
    #[error("Not found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("not implemented: {0}")]
    NotImplemented(Cow<'static, str>),
    #[error("Rejected by ledger: {0}")]
    RejectedByLedger(Cow<'static, str>),
    #[error("Serialization error: {0}")]
    Serialization(Cow<'static, str>),
    #[error("Invalid signature: {0}")]
    SignatureInvalid(Cow<'static, str>),
    #[error("Timed out: {0}")]
    Timeout(Cow<'static, str>),
    #[error("Ledger unavailable: {0}")]
    Unavailable(Cow<'static, str>),
}
