use crate::OperationMessage;

/// A decoded topic message whose envelope signature has been verified against `signer`.
/// Verifying the signature says nothing about whether the signer is allowed to operate on the
/// DID; that is checked during projection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedOperation {
    pub message: OperationMessage,
    /// `publicKeyMultibase` of the key that signed the message.
    pub signer: String,
}
