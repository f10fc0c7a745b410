use crate::{DIDDocument, Operation};

/// Registrar input for updating a DID, either by a list of operations or (unsupported) by a
/// full replacement document.
#[derive(Clone, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDUpdateOptions {
    pub did: String,
    /// Hex-encoded Ed25519 private key of a capabilityInvocation key of the DID.
    #[serde(rename = "privateKeyHex")]
    pub private_key_hex: String,
    #[serde(rename = "operations", default, skip_serializing_if = "Vec::is_empty")]
    pub operation_v: Vec<Operation>,
    /// A complete replacement document.  Not supported by this DID method.
    #[serde(rename = "didDocument", default, skip_serializing_if = "Option::is_none")]
    pub did_document_o: Option<DIDDocument>,
}

impl std::fmt::Debug for DIDUpdateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DIDUpdateOptions")
            .field("did", &self.did)
            .field("private_key_hex", &"<redacted>")
            .field("operation_v", &self.operation_v)
            .field("did_document_o", &self.did_document_o)
            .finish()
    }
}
