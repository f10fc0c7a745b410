/// Registrar input for deactivating a DID.
#[derive(Clone, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDDeactivateOptions {
    pub did: String,
    /// Hex-encoded Ed25519 private key of a capabilityInvocation key of the DID.
    #[serde(rename = "privateKeyHex")]
    pub private_key_hex: String,
}

impl std::fmt::Debug for DIDDeactivateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DIDDeactivateOptions")
            .field("did", &self.did)
            .field("private_key_hex", &"<redacted>")
            .finish()
    }
}
