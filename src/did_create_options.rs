use crate::{LedgerNetwork, Service};

/// Registrar input for creating a DID.
#[derive(Clone, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDCreateOptions {
    /// Must be `ledger`.
    pub method: String,
    /// If present, must match the registrar's network.
    #[serde(rename = "network", default, skip_serializing_if = "Option::is_none")]
    pub network_o: Option<LedgerNetwork>,
    /// Hex-encoded Ed25519 root private key.  If absent, a key is generated and returned as the
    /// registration secret.
    #[serde(
        rename = "privateKeyHex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub private_key_hex_o: Option<String>,
    #[serde(rename = "identifier", default, skip_serializing_if = "Option::is_none")]
    pub identifier_o: Option<String>,
    #[serde(rename = "services", default, skip_serializing_if = "Vec::is_empty")]
    pub service_v: Vec<Service>,
    #[serde(rename = "topicMemo", default, skip_serializing_if = "Option::is_none")]
    pub topic_memo_o: Option<String>,
}

impl DIDCreateOptions {
    pub fn new() -> Self {
        Self {
            method: crate::DID_METHOD.to_string(),
            network_o: None,
            private_key_hex_o: None,
            identifier_o: None,
            service_v: Vec::new(),
            topic_memo_o: None,
        }
    }
}

impl Default for DIDCreateOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DIDCreateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DIDCreateOptions")
            .field("method", &self.method)
            .field("network_o", &self.network_o)
            .field(
                "private_key_hex_o",
                &self.private_key_hex_o.as_ref().map(|_| "<redacted>"),
            )
            .field("identifier_o", &self.identifier_o)
            .field("service_v", &self.service_v)
            .field("topic_memo_o", &self.topic_memo_o)
            .finish()
    }
}
