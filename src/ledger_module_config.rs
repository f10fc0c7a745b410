use crate::{LedgerNetwork, LedgerTimeouts, Operator, Result};

/// Default number of topic messages requested per read.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Operator credentials as they appear in configuration.  `Debug` never shows the private key.
#[derive(Clone, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct OperatorConfig {
    /// Ledger account id, e.g. `0.0.1234`.
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// Ed25519 private key as 32-byte hex or DER-hex.
    #[serde(rename = "privateKey")]
    pub private_key: String,
}

impl OperatorConfig {
    pub fn to_operator(&self) -> Result<Operator> {
        Operator::from_strs(&self.account_id, &self.private_key)
    }
}

impl std::fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("account_id", &self.account_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Configuration of a `LedgerModule`.  Without an operator, only resolution is possible.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct LedgerModuleConfig {
    #[serde(default)]
    pub network: LedgerNetwork,
    #[serde(rename = "operator", default, skip_serializing_if = "Option::is_none")]
    pub operator_o: Option<OperatorConfig>,
    /// Overrides the network's default mirror node.
    #[serde(
        rename = "mirrorNodeUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mirror_node_url_o: Option<url::Url>,
    #[serde(default)]
    pub timeouts: LedgerTimeouts,
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl LedgerModuleConfig {
    pub fn new(network: LedgerNetwork) -> Self {
        Self {
            network,
            operator_o: None,
            mirror_node_url_o: None,
            timeouts: LedgerTimeouts::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
    pub fn with_operator(mut self, account_id: impl Into<String>, private_key: impl Into<String>) -> Self {
        self.operator_o = Some(OperatorConfig {
            account_id: account_id.into(),
            private_key: private_key.into(),
        });
        self
    }
    /// Parses the operator credentials, if configured.
    pub fn operator_o(&self) -> Result<Option<Operator>> {
        self.operator_o
            .as_ref()
            .map(OperatorConfig::to_operator)
            .transpose()
    }
    /// The configured mirror node URL, or the network's default one.
    pub fn mirror_node_url(&self) -> url::Url {
        self.mirror_node_url_o
            .clone()
            .unwrap_or_else(|| self.network.default_mirror_node_url())
    }
}

impl Default for LedgerModuleConfig {
    fn default() -> Self {
        Self::new(LedgerNetwork::default())
    }
}
