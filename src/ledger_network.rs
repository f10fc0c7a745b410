use crate::Error;

/// The ledger network a DID lives on.  The network name is embedded in the DID, so a DID can only
/// be resolved by a driver configured for the same network.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    serde_with::DeserializeFromStr,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde_with::SerializeDisplay,
)]
pub enum LedgerNetwork {
    Mainnet,
    #[default]
    Testnet,
    Previewnet,
}

impl LedgerNetwork {
    pub const VARIANTS: [LedgerNetwork; 3] = [
        LedgerNetwork::Mainnet,
        LedgerNetwork::Testnet,
        LedgerNetwork::Previewnet,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerNetwork::Mainnet => "mainnet",
            LedgerNetwork::Testnet => "testnet",
            LedgerNetwork::Previewnet => "previewnet",
        }
    }
    /// Base URL of the public mirror node serving topic messages for this network.
    pub fn default_mirror_node_url(&self) -> url::Url {
        let s = match self {
            LedgerNetwork::Mainnet => "https://mainnet-public.mirrornode.hedera.com",
            LedgerNetwork::Testnet => "https://testnet.mirrornode.hedera.com",
            LedgerNetwork::Previewnet => "https://previewnet.mirrornode.hedera.com",
        };
        url::Url::parse(s).expect("programmer error: default mirror node URLs are valid")
    }
}

impl std::fmt::Display for LedgerNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LedgerNetwork {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(LedgerNetwork::Mainnet),
            "testnet" => Ok(LedgerNetwork::Testnet),
            "previewnet" => Ok(LedgerNetwork::Previewnet),
            _ => Err(Error::Malformed(
                format!("unrecognized ledger network {:?}", s).into(),
            )),
        }
    }
}
