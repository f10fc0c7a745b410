use crate::Result;

/// Ledger connection settings, mapped onto `LedgerModuleConfig`.
#[derive(clap::Args, Debug)]
pub struct LedgerConfigArgs {
    /// The ledger network to read from.  Must match the network named in the DID.
    #[arg(
        name = "network",
        env = "DID_LEDGER_NETWORK",
        long,
        value_name = "NETWORK",
        default_value = "testnet",
        value_parser = parse_network,
    )]
    pub network: did_ledger::LedgerNetwork,
    /// Base URL of the mirror node to read topic messages from.  Defaults to the network's public
    /// mirror node.  If no scheme is given, https is assumed.
    #[arg(
        name = "mirror-node-url",
        env = "DID_LEDGER_MIRROR_NODE_URL",
        long,
        value_name = "URL",
        value_parser = crate::parse_url,
    )]
    pub mirror_node_url_o: Option<url::Url>,
    /// Upper bound in milliseconds on each page read from the mirror node.
    #[arg(
        name = "read-timeout-ms",
        env = "DID_LEDGER_READ_TIMEOUT_MS",
        long,
        value_name = "MILLISECONDS",
        default_value = "10000"
    )]
    pub read_timeout_ms: u64,
    /// Number of topic messages requested per read.
    #[arg(
        name = "page-size",
        env = "DID_LEDGER_PAGE_SIZE",
        long,
        value_name = "COUNT",
        default_value = "100"
    )]
    pub page_size: usize,
}

fn parse_network(s: &str) -> anyhow::Result<did_ledger::LedgerNetwork> {
    Ok(s.parse()?)
}

impl LedgerConfigArgs {
    pub fn ledger_module_config(&self) -> did_ledger::LedgerModuleConfig {
        let mut config = did_ledger::LedgerModuleConfig::new(self.network);
        config.mirror_node_url_o = self.mirror_node_url_o.clone();
        config.timeouts.read = std::time::Duration::from_millis(self.read_timeout_ms);
        config.page_size = self.page_size;
        config
    }
    /// Builds a read-only ledger module which resolves through the mirror node.
    pub fn ledger_module(&self) -> Result<did_ledger::LedgerModule> {
        let config = self.ledger_module_config();
        tracing::debug!(?config, "using ledger config");
        Ok(did_ledger::LedgerModule::with_mirror_node(config)?)
    }
}
