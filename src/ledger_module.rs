use std::sync::Arc;

use crate::{
    DIDDriver, Error, LedgerDIDRegistrar, LedgerDIDResolver, LedgerModuleConfig, LedgerWriter,
    LogReader, MirrorNodeLogReader, Operator, Result,
};

/// Wires configuration, ledger access, the driver, and the host adapters together.  Everything
/// is passed in explicitly; nothing is registered globally.
#[derive(Clone, Debug)]
pub struct LedgerModule {
    config: LedgerModuleConfig,
    operator_o: Option<Operator>,
    did_driver: DIDDriver,
    did_resolver_a: Arc<LedgerDIDResolver>,
    did_registrar_a: Arc<LedgerDIDRegistrar>,
}

impl LedgerModule {
    /// Builds the module.  A writer is only used if the config has an operator, and then it must
    /// act for that operator's account.  Fails if the operator credentials don't parse.
    pub fn new(
        config: LedgerModuleConfig,
        log_reader_a: Arc<dyn LogReader>,
        ledger_writer_o: Option<Arc<dyn LedgerWriter>>,
    ) -> Result<Self> {
        let operator_o = config.operator_o()?;
        let ledger_writer_o = match (&operator_o, ledger_writer_o) {
            (Some(operator), Some(ledger_writer_a)) => {
                if ledger_writer_a.operator_account_id() != operator.account_id {
                    return Err(Error::InvalidArgument(
                        format!(
                            "ledger writer acts for account {}, but the configured operator is {}",
                            ledger_writer_a.operator_account_id(),
                            operator.account_id
                        )
                        .into(),
                    ));
                }
                Some(ledger_writer_a)
            }
            (None, Some(_)) => {
                tracing::warn!("no operator configured; ignoring the ledger writer, only resolution is possible");
                None
            }
            (Some(operator), None) => {
                tracing::warn!(
                    operator = %operator.account_id,
                    "operator configured but no ledger writer given; only resolution is possible"
                );
                None
            }
            (None, None) => None,
        };
        tracing::debug!(
            network = %config.network,
            can_write = ledger_writer_o.is_some(),
            "initializing ledger module"
        );
        let did_driver = DIDDriver::new(config.network, log_reader_a, ledger_writer_o)
            .with_timeouts(config.timeouts)
            .with_page_size(config.page_size);
        Ok(Self {
            did_resolver_a: Arc::new(LedgerDIDResolver::new(did_driver.clone())),
            did_registrar_a: Arc::new(LedgerDIDRegistrar::new(did_driver.clone())),
            config,
            operator_o,
            did_driver,
        })
    }
    /// Builds a read-only module which resolves through the configured (or default) mirror node.
    pub fn with_mirror_node(config: LedgerModuleConfig) -> Result<Self> {
        let log_reader_a = Arc::new(MirrorNodeLogReader::new(config.mirror_node_url()));
        Self::new(config, log_reader_a, None)
    }
    pub fn config(&self) -> &LedgerModuleConfig {
        &self.config
    }
    pub fn operator_o(&self) -> Option<&Operator> {
        self.operator_o.as_ref()
    }
    pub fn did_driver(&self) -> &DIDDriver {
        &self.did_driver
    }
    pub fn did_resolver(&self) -> Arc<LedgerDIDResolver> {
        self.did_resolver_a.clone()
    }
    pub fn did_registrar(&self) -> Arc<LedgerDIDRegistrar> {
        self.did_registrar_a.clone()
    }
}
