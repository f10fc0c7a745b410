use crate::{LedgerConfigArgs, OutputArgs, Result};

/// Project a did:ledger DID's topic and print the full projection as JSON: the current document
/// and its metadata, the nonces applied (with their sequence numbers), and every skipped operation
/// along with why it was skipped.  Useful for diagnosing why an update didn't take effect.
#[derive(clap::Parser)]
pub struct DIDLog {
    /// The DID whose topic should be projected.
    pub did: String,
    #[command(flatten)]
    pub ledger_config_args: LedgerConfigArgs,
    #[command(flatten)]
    pub output_args: OutputArgs,
}

impl DIDLog {
    pub async fn handle(self) -> Result<()> {
        use anyhow::Context;
        let did = self
            .did
            .parse::<did_ledger::DID>()
            .with_context(|| format!("invalid DID {:?}", self.did))?;
        let ledger_module = self.ledger_config_args.ledger_module()?;
        let projection = ledger_module.did_driver().project(&did).await?;
        tracing::debug!(
            %did,
            status = %projection.status(),
            skipped_operation_count = projection.skipped_operation_v.len(),
            "projected"
        );

        self.output_args.write_json(&projection)?;
        Ok(())
    }
}
