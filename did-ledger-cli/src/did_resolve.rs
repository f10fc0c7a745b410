use crate::{LedgerConfigArgs, OutputArgs, Result};

/// Resolve a did:ledger DID by reading its topic from the mirror node, and print the DID
/// resolution result as JSON.  Resolution failures are reported in `didResolutionMetadata.error`
/// and cause a nonzero exit status.
#[derive(clap::Parser)]
pub struct DIDResolve {
    /// The DID to resolve, e.g. `did:ledger:testnet:z6MkabcXYZ_0.0.12345`.
    pub did: String,
    /// The representation to request.  Must be `application/did+ld+json` or
    /// `application/did+json` if specified.
    #[arg(name = "accept", long, value_name = "CONTENT_TYPE")]
    pub accept_o: Option<String>,
    #[command(flatten)]
    pub ledger_config_args: LedgerConfigArgs,
    #[command(flatten)]
    pub output_args: OutputArgs,
}

impl DIDResolve {
    pub async fn handle(self) -> Result<()> {
        let ledger_module = self.ledger_config_args.ledger_module()?;
        let did_resolver = ledger_module.did_resolver();

        let did_resolution_options = match self.accept_o {
            Some(accept) => did_ledger::DIDResolutionOptions::with_accept(accept),
            None => did_ledger::DIDResolutionOptions::default(),
        };

        use did_ledger::DIDResolver;
        let did_resolution_result = did_resolver
            .resolve(&self.did, did_resolution_options)
            .await;

        self.output_args.write_json(&did_resolution_result)?;

        if let Some(error) = did_resolution_result.error_o() {
            anyhow::bail!("resolution of {} failed: {}", self.did, error);
        }
        Ok(())
    }
}
