use crate::{OutputArgs, Result};

/// Key material printed by `key generate`.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedKey {
    private_key_hex: String,
    public_key_multibase: String,
    /// The DID identifier a create operation derives from this key when none is given.
    default_identifier: String,
}

/// Generate an Ed25519 private key and print it as JSON, along with the corresponding public key
/// in multibase form and the default DID identifier derived from it.  The private key is printed
/// in hex, which is accepted by `privateKeyHex` in the registrar options.
#[derive(clap::Args)]
pub struct KeyGenerate {
    #[command(flatten)]
    pub output_args: OutputArgs,
}

impl KeyGenerate {
    pub fn handle(self) -> Result<()> {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();
        let generated_key = GeneratedKey {
            private_key_hex: hex::encode(signing_key.to_bytes()),
            public_key_multibase: did_ledger::public_key_multibase_encode(&verifying_key),
            default_identifier: did_ledger::identifier_for_root_key(&verifying_key),
        };

        self.output_args.write_json(&generated_key)?;

        Ok(())
    }
}
