use crate::{AccountId, Error, Result};

/// DER prefix of a PKCS#8-encoded Ed25519 private key, followed by the 32-byte seed.
const ED25519_PKCS8_DER_PREFIX: &str = "302e020100300506032b657004220420";

/// The fee-paying ledger account on whose behalf writes are submitted.  Its `Debug` output never
/// contains the private key.
#[derive(Clone)]
pub struct Operator {
    pub account_id: AccountId,
    pub signing_key: ed25519_dalek::SigningKey,
}

impl Operator {
    pub fn new(account_id: AccountId, signing_key: ed25519_dalek::SigningKey) -> Self {
        Self {
            account_id,
            signing_key,
        }
    }
    /// Parses the textual credentials as they appear in configuration.  The private key may be
    /// either 32 bytes of hex or DER-encoded hex, with or without a `0x` prefix.
    pub fn from_strs(account_id_str: &str, private_key_str: &str) -> Result<Self> {
        let account_id = account_id_str.parse::<AccountId>()?;
        let signing_key = parse_ed25519_private_key(private_key_str)?;
        Ok(Self::new(account_id, signing_key))
    }
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("account_id", &self.account_id)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

/// Parses an Ed25519 private key given as hex (32-byte seed) or DER-hex (PKCS#8).
pub fn parse_ed25519_private_key(s: &str) -> Result<ed25519_dalek::SigningKey> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s).to_ascii_lowercase();
    let seed_hex = s.strip_prefix(ED25519_PKCS8_DER_PREFIX).unwrap_or(&s);
    let seed_bytes = hex::decode(seed_hex)
        .map_err(|_| Error::Malformed("private key is not valid hex".into()))?;
    let seed = <[u8; ed25519_dalek::SECRET_KEY_LENGTH]>::try_from(seed_bytes.as_slice())
        .map_err(|_| {
            Error::Malformed("Ed25519 private key must be 32 bytes (hex or DER-hex)".into())
        })?;
    Ok(ed25519_dalek::SigningKey::from_bytes(&seed))
}
