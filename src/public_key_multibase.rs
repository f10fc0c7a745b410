use crate::Error;

/// Multicodec prefix for an Ed25519 public key (varint encoding of 0xed).
const ED25519_PUB_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// Encodes an Ed25519 public key as `publicKeyMultibase` (base58btc, multicodec-prefixed), as
/// used by the `Ed25519VerificationKey2020` verification method type.
pub fn public_key_multibase_encode(verifying_key: &ed25519_dalek::VerifyingKey) -> String {
    let mut bytes = Vec::with_capacity(ED25519_PUB_MULTICODEC.len() + 32);
    bytes.extend_from_slice(&ED25519_PUB_MULTICODEC);
    bytes.extend_from_slice(verifying_key.as_bytes());
    multibase::encode(multibase::Base::Base58Btc, bytes)
}

/// Inverse of [`public_key_multibase_encode`].  Also checks that the bytes are a valid Ed25519
/// curve point.
pub fn public_key_multibase_decode(
    public_key_multibase: &str,
) -> Result<ed25519_dalek::VerifyingKey, Error> {
    let (base, bytes) = multibase::decode(public_key_multibase)
        .map_err(|e| Error::Malformed(format!("invalid multibase public key: {}", e).into()))?;
    if base != multibase::Base::Base58Btc {
        return Err(Error::Malformed(
            "publicKeyMultibase must use base58btc encoding".into(),
        ));
    }
    let key_bytes = bytes
        .strip_prefix(ED25519_PUB_MULTICODEC.as_slice())
        .ok_or_else(|| Error::Malformed("publicKeyMultibase is not an Ed25519 key".into()))?;
    let key_bytes = <&[u8; 32]>::try_from(key_bytes)
        .map_err(|_| Error::Malformed("Ed25519 public key must be 32 bytes".into()))?;
    ed25519_dalek::VerifyingKey::from_bytes(key_bytes)
        .map_err(|_| Error::Malformed("Ed25519 public key is not a valid curve point".into()))
}

/// The default DID identifier for a DID whose root key is the given key: the base58btc multibase
/// encoding of the raw public key bytes.
pub fn identifier_for_root_key(verifying_key: &ed25519_dalek::VerifyingKey) -> String {
    multibase::encode(multibase::Base::Base58Btc, verifying_key.as_bytes())
}
