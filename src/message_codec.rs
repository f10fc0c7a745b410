use base64::Engine;
use ed25519_dalek::{Signer, Verifier};

use crate::{
    public_key_multibase_decode, public_key_multibase_encode, Error, OperationMessage, Result,
    SignedOperation,
};

/// Wire form of a topic message.  `signature` is the base64url (unpadded) Ed25519 signature over
/// the JCS serialization of `message`, made by the key whose `publicKeyMultibase` is `signer`.
#[derive(serde::Deserialize, serde::Serialize)]
struct Envelope {
    message: OperationMessage,
    signer: String,
    signature: String,
}

fn canonical_bytes(message: &OperationMessage) -> Result<Vec<u8>> {
    serde_json_canonicalizer::to_vec(message).map_err(|e| {
        Error::Serialization(
            format!("failed to serialize operation message to canonical JSON: {}", e).into(),
        )
    })
}

/// Produces the topic message payload for the given operation message, signed by signing_key.
/// Ed25519 signatures and JCS are both deterministic, so identical input produces identical bytes.
pub fn encode_operation_message(
    message: &OperationMessage,
    signing_key: &ed25519_dalek::SigningKey,
) -> Result<Vec<u8>> {
    let signature = signing_key.sign(&canonical_bytes(message)?);
    let envelope = Envelope {
        message: message.clone(),
        signer: public_key_multibase_encode(&signing_key.verifying_key()),
        signature: base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature.to_bytes()),
    };
    serde_json_canonicalizer::to_vec(&envelope).map_err(|e| {
        Error::Serialization(format!("failed to serialize message envelope: {}", e).into())
    })
}

/// Parses a topic message payload and verifies its envelope signature.  Fails with
/// `MalformedMessage` if the payload doesn't follow the envelope schema, and with
/// `SignatureInvalid` if the signature doesn't verify against the claimed signer.
pub fn decode_operation_message(payload: &[u8]) -> Result<SignedOperation> {
    let envelope: Envelope = serde_json::from_slice(payload)
        .map_err(|e| Error::MalformedMessage(format!("invalid message envelope: {}", e).into()))?;
    let verifying_key = public_key_multibase_decode(&envelope.signer)
        .map_err(|e| Error::MalformedMessage(format!("invalid signer: {}", e).into()))?;
    let signature_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(envelope.signature.as_bytes())
        .map_err(|_| Error::MalformedMessage("signature is not valid base64url".into()))?;
    let signature = ed25519_dalek::Signature::from_slice(&signature_bytes)
        .map_err(|_| Error::MalformedMessage("signature must be 64 bytes".into()))?;
    verifying_key
        .verify(&canonical_bytes(&envelope.message)?, &signature)
        .map_err(|_| {
            Error::SignatureInvalid("signature does not verify against the claimed signer".into())
        })?;
    Ok(SignedOperation {
        message: envelope.message,
        signer: envelope.signer,
    })
}
