use crate::{public_key_multibase_decode, public_key_multibase_encode, Error, DID};

pub const ED25519_VERIFICATION_KEY_2020: &str = "Ed25519VerificationKey2020";

#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct VerificationMethod {
    /// Full DID URL, e.g. `did:ledger:testnet:z6Mk..._0.0.1234#did-root-key`.
    pub id: String,
    pub r#type: String,
    pub controller: DID,
    #[serde(rename = "publicKeyMultibase")]
    pub public_key_multibase: String,
}

impl VerificationMethod {
    /// Convenience method for making a well-formed Ed25519VerificationKey2020 entry for a DID document.
    pub fn ed25519_verification_key_2020(
        controller: DID,
        fragment: &str,
        verifying_key: &ed25519_dalek::VerifyingKey,
    ) -> Self {
        Self {
            id: controller.with_fragment(fragment),
            r#type: ED25519_VERIFICATION_KEY_2020.into(),
            controller,
            public_key_multibase: public_key_multibase_encode(verifying_key),
        }
    }
    pub fn verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, Error> {
        public_key_multibase_decode(&self.public_key_multibase)
    }
    pub fn verify(&self, expected_controller: &DID) -> Result<(), Error> {
        if self.controller != *expected_controller {
            return Err(Error::Malformed(
                "VerificationMethod controller does not match expected DID".into(),
            ));
        }
        if expected_controller.absolutize_fragment_ref(&self.id).as_deref() != Some(self.id.as_str()) {
            return Err(Error::Malformed(
                "VerificationMethod id must be a DID URL with a fragment of the controller DID".into(),
            ));
        }
        if self.r#type != ED25519_VERIFICATION_KEY_2020 {
            return Err(Error::Malformed(
                format!("unsupported verification method type {:?}", self.r#type).into(),
            ));
        }
        self.verifying_key()?;
        Ok(())
    }
}
