use std::collections::HashSet;

use crate::{Error, KeyPurpose, Service, VerificationMethod, DID};

pub const DID_CORE_CONTEXT: &str = "https://www.w3.org/ns/did/v1";
pub const ED25519_2020_CONTEXT: &str = "https://w3id.org/security/suites/ed25519-2020/v1";
/// Fragment of the verification method holding the key that created the DID.
pub const ROOT_KEY_FRAGMENT: &str = "did-root-key";

/// The data model for DID documents of this method.  A DID document is never edited directly;
/// it is derived by projecting the operation log of the DID's topic (see `DocumentProjector`).
///
/// All collections are ordered vectors, so that serializing the same projection twice yields
/// byte-identical output.  Use [`DIDDocument::serialize_canonically`] when the bytes matter,
/// since serde_json does not produce canonical JSON.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDDocument {
    #[serde(rename = "@context")]
    pub context_v: Vec<String>,
    /// The serde-rename to "id" is intentional.  The DID spec mandates the field name "id", but the
    /// field value does have to be a DID.
    #[serde(rename = "id")]
    pub did: DID,
    #[serde(rename = "verificationMethod", default)]
    pub verification_method_v: Vec<VerificationMethod>,
    #[serde(rename = "authentication", default)]
    pub authentication_v: Vec<String>,
    #[serde(rename = "assertionMethod", default)]
    pub assertion_method_v: Vec<String>,
    #[serde(rename = "keyAgreement", default)]
    pub key_agreement_v: Vec<String>,
    #[serde(rename = "capabilityInvocation", default)]
    pub capability_invocation_v: Vec<String>,
    #[serde(rename = "capabilityDelegation", default)]
    pub capability_delegation_v: Vec<String>,
    #[serde(rename = "service", default, skip_serializing_if = "Vec::is_empty")]
    pub service_v: Vec<Service>,
}

impl DIDDocument {
    /// Builds the initial DID document for a newly created DID.  The root key is listed under
    /// `#did-root-key` with the authentication, assertionMethod, and capabilityInvocation
    /// relationships; capabilityInvocation is what authorizes later updates.
    pub fn new_root(
        did: DID,
        root_verifying_key: &ed25519_dalek::VerifyingKey,
        service_v: Vec<Service>,
    ) -> Self {
        let root_verification_method = VerificationMethod::ed25519_verification_key_2020(
            did.clone(),
            ROOT_KEY_FRAGMENT,
            root_verifying_key,
        );
        let root_key_id = root_verification_method.id.clone();
        Self {
            context_v: vec![DID_CORE_CONTEXT.into(), ED25519_2020_CONTEXT.into()],
            did,
            verification_method_v: vec![root_verification_method],
            authentication_v: vec![root_key_id.clone()],
            assertion_method_v: vec![root_key_id.clone()],
            key_agreement_v: Vec::new(),
            capability_invocation_v: vec![root_key_id],
            capability_delegation_v: Vec::new(),
            service_v,
        }
    }
    /// Returns the verification method ids listed for the given relationship.
    pub fn relationship_v(&self, key_purpose: KeyPurpose) -> &[String] {
        match key_purpose {
            KeyPurpose::Authentication => self.authentication_v.as_slice(),
            KeyPurpose::AssertionMethod => self.assertion_method_v.as_slice(),
            KeyPurpose::KeyAgreement => self.key_agreement_v.as_slice(),
            KeyPurpose::CapabilityInvocation => self.capability_invocation_v.as_slice(),
            KeyPurpose::CapabilityDelegation => self.capability_delegation_v.as_slice(),
        }
    }
    pub fn relationship_v_mut(&mut self, key_purpose: KeyPurpose) -> &mut Vec<String> {
        match key_purpose {
            KeyPurpose::Authentication => &mut self.authentication_v,
            KeyPurpose::AssertionMethod => &mut self.assertion_method_v,
            KeyPurpose::KeyAgreement => &mut self.key_agreement_v,
            KeyPurpose::CapabilityInvocation => &mut self.capability_invocation_v,
            KeyPurpose::CapabilityDelegation => &mut self.capability_delegation_v,
        }
    }
    pub fn verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.verification_method_v
            .iter()
            .find(|verification_method| verification_method.id == id)
    }
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.service_v.iter().find(|service| service.id == id)
    }
    /// Returns true if the given public key is that of a verification method referenced by the
    /// capabilityInvocation relationship, i.e. a key allowed to sign operations for this DID.
    pub fn is_capability_invocation_key(&self, public_key_multibase: &str) -> bool {
        self.capability_invocation_v.iter().any(|key_id| {
            self.verification_method(key_id)
                .is_some_and(|vm| vm.public_key_multibase == public_key_multibase)
        })
    }
    /// Checks the structural constraints of a DID document of this method: every verification
    /// method and service belongs to this DID, ids are unique, every relationship entry references
    /// a listed verification method (at most once per relationship), and there is at least one capabilityInvocation key.
    pub fn verify(&self) -> Result<(), Error> {
        let mut id_s = HashSet::new();
        for verification_method in &self.verification_method_v {
            verification_method.verify(&self.did)?;
            if !id_s.insert(verification_method.id.as_str()) {
                return Err(Error::Malformed(
                    format!("duplicate verification method id {}", verification_method.id).into(),
                ));
            }
        }
        for key_purpose in KeyPurpose::VARIANTS {
            let mut key_id_s = HashSet::new();
            for key_id in self.relationship_v(key_purpose) {
                if !key_id_s.insert(key_id.as_str()) {
                    return Err(Error::Malformed(
                        format!("{} lists {} more than once", key_purpose, key_id).into(),
                    ));
                }
                if self.verification_method(key_id).is_none() {
                    return Err(Error::Malformed(
                        format!(
                            "{} entry {} does not match any listed verification method",
                            key_purpose, key_id
                        )
                        .into(),
                    ));
                }
            }
        }
        if self.capability_invocation_v.is_empty() {
            return Err(Error::Malformed(
                "DID document must have at least one capabilityInvocation key".into(),
            ));
        }
        let mut service_id_s = HashSet::new();
        for service in &self.service_v {
            if self.did.absolutize_fragment_ref(&service.id).as_deref() != Some(service.id.as_str()) {
                return Err(Error::Malformed(
                    format!("service id {} is not a DID URL of this DID", service.id).into(),
                ));
            }
            if !service_id_s.insert(service.id.as_str()) {
                return Err(Error::Malformed(
                    format!("duplicate service id {}", service.id).into(),
                ));
            }
        }
        Ok(())
    }
    /// This method is what you should use if you want to canonically serialize this DID document (to a String).
    pub fn serialize_canonically(&self) -> Result<String, Error> {
        let did_document_jcs_bytes = serde_json_canonicalizer::to_vec(self).map_err(|e| {
            Error::Serialization(
                format!("failed to serialize DID document to canonical JSON: {}", e).into(),
            )
        })?;
        String::from_utf8(did_document_jcs_bytes).map_err(|_| {
            Error::Serialization("canonical JSON serialization produced invalid UTF-8".into())
        })
    }
}
