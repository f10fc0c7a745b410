use crate::{DIDDocument, KeyPurpose, Service};

/// A DID operation as carried in a topic message.  Decoding only checks that an operation is
/// well-formed; whether it makes sense against the current DID document is decided by the
/// `DocumentProjector`.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
#[serde(tag = "type")]
pub enum Operation {
    #[serde(rename = "create")]
    Create {
        #[serde(rename = "initialDocument")]
        initial_document: DIDDocument,
    },
    #[serde(rename = "addVerificationMethod")]
    AddVerificationMethod {
        /// Either a bare fragment (`#key-1`) or a full DID URL of the DID being updated.
        id: String,
        #[serde(rename = "publicKeyMultibase")]
        public_key_multibase: String,
        #[serde(rename = "relationships", default)]
        relationship_v: Vec<KeyPurpose>,
    },
    #[serde(rename = "revokeVerificationMethod")]
    RevokeVerificationMethod { id: String },
    #[serde(rename = "addService")]
    AddService { service: Service },
    #[serde(rename = "removeService")]
    RemoveService { id: String },
    #[serde(rename = "deactivate")]
    Deactivate,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create { .. } => "create",
            Operation::AddVerificationMethod { .. } => "addVerificationMethod",
            Operation::RevokeVerificationMethod { .. } => "revokeVerificationMethod",
            Operation::AddService { .. } => "addService",
            Operation::RemoveService { .. } => "removeService",
            Operation::Deactivate => "deactivate",
        }
    }
    pub fn is_create(&self) -> bool {
        matches!(self, Operation::Create { .. })
    }
}
