use crate::{DIDDocument, DIDDocumentMetadata, DIDResolutionMetadata};

/// Outcome of resolving a DID.  Exactly one of `did_document_o` and
/// `did_resolution_metadata.error_o` is present.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDResolutionResult {
    /// Serializes as `null` when resolution failed.
    #[serde(rename = "didDocument")]
    pub did_document_o: Option<DIDDocument>,
    /// None when the DID couldn't be parsed, so there is no topic to describe.
    #[serde(
        rename = "didDocumentMetadata",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub did_document_metadata_o: Option<DIDDocumentMetadata>,
    #[serde(rename = "didResolutionMetadata")]
    pub did_resolution_metadata: DIDResolutionMetadata,
}

impl DIDResolutionResult {
    pub fn error(error: &str, message: impl Into<String>) -> Self {
        Self {
            did_document_o: None,
            did_document_metadata_o: None,
            did_resolution_metadata: DIDResolutionMetadata::error(error, message),
        }
    }
    pub fn is_error(&self) -> bool {
        self.did_resolution_metadata.error_o.is_some()
    }
    /// Returns the error code, if resolution failed.
    pub fn error_o(&self) -> Option<&str> {
        self.did_resolution_metadata.error_o.as_deref()
    }
}
