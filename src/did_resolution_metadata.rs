/// Media type of a successfully resolved DID document.
pub const DID_LD_JSON_CONTENT_TYPE: &str = "application/did+ld+json";
/// Also acceptable as a requested representation; resolves to the same document.
pub const DID_JSON_CONTENT_TYPE: &str = "application/did+json";

/// Error codes placed in `DIDResolutionMetadata::error_o`.
pub const ERROR_INVALID_DID: &str = "invalidDid";
pub const ERROR_METHOD_NOT_SUPPORTED: &str = "methodNotSupported";
pub const ERROR_NOT_FOUND: &str = "notFound";
pub const ERROR_REPRESENTATION_NOT_SUPPORTED: &str = "representationNotSupported";

/// See <https://www.w3.org/TR/did-1.0/#did-resolution-metadata>.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDResolutionMetadata {
    /// The Media Type of the returned DID document.  Present exactly when resolution succeeded.
    #[serde(
        rename = "contentType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type_o: Option<String>,
    /// The error code from the resolution process, a single keyword ASCII string.  Present
    /// exactly when resolution failed.
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_o: Option<String>,
    /// Human-readable detail accompanying `error_o`.
    #[serde(rename = "message", default, skip_serializing_if = "Option::is_none")]
    pub message_o: Option<String>,
}

impl DIDResolutionMetadata {
    pub fn success() -> Self {
        Self {
            content_type_o: Some(DID_LD_JSON_CONTENT_TYPE.to_string()),
            error_o: None,
            message_o: None,
        }
    }
    pub fn error(error: &str, message: impl Into<String>) -> Self {
        Self {
            content_type_o: None,
            error_o: Some(error.to_string()),
            message_o: Some(message.into()),
        }
    }
}

impl std::fmt::Display for DIDResolutionMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
