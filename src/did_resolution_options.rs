/// A metadata structure containing properties defined in 7.1.1 DID Resolution Options.
/// This input is REQUIRED, but the structure MAY be empty.
///
/// See <https://www.w3.org/TR/did-1.0/#did-resolution-options>.
#[derive(Clone, Debug, Default, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDResolutionOptions {
    /// The Media Type of the caller's preferred representation of the DID document.  Only
    /// `application/did+ld+json` and `application/did+json` are supported; anything else results
    /// in the `representationNotSupported` error.
    #[serde(rename = "accept", default, skip_serializing_if = "Option::is_none")]
    pub accept_o: Option<String>,
}

impl DIDResolutionOptions {
    pub fn with_accept(accept: impl Into<String>) -> Self {
        Self {
            accept_o: Some(accept.into()),
        }
    }
}
