use crate::{
    DIDDriver, DIDResolutionMetadata, DIDResolutionOptions, DIDResolutionResult, DID, DID_METHOD,
    DID_JSON_CONTENT_TYPE, DID_LD_JSON_CONTENT_TYPE, ERROR_INVALID_DID, ERROR_METHOD_NOT_SUPPORTED,
    ERROR_REPRESENTATION_NOT_SUPPORTED,
};

/// The host-facing resolution contract.  Resolution never fails; problems are reported through
/// `didResolutionMetadata.error`.
#[async_trait::async_trait]
pub trait DIDResolver: Send + Sync {
    /// The DID methods this resolver handles, e.g. `["ledger"]`.
    fn supported_methods(&self) -> &'static [&'static str];
    /// True if hosts may cache resolution results.
    fn allows_caching(&self) -> bool;
    async fn resolve(
        &self,
        did_str: &str,
        did_resolution_options: DIDResolutionOptions,
    ) -> DIDResolutionResult;
}

/// `DIDResolver` for `did:ledger` DIDs, backed by a `DIDDriver`.
#[derive(Clone, Debug)]
pub struct LedgerDIDResolver {
    did_driver: DIDDriver,
}

impl LedgerDIDResolver {
    pub fn new(did_driver: DIDDriver) -> Self {
        Self { did_driver }
    }
}

#[async_trait::async_trait]
impl DIDResolver for LedgerDIDResolver {
    fn supported_methods(&self) -> &'static [&'static str] {
        &[DID_METHOD]
    }
    fn allows_caching(&self) -> bool {
        true
    }
    async fn resolve(
        &self,
        did_str: &str,
        did_resolution_options: DIDResolutionOptions,
    ) -> DIDResolutionResult {
        let content_type = match did_resolution_options.accept_o.as_deref() {
            None | Some(DID_LD_JSON_CONTENT_TYPE) => DID_LD_JSON_CONTENT_TYPE,
            Some(DID_JSON_CONTENT_TYPE) => DID_JSON_CONTENT_TYPE,
            Some(accept) => {
                return DIDResolutionResult::error(
                    ERROR_REPRESENTATION_NOT_SUPPORTED,
                    format!("representation {:?} is not supported", accept),
                );
            }
        };
        match did_method_o(did_str) {
            None => {
                return DIDResolutionResult::error(
                    ERROR_INVALID_DID,
                    format!("{:?} is not a DID", did_str),
                );
            }
            Some(method) if method != DID_METHOD => {
                return DIDResolutionResult::error(
                    ERROR_METHOD_NOT_SUPPORTED,
                    format!("DID method {:?} is not supported", method),
                );
            }
            Some(_) => {}
        }
        let did = match did_str.parse::<DID>() {
            Ok(did) => did,
            Err(e) => {
                return DIDResolutionResult::error(ERROR_INVALID_DID, e.to_string());
            }
        };
        let mut did_resolution_result = self.did_driver.resolve(&did).await;
        if !did_resolution_result.is_error() {
            did_resolution_result.did_resolution_metadata = DIDResolutionMetadata {
                content_type_o: Some(content_type.to_string()),
                ..DIDResolutionMetadata::success()
            };
        }
        did_resolution_result
    }
}

/// Returns the method component of something shaped like `did:<method>:...`.
fn did_method_o(did_str: &str) -> Option<&str> {
    let rest = did_str.strip_prefix("did:")?;
    let (method, method_specific_id) = rest.split_once(':')?;
    if method.is_empty() || method_specific_id.is_empty() {
        return None;
    }
    Some(method)
}
