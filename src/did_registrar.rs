use crate::{
    parse_ed25519_private_key, public_key_multibase_encode, DIDCreateOptions, DIDCreateParams,
    DIDDeactivateOptions, DIDDriver, DIDRegistrationResult, DIDSecret, DIDUpdateOptions, Error,
    Result, DID, DID_METHOD,
};

/// The host-facing registration contract.  Failed writes come back as `didState: failed`; `Err`
/// is reserved for invalid options, and is returned before any ledger call.
#[async_trait::async_trait]
pub trait DIDRegistrar: Send + Sync {
    fn supported_methods(&self) -> &'static [&'static str];
    async fn create(&self, did_create_options: DIDCreateOptions) -> Result<DIDRegistrationResult>;
    async fn update(&self, did_update_options: DIDUpdateOptions) -> Result<DIDRegistrationResult>;
    async fn deactivate(
        &self,
        did_deactivate_options: DIDDeactivateOptions,
    ) -> Result<DIDRegistrationResult>;
}

/// `DIDRegistrar` for `did:ledger` DIDs, backed by a `DIDDriver`.
#[derive(Clone, Debug)]
pub struct LedgerDIDRegistrar {
    did_driver: DIDDriver,
}

impl LedgerDIDRegistrar {
    pub fn new(did_driver: DIDDriver) -> Self {
        Self { did_driver }
    }
    fn parse_did(&self, did_str: &str) -> Result<DID> {
        let did = did_str.parse::<DID>()?;
        if did.network() != self.did_driver.network() {
            return Err(Error::InvalidArgument(
                format!(
                    "{} is on network {}, but this registrar is configured for {}",
                    did,
                    did.network(),
                    self.did_driver.network()
                )
                .into(),
            ));
        }
        Ok(did)
    }
}

/// Converts a write failure into a `failed` state, keeping what's needed to reconcile an
/// ambiguous outcome.
fn failed(what: &str, e: Error, secret_o: Option<DIDSecret>) -> DIDRegistrationResult {
    tracing::warn!("{} failed: {}", what, e);
    let reason = e.to_string();
    match e {
        Error::Ambiguous { did, nonce, .. } => {
            DIDRegistrationResult::ambiguous(reason, did, nonce, secret_o)
        }
        _ => DIDRegistrationResult::failed(reason),
    }
}

#[async_trait::async_trait]
impl DIDRegistrar for LedgerDIDRegistrar {
    fn supported_methods(&self) -> &'static [&'static str] {
        &[DID_METHOD]
    }
    async fn create(&self, did_create_options: DIDCreateOptions) -> Result<DIDRegistrationResult> {
        tracing::debug!(?did_create_options, "registrar create");
        if did_create_options.method != DID_METHOD {
            return Err(Error::InvalidArgument(
                format!(
                    "DID method {:?} is not supported; expected {:?}",
                    did_create_options.method, DID_METHOD
                )
                .into(),
            ));
        }
        if let Some(network) = did_create_options.network_o {
            if network != self.did_driver.network() {
                return Err(Error::InvalidArgument(
                    format!(
                        "network {} requested, but this registrar is configured for {}",
                        network,
                        self.did_driver.network()
                    )
                    .into(),
                ));
            }
        }
        let (root_signing_key, secret_o) = match did_create_options.private_key_hex_o.as_deref() {
            Some(private_key_hex) => (parse_ed25519_private_key(private_key_hex)?, None),
            None => {
                let root_signing_key = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
                let secret = DIDSecret {
                    public_key_multibase: public_key_multibase_encode(
                        &root_signing_key.verifying_key(),
                    ),
                    private_key_hex: hex::encode(root_signing_key.to_bytes()),
                };
                (root_signing_key, Some(secret))
            }
        };
        let did_create_params = DIDCreateParams {
            root_signing_key,
            identifier_o: did_create_options.identifier_o,
            service_v: did_create_options.service_v,
            topic_memo_o: did_create_options.topic_memo_o,
        };
        did_create_params.validate()?;
        match self.did_driver.create(did_create_params).await {
            Ok(did_document) => Ok(DIDRegistrationResult::finished(did_document, secret_o)),
            Err(e) => Ok(failed("create", e, secret_o)),
        }
    }
    async fn update(&self, did_update_options: DIDUpdateOptions) -> Result<DIDRegistrationResult> {
        tracing::debug!(?did_update_options, "registrar update");
        let did = self.parse_did(&did_update_options.did)?;
        let signing_key = parse_ed25519_private_key(&did_update_options.private_key_hex)?;
        if did_update_options.did_document_o.is_some() {
            return Ok(failed(
                "update",
                Error::NotImplemented(
                    "full DID document replacement; submit operations instead".into(),
                ),
                None,
            ));
        }
        if did_update_options.operation_v.is_empty() {
            return Err(Error::InvalidArgument(
                "update options must contain at least one operation".into(),
            ));
        }
        if did_update_options
            .operation_v
            .iter()
            .any(|operation| operation.is_create())
        {
            return Err(Error::InvalidArgument(
                "create is not a valid update operation".into(),
            ));
        }
        match self
            .did_driver
            .update(&did, did_update_options.operation_v, &signing_key)
            .await
        {
            Ok(did_document) => Ok(DIDRegistrationResult::finished(did_document, None)),
            Err(e) => Ok(failed("update", e, None)),
        }
    }
    async fn deactivate(
        &self,
        did_deactivate_options: DIDDeactivateOptions,
    ) -> Result<DIDRegistrationResult> {
        tracing::debug!(?did_deactivate_options, "registrar deactivate");
        let did = self.parse_did(&did_deactivate_options.did)?;
        let signing_key = parse_ed25519_private_key(&did_deactivate_options.private_key_hex)?;
        match self.did_driver.deactivate(&did, &signing_key).await {
            Ok(did_document) => Ok(DIDRegistrationResult::finished(did_document, None)),
            Err(e) => Ok(failed("deactivate", e, None)),
        }
    }
}
