use crate::{DIDDocument, Nonce, DID};

/// Key material generated by the registrar on the caller's behalf.  Only returned once, at
/// creation; `Debug` doesn't show the private key.
#[derive(Clone, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDSecret {
    #[serde(rename = "publicKeyMultibase")]
    pub public_key_multibase: String,
    #[serde(rename = "privateKeyHex")]
    pub private_key_hex: String,
}

impl std::fmt::Debug for DIDSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DIDSecret")
            .field("public_key_multibase", &self.public_key_multibase)
            .field("private_key_hex", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DIDState {
    Finished {
        did: DID,
        #[serde(rename = "didDocument")]
        did_document: DIDDocument,
        #[serde(rename = "secret", default, skip_serializing_if = "Option::is_none")]
        secret_o: Option<DIDSecret>,
    },
    /// When the write may have landed (see `Error::Ambiguous`), `did` and `nonce` identify it
    /// for `DIDDriver::reconcile`, and a key generated for a create is returned in `secret`, since
    /// the DID may exist.
    Failed {
        reason: String,
        #[serde(rename = "did", default, skip_serializing_if = "Option::is_none")]
        did_o: Option<DID>,
        #[serde(rename = "nonce", default, skip_serializing_if = "Option::is_none")]
        nonce_o: Option<Nonce>,
        #[serde(rename = "secret", default, skip_serializing_if = "Option::is_none")]
        secret_o: Option<DIDSecret>,
    },
}

/// Outcome of a registrar call.  Write failures are reported here, not as errors.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDRegistrationResult {
    #[serde(rename = "didState")]
    pub did_state: DIDState,
}

impl DIDRegistrationResult {
    pub fn finished(did_document: DIDDocument, secret_o: Option<DIDSecret>) -> Self {
        Self {
            did_state: DIDState::Finished {
                did: did_document.did.clone(),
                did_document,
                secret_o,
            },
        }
    }
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            did_state: DIDState::Failed {
                reason: reason.into(),
                did_o: None,
                nonce_o: None,
                secret_o: None,
            },
        }
    }
    /// A failure whose write may nonetheless have reached consensus.
    pub fn ambiguous(
        reason: impl Into<String>,
        did: DID,
        nonce: Nonce,
        secret_o: Option<DIDSecret>,
    ) -> Self {
        Self {
            did_state: DIDState::Failed {
                reason: reason.into(),
                did_o: Some(did),
                nonce_o: Some(nonce),
                secret_o,
            },
        }
    }
    pub fn is_finished(&self) -> bool {
        matches!(self.did_state, DIDState::Finished { .. })
    }
    pub fn did_document_o(&self) -> Option<&DIDDocument> {
        match &self.did_state {
            DIDState::Finished { did_document, .. } => Some(did_document),
            DIDState::Failed { .. } => None,
        }
    }
    /// The DID and nonce to reconcile, if the failed write may have landed.
    pub fn ambiguous_write_o(&self) -> Option<(&DID, &Nonce)> {
        match &self.did_state {
            DIDState::Failed {
                did_o: Some(did),
                nonce_o: Some(nonce),
                ..
            } => Some((did, nonce)),
            _ => None,
        }
    }
    pub fn failure_reason_o(&self) -> Option<&str> {
        match &self.did_state {
            DIDState::Finished { .. } => None,
            DIDState::Failed { reason, .. } => Some(reason.as_str()),
        }
    }
}
