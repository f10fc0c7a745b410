use std::collections::BTreeMap;

use crate::{
    decode_operation_message, public_key_multibase_decode, DIDDocument, DIDDocumentMetadata,
    DIDStatus, KeyPurpose, LedgerMessage, Nonce, Operation, SignedOperation, VerificationMethod,
    ED25519_VERIFICATION_KEY_2020, DID,
};

/// A topic message that was not applied to the DID document, and why.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct SkippedOperation {
    #[serde(rename = "sequenceNumber")]
    pub sequence_number: u64,
    /// Present if the message decoded far enough to carry a nonce.
    #[serde(rename = "nonce", default, skip_serializing_if = "Option::is_none")]
    pub nonce_o: Option<Nonce>,
    pub reason: String,
}

/// The result of folding a topic's operation log.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct Projection {
    pub did: DID,
    /// None if no valid Create has been applied.
    #[serde(rename = "didDocument")]
    pub did_document_o: Option<DIDDocument>,
    #[serde(rename = "didDocumentMetadata")]
    pub did_document_metadata: DIDDocumentMetadata,
    #[serde(rename = "skippedOperations")]
    pub skipped_operation_v: Vec<SkippedOperation>,
    /// Nonce of each applied operation, mapped to its sequence number.
    #[serde(rename = "appliedNonces")]
    pub applied_nonce_m: BTreeMap<Nonce, u64>,
}

impl Projection {
    pub fn status(&self) -> DIDStatus {
        if self.did_document_o.is_none() {
            DIDStatus::Unresolved
        } else if self.did_document_metadata.is_deactivated() {
            DIDStatus::Deactivated
        } else {
            DIDStatus::Active
        }
    }
    pub fn contains_nonce(&self, nonce: &Nonce) -> bool {
        self.applied_nonce_m.contains_key(nonce)
    }
    /// Sequence number of the last message applied, if any.  Used to resume reading the topic.
    pub fn last_applied_sequence_number_o(&self) -> Option<u64> {
        self.did_document_metadata.version_id_o
    }
    pub fn skipped_operation_for_nonce(&self, nonce: &Nonce) -> Option<&SkippedOperation> {
        self.skipped_operation_v
            .iter()
            .find(|skipped_operation| skipped_operation.nonce_o.as_ref() == Some(nonce))
    }
}

/// Folds a topic's messages, strictly in ledger order, into the current DID document.  Feeding
/// the same messages in any number of `apply` calls yields the same `Projection`, so the caller
/// can apply each page of the log as it arrives.
///
/// Operations that don't make sense against the current state are skipped and recorded, never
/// fatal.  Once a Deactivate has been applied, every later message is decoded but otherwise
/// ignored, and is not recorded.
#[derive(Clone, Debug)]
pub struct DocumentProjector {
    projection: Projection,
}

impl DocumentProjector {
    pub fn new(did: DID) -> Self {
        let topic_id = did.topic_id().clone();
        Self {
            projection: Projection {
                did,
                did_document_o: None,
                did_document_metadata: DIDDocumentMetadata::empty(topic_id),
                skipped_operation_v: Vec::new(),
                applied_nonce_m: BTreeMap::new(),
            },
        }
    }
    /// The projection as of the messages applied so far.
    pub fn projection(&self) -> &Projection {
        &self.projection
    }
    pub fn apply(&mut self, ledger_message: &LedgerMessage) {
        let sequence_number = ledger_message.sequence_number;
        let signed_operation = match decode_operation_message(&ledger_message.payload) {
            Ok(signed_operation) => signed_operation,
            Err(e) => {
                if !self.projection.did_document_metadata.is_deactivated() {
                    self.skip(sequence_number, None, format!("undecodable message: {}", e));
                }
                return;
            }
        };
        if self.projection.did_document_metadata.is_deactivated() {
            tracing::trace!(
                sequence_number,
                "ignoring operation {} after deactivation",
                signed_operation.message.operation.name()
            );
            return;
        }
        let nonce = signed_operation.message.nonce.clone();
        match self.apply_signed_operation(&signed_operation) {
            Ok(()) => {
                tracing::trace!(
                    sequence_number,
                    nonce = %nonce,
                    "applied operation {}",
                    signed_operation.message.operation.name()
                );
                self.projection
                    .applied_nonce_m
                    .insert(nonce, sequence_number);
                let metadata = &mut self.projection.did_document_metadata;
                if signed_operation.message.operation.is_create() {
                    metadata.created_o = Some(ledger_message.consensus_timestamp);
                } else {
                    metadata.updated_o = Some(ledger_message.consensus_timestamp);
                }
                metadata.version_id_o = Some(sequence_number);
                if matches!(signed_operation.message.operation, Operation::Deactivate) {
                    metadata.deactivated_o = Some(true);
                }
            }
            Err(reason) => self.skip(sequence_number, Some(nonce), reason),
        }
    }
    pub fn apply_all<'a>(&mut self, ledger_message_i: impl IntoIterator<Item = &'a LedgerMessage>) {
        for ledger_message in ledger_message_i {
            self.apply(ledger_message);
        }
    }
    pub fn finish(self) -> Projection {
        self.projection
    }

    fn skip(&mut self, sequence_number: u64, nonce_o: Option<Nonce>, reason: String) {
        tracing::warn!(
            did = %self.projection.did,
            sequence_number,
            "skipping operation: {}",
            reason
        );
        self.projection.skipped_operation_v.push(SkippedOperation {
            sequence_number,
            nonce_o,
            reason,
        });
    }

    /// Applies the operation to the current document, or returns the reason it must be skipped.
    /// The document is only modified if the operation is accepted.
    fn apply_signed_operation(&mut self, signed_operation: &SignedOperation) -> Result<(), String> {
        let message = &signed_operation.message;
        if message.did != self.projection.did {
            return Err(format!("operation targets a different DID ({})", message.did));
        }
        if self.projection.applied_nonce_m.contains_key(&message.nonce) {
            return Err(format!("nonce {} was already applied", message.nonce));
        }
        let did_document = match self.projection.did_document_o.as_mut() {
            Some(did_document) => did_document,
            None => return self.apply_create(signed_operation),
        };
        let did = &self.projection.did;
        if !did_document.is_capability_invocation_key(&signed_operation.signer) {
            return Err(format!(
                "signer {} is not a capabilityInvocation key",
                signed_operation.signer
            ));
        }
        match &message.operation {
            Operation::Create { .. } => {
                return Err("DID was already created".to_string());
            }
            Operation::AddVerificationMethod {
                id,
                public_key_multibase,
                relationship_v,
            } => {
                let id = did
                    .absolutize_fragment_ref(id)
                    .ok_or_else(|| format!("verification method id {} is not a DID URL of this DID", id))?;
                if did_document.verification_method(&id).is_some() {
                    return Err(format!("verification method {} already exists", id));
                }
                public_key_multibase_decode(public_key_multibase)
                    .map_err(|e| format!("malformed key for {}: {}", id, e))?;
                did_document.verification_method_v.push(VerificationMethod {
                    id: id.clone(),
                    r#type: ED25519_VERIFICATION_KEY_2020.to_string(),
                    controller: did.clone(),
                    public_key_multibase: public_key_multibase.clone(),
                });
                for key_purpose in KeyPurpose::VARIANTS {
                    if relationship_v.contains(&key_purpose) {
                        did_document.relationship_v_mut(key_purpose).push(id.clone());
                    }
                }
            }
            Operation::RevokeVerificationMethod { id } => {
                let id = did
                    .absolutize_fragment_ref(id)
                    .ok_or_else(|| format!("verification method id {} is not a DID URL of this DID", id))?;
                if did_document.verification_method(&id).is_none() {
                    return Err(format!("verification method {} does not exist", id));
                }
                if !did_document
                    .capability_invocation_v
                    .iter()
                    .any(|key_id| *key_id != id)
                {
                    return Err(format!(
                        "revoking {} would leave no capabilityInvocation key",
                        id
                    ));
                }
                did_document
                    .verification_method_v
                    .retain(|verification_method| verification_method.id != id);
                for key_purpose in KeyPurpose::VARIANTS {
                    did_document
                        .relationship_v_mut(key_purpose)
                        .retain(|key_id| *key_id != id);
                }
            }
            Operation::AddService { service } => {
                let id = did
                    .absolutize_fragment_ref(&service.id)
                    .ok_or_else(|| format!("service id {} is not a DID URL of this DID", service.id))?;
                if did_document.service(&id).is_some() {
                    return Err(format!("service {} already exists", id));
                }
                let mut service = service.clone();
                service.id = id;
                did_document.service_v.push(service);
            }
            Operation::RemoveService { id } => {
                let id = did
                    .absolutize_fragment_ref(id)
                    .ok_or_else(|| format!("service id {} is not a DID URL of this DID", id))?;
                if did_document.service(&id).is_none() {
                    return Err(format!("service {} does not exist", id));
                }
                did_document.service_v.retain(|service| service.id != id);
            }
            Operation::Deactivate => {}
        }
        Ok(())
    }
    fn apply_create(&mut self, signed_operation: &SignedOperation) -> Result<(), String> {
        let initial_document = match &signed_operation.message.operation {
            Operation::Create { initial_document } => initial_document,
            operation => return Err(format!("{} before create", operation.name())),
        };
        if initial_document.did != self.projection.did {
            return Err(format!(
                "initial document id {} does not match the DID",
                initial_document.did
            ));
        }
        initial_document
            .verify()
            .map_err(|e| format!("invalid initial document: {}", e))?;
        if !initial_document.is_capability_invocation_key(&signed_operation.signer) {
            return Err(
                "create is not signed by a capabilityInvocation key of the initial document"
                    .to_string(),
            );
        }
        self.projection.did_document_o = Some(initial_document.clone());
        Ok(())
    }
}

/// Projects a complete, ordered operation log.  Pure and deterministic.
pub fn project(did: DID, ledger_message_v: &[LedgerMessage]) -> Projection {
    let mut document_projector = DocumentProjector::new(did);
    document_projector.apply_all(ledger_message_v);
    document_projector.finish()
}
