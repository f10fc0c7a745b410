use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    encode_operation_message, identifier_for_root_key, public_key_multibase_encode, Confirmation,
    DIDCreateParams, DIDDocument, DIDResolutionMetadata, DIDResolutionResult,
    DIDStatus, DocumentProjector, Error, KeyPurpose, LedgerMessage, LedgerNetwork, LedgerTimeouts,
    LedgerWriter, LogReader, Nonce, Operation, OperationMessage, Projection, Reconciliation,
    Result, Service, TopicId, TopicWriteLocks, DEFAULT_PAGE_SIZE, DEFAULT_TOPIC_MEMO, DID,
    ERROR_NOT_FOUND,
};

/// Resolves DIDs by projecting their topic's operation log, and writes new operations to it.
///
/// Writes to one topic are serialized (project, submit, confirm, re-project all happen under the
/// topic's write lock).  Resolution takes no locks and has no side effects.  Every ledger call is
/// bounded by the driver's `LedgerTimeouts`.  There are no automatic retries: a write whose
/// outcome is unknown fails with `Error::Ambiguous`, and `reconcile` tells whether it landed.
///
/// Cloning is cheap, and clones share the write locks, so `with_timeouts` can be used to make a
/// driver with different bounds for some calls.
#[derive(Clone)]
pub struct DIDDriver {
    network: LedgerNetwork,
    log_reader_a: Arc<dyn LogReader>,
    ledger_writer_o: Option<Arc<dyn LedgerWriter>>,
    topic_write_locks: TopicWriteLocks,
    timeouts: LedgerTimeouts,
    page_size: usize,
}

impl DIDDriver {
    pub fn new(
        network: LedgerNetwork,
        log_reader_a: Arc<dyn LogReader>,
        ledger_writer_o: Option<Arc<dyn LedgerWriter>>,
    ) -> Self {
        Self {
            network,
            log_reader_a,
            ledger_writer_o,
            topic_write_locks: TopicWriteLocks::new(),
            timeouts: LedgerTimeouts::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
    pub fn with_timeouts(mut self, timeouts: LedgerTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
    /// Sets the number of messages requested per read.  Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
    pub fn network(&self) -> LedgerNetwork {
        self.network
    }
    pub fn timeouts(&self) -> &LedgerTimeouts {
        &self.timeouts
    }
    /// Returns true if this driver can write, i.e. an operator was configured.
    pub fn can_write(&self) -> bool {
        self.ledger_writer_o.is_some()
    }

    //
    // Reading
    //

    /// Reads the complete message log of the topic, in consensus order.
    pub async fn read_log(&self, topic_id: &TopicId) -> Result<Vec<LedgerMessage>> {
        let mut ledger_message_v = Vec::new();
        self.for_each_page(topic_id, |page| ledger_message_v.extend_from_slice(page))
            .await?;
        Ok(ledger_message_v)
    }
    /// Projects the DID's topic.  Fails if the topic can't be read, never because of its contents.
    pub async fn project(&self, did: &DID) -> Result<Projection> {
        self.check_network(did)?;
        let mut document_projector = DocumentProjector::new(did.clone());
        self.for_each_page(did.topic_id(), |page| document_projector.apply_all(page))
            .await?;
        Ok(document_projector.finish())
    }
    /// Resolves the DID into its current document.  Never fails: read failures, and topics
    /// without a valid Create, are reported as `notFound` in the resolution metadata.  A
    /// deactivated DID resolves to its frozen document, with `deactivated: true` in the document
    /// metadata.
    pub async fn resolve(&self, did: &DID) -> DIDResolutionResult {
        tracing::trace!(%did, "resolving");
        let projection = match self.project(did).await {
            Ok(projection) => projection,
            Err(e) => {
                tracing::debug!(%did, "resolution failed: {}", e);
                return DIDResolutionResult::error(ERROR_NOT_FOUND, e.to_string());
            }
        };
        match projection.did_document_o {
            Some(did_document) => DIDResolutionResult {
                did_document_o: Some(did_document),
                did_document_metadata_o: Some(projection.did_document_metadata),
                did_resolution_metadata: DIDResolutionMetadata::success(),
            },
            None => DIDResolutionResult {
                did_document_o: None,
                did_document_metadata_o: Some(projection.did_document_metadata),
                did_resolution_metadata: DIDResolutionMetadata::error(
                    ERROR_NOT_FOUND,
                    format!("topic {} holds no valid create operation", did.topic_id()),
                ),
            },
        }
    }
    /// A topic that doesn't exist is `Unresolved`; any other read failure is an error.
    pub async fn status(&self, did: &DID) -> Result<DIDStatus> {
        match self.project(did).await {
            Ok(projection) => Ok(projection.status()),
            Err(Error::NotFound(_)) => Ok(DIDStatus::Unresolved),
            Err(e) => Err(e),
        }
    }
    /// Determines what became of the operation with the given nonce, e.g. after a write failed
    /// with `Error::Ambiguous`.  Never resubmits anything.
    pub async fn reconcile(&self, did: &DID, nonce: &Nonce) -> Result<Reconciliation> {
        let projection = match self.project(did).await {
            Ok(projection) => projection,
            Err(Error::NotFound(_)) => return Ok(Reconciliation::Absent),
            Err(e) => return Err(e),
        };
        let reconciliation = if let Some(&sequence_number) = projection.applied_nonce_m.get(nonce) {
            Reconciliation::Applied { sequence_number }
        } else if let Some(skipped_operation) = projection.skipped_operation_for_nonce(nonce) {
            Reconciliation::Skipped {
                sequence_number: skipped_operation.sequence_number,
                reason: skipped_operation.reason.clone(),
            }
        } else {
            Reconciliation::Absent
        };
        tracing::debug!(%did, %nonce, ?reconciliation, "reconciled");
        Ok(reconciliation)
    }

    //
    // Writing
    //

    /// Creates a new DID: allocates a topic, submits a Create of the root document (root key as
    /// `#did-root-key` with authentication, assertionMethod, and capabilityInvocation, plus the
    /// given services), waits for consensus, and returns the projected document.
    pub async fn create(&self, did_create_params: DIDCreateParams) -> Result<DIDDocument> {
        let ledger_writer = self.ledger_writer()?;
        did_create_params.validate()?;
        let root_verifying_key = did_create_params.root_signing_key.verifying_key();
        let identifier = did_create_params
            .identifier_o
            .unwrap_or_else(|| identifier_for_root_key(&root_verifying_key));
        let topic_memo = did_create_params
            .topic_memo_o
            .as_deref()
            .unwrap_or(DEFAULT_TOPIC_MEMO);

        let topic_id = bounded(
            self.timeouts.submit,
            "topic creation",
            ledger_writer.create_topic(topic_memo),
        )
        .await?;
        tracing::debug!(%topic_id, "created topic");

        let did = DID::new(self.network, identifier, topic_id)?;
        let service_v = did_create_params
            .service_v
            .into_iter()
            .map(|service| absolutize_service(&did, service))
            .collect::<Result<Vec<_>>>()?;
        let initial_document = DIDDocument::new_root(did.clone(), &root_verifying_key, service_v);
        initial_document.verify()?;

        let _topic_write_guard = self.topic_write_locks.lock(did.topic_id()).await;
        let operation_message = OperationMessage::new(
            did.clone(),
            Operation::Create {
                initial_document,
            },
        );
        let nonce = operation_message.nonce.clone();
        self.submit_and_confirm(
            ledger_writer,
            &operation_message,
            &did_create_params.root_signing_key,
        )
        .await?;

        let did_document = self
            .project_confirmed(&did, std::slice::from_ref(&nonce))
            .await?;
        tracing::info!(%did, "created DID");
        Ok(did_document)
    }
    /// Submits the given operations in order, each as its own signed message, then returns the
    /// projected document.  Valid only for an active DID.  Fails with `Error::InvalidState`
    /// (after submission) if the projection skipped one of the operations; earlier operations of
    /// the batch stay applied.
    pub async fn update(
        &self,
        did: &DID,
        operation_v: Vec<Operation>,
        signing_key: &ed25519_dalek::SigningKey,
    ) -> Result<DIDDocument> {
        let ledger_writer = self.ledger_writer()?;
        if operation_v.is_empty() {
            return Err(Error::InvalidArgument("update requires at least one operation".into()));
        }
        if operation_v.iter().any(Operation::is_create) {
            return Err(Error::InvalidArgument(
                "create is not a valid update operation; use DIDDriver::create".into(),
            ));
        }
        self.check_network(did)?;

        let _topic_write_guard = self.topic_write_locks.lock(did.topic_id()).await;
        let projection = self.project(did).await?;
        let did_document = match (projection.status(), projection.did_document_o.as_ref()) {
            (DIDStatus::Active, Some(did_document)) => did_document,
            (status, _) => {
                return Err(Error::InvalidState(
                    format!("{} is {}; only an active DID can be updated", did, status).into(),
                ));
            }
        };
        let signer = public_key_multibase_encode(&signing_key.verifying_key());
        if !did_document.is_capability_invocation_key(&signer) {
            return Err(Error::InvalidArgument(
                format!("signing key {} is not a capabilityInvocation key of {}", signer, did)
                    .into(),
            ));
        }

        let mut nonce_v = Vec::with_capacity(operation_v.len());
        for operation in operation_v {
            let operation_message = OperationMessage::new(did.clone(), operation);
            nonce_v.push(operation_message.nonce.clone());
            self.submit_and_confirm(ledger_writer, &operation_message, signing_key)
                .await?;
        }

        let did_document = self.project_confirmed(did, &nonce_v).await?;
        tracing::info!(%did, operation_count = nonce_v.len(), "updated DID");
        Ok(did_document)
    }
    /// Adds an Ed25519 verification method.  `id` may be a bare fragment (`#key-1`) or a DID URL
    /// of this DID.
    pub async fn add_verification_method(
        &self,
        did: &DID,
        id: &str,
        verifying_key: &ed25519_dalek::VerifyingKey,
        relationship_v: Vec<KeyPurpose>,
        signing_key: &ed25519_dalek::SigningKey,
    ) -> Result<DIDDocument> {
        let operation = Operation::AddVerificationMethod {
            id: id.to_string(),
            public_key_multibase: public_key_multibase_encode(verifying_key),
            relationship_v,
        };
        self.update(did, vec![operation], signing_key).await
    }
    pub async fn revoke_verification_method(
        &self,
        did: &DID,
        id: &str,
        signing_key: &ed25519_dalek::SigningKey,
    ) -> Result<DIDDocument> {
        let operation = Operation::RevokeVerificationMethod { id: id.to_string() };
        self.update(did, vec![operation], signing_key).await
    }
    pub async fn add_service(
        &self,
        did: &DID,
        service: Service,
        signing_key: &ed25519_dalek::SigningKey,
    ) -> Result<DIDDocument> {
        self.update(did, vec![Operation::AddService { service }], signing_key)
            .await
    }
    pub async fn remove_service(
        &self,
        did: &DID,
        id: &str,
        signing_key: &ed25519_dalek::SigningKey,
    ) -> Result<DIDDocument> {
        let operation = Operation::RemoveService { id: id.to_string() };
        self.update(did, vec![operation], signing_key).await
    }
    /// Deactivates the DID.  Terminal: the returned document is frozen from then on.
    pub async fn deactivate(
        &self,
        did: &DID,
        signing_key: &ed25519_dalek::SigningKey,
    ) -> Result<DIDDocument> {
        let did_document = self
            .update(did, vec![Operation::Deactivate], signing_key)
            .await?;
        tracing::info!(%did, "deactivated DID");
        Ok(did_document)
    }

    //
    // Internals
    //

    fn ledger_writer(&self) -> Result<&dyn LedgerWriter> {
        self.ledger_writer_o
            .as_deref()
            .ok_or(Error::NoOperatorConfigured)
    }
    fn check_network(&self, did: &DID) -> Result<()> {
        if did.network() != self.network {
            return Err(Error::InvalidArgument(
                format!(
                    "{} is on network {}, but this driver is configured for {}",
                    did,
                    did.network(),
                    self.network
                )
                .into(),
            ));
        }
        Ok(())
    }
    /// Reads the topic page by page until an empty page, handing each page to f.  Rejects a log
    /// whose sequence numbers don't strictly increase, rather than reordering it.
    async fn for_each_page(
        &self,
        topic_id: &TopicId,
        mut f: impl FnMut(&[LedgerMessage]),
    ) -> Result<()> {
        let mut after_sequence_number_o: Option<u64> = None;
        loop {
            let page = bounded(
                self.timeouts.read,
                "topic read",
                self.log_reader_a
                    .read_messages(topic_id, after_sequence_number_o, self.page_size),
            )
            .await?;
            let Some(last) = page.last() else {
                return Ok(());
            };
            let mut previous_o = after_sequence_number_o;
            for ledger_message in &page {
                if previous_o.is_some_and(|previous| ledger_message.sequence_number <= previous) {
                    return Err(Error::Unavailable(
                        format!(
                            "inconsistent log for topic {}: sequence number {} follows {}",
                            topic_id,
                            ledger_message.sequence_number,
                            previous_o.unwrap_or_default()
                        )
                        .into(),
                    ));
                }
                previous_o = Some(ledger_message.sequence_number);
            }
            tracing::trace!(%topic_id, message_count = page.len(), "read page");
            after_sequence_number_o = Some(last.sequence_number);
            f(&page);
        }
    }
    /// Re-projects the DID after its operations were confirmed, and returns the document,
    /// provided every one of them was applied.  The operations are on the ledger by now, so a
    /// failed read, or a log that doesn't show them yet (e.g. a lagging mirror node), is reported
    /// as `Error::Ambiguous` rather than as a plain failure.  A skipped operation is an
    /// `Error::InvalidState`.
    async fn project_confirmed(&self, did: &DID, nonce_v: &[Nonce]) -> Result<DIDDocument> {
        let projection = match self.project(did).await {
            Ok(projection) => projection,
            Err(e) => {
                return Err(match nonce_v.last() {
                    Some(nonce) => ambiguous(
                        did,
                        nonce,
                        format!("confirmed, but the topic could not be re-read: {}", e).into(),
                    ),
                    None => e,
                });
            }
        };
        for nonce in nonce_v {
            if projection.contains_nonce(nonce) {
                continue;
            }
            if let Some(skipped_operation) = projection.skipped_operation_for_nonce(nonce) {
                return Err(Error::InvalidState(
                    format!(
                        "operation {} was not applied: {}",
                        nonce, skipped_operation.reason
                    )
                    .into(),
                ));
            }
            return Err(ambiguous(
                did,
                nonce,
                "confirmed, but not yet visible in the topic".into(),
            ));
        }
        projection.did_document_o.ok_or_else(|| {
            Error::InvalidState(format!("{} has no document after a confirmed write", did).into())
        })
    }
    /// Encodes, submits, and waits for confirmation of one operation message.  Once the message
    /// may have left the client, failures other than an explicit rejection become
    /// `Error::Ambiguous`.
    async fn submit_and_confirm(
        &self,
        ledger_writer: &dyn LedgerWriter,
        operation_message: &OperationMessage,
        signing_key: &ed25519_dalek::SigningKey,
    ) -> Result<Confirmation> {
        let topic_id = operation_message.did.topic_id();
        let nonce = &operation_message.nonce;
        let payload = encode_operation_message(operation_message, signing_key)?;
        let operation_name = operation_message.operation.name();
        tracing::debug!(
            %topic_id,
            %nonce,
            operator = %ledger_writer.operator_account_id(),
            "submitting {} ({} bytes)",
            operation_name,
            payload.len()
        );

        let transaction_id = match bounded(
            self.timeouts.submit,
            "message submission",
            ledger_writer.submit_message(topic_id, &payload),
        )
        .await
        {
            Ok(transaction_id) => transaction_id,
            Err(Error::Timeout(reason)) => return Err(ambiguous(&operation_message.did, nonce, reason)),
            Err(e) => return Err(e),
        };

        let confirmation = match bounded(
            self.timeouts.confirmation,
            "confirmation",
            ledger_writer.wait_for_confirmation(&transaction_id),
        )
        .await
        {
            Ok(confirmation) => confirmation,
            Err(Error::RejectedByLedger(reason)) => return Err(Error::RejectedByLedger(reason)),
            Err(e) => return Err(ambiguous(&operation_message.did, nonce, e.to_string().into())),
        };
        if confirmation.topic_id != *topic_id {
            return Err(ambiguous(
                &operation_message.did,
                nonce,
                format!(
                    "confirmation for transaction {} names topic {}",
                    transaction_id, confirmation.topic_id
                )
                .into(),
            ));
        }
        tracing::debug!(
            %topic_id,
            %nonce,
            %transaction_id,
            sequence_number = confirmation.sequence_number,
            "{} reached consensus",
            operation_name
        );
        Ok(confirmation)
    }
}

impl std::fmt::Debug for DIDDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DIDDriver")
            .field("network", &self.network)
            .field("can_write", &self.can_write())
            .field("timeouts", &self.timeouts)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

async fn bounded<T>(
    duration: Duration,
    what: &'static str,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| Error::Timeout(format!("{} did not complete within {:?}", what, duration).into()))?
}

fn ambiguous(did: &DID, nonce: &Nonce, reason: std::borrow::Cow<'static, str>) -> Error {
    tracing::warn!(%did, %nonce, "write outcome is ambiguous: {}", reason);
    Error::Ambiguous {
        did: did.clone(),
        nonce: nonce.clone(),
        reason,
    }
}

fn absolutize_service(did: &DID, mut service: Service) -> Result<Service> {
    service.id = did.absolutize_fragment_ref(&service.id).ok_or_else(|| {
        Error::InvalidArgument(format!("service id {} is not a fragment of {}", service.id, did).into())
    })?;
    Ok(service)
}
