use std::{str::FromStr, sync::Arc, time::Duration};

use did_ledger::{
    encode_operation_message, public_key_multibase_encode, AccountId, DIDCreateOptions,
    DIDCreateParams, DIDDeactivateOptions, DIDDocument, DIDRegistrar, DIDResolutionOptions,
    DIDResolver, DIDStatus, DIDUpdateOptions, Error, KeyPurpose, LedgerModule, LedgerModuleConfig,
    LedgerNetwork, LedgerTimeouts, LedgerWriter, Operation, OperationMessage, Reconciliation,
    Service, TopicId, DID, DID_JSON_CONTENT_TYPE, DID_LD_JSON_CONTENT_TYPE, ERROR_INVALID_DID,
    ERROR_METHOD_NOT_SUPPORTED, ERROR_NOT_FOUND, ERROR_REPRESENTATION_NOT_SUPPORTED,
};
use did_ledger_mock::MockLedger;

/// This will run once at load time (i.e. presumably before main function is called).
#[ctor::ctor]
fn overall_init() {
    // Ignore errors, since there may not be a .env file (e.g. in docker image)
    let _ = dotenvy::dotenv();

    // It's necessary to specify EnvFilter::from_default_env in order to use RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();
}

const OPERATOR_ACCOUNT_ID: &str = "0.0.2";

fn operator_private_key_hex() -> String {
    hex::encode([7u8; 32])
}

fn operator_config() -> LedgerModuleConfig {
    LedgerModuleConfig::new(LedgerNetwork::Testnet)
        .with_operator(OPERATOR_ACCOUNT_ID, operator_private_key_hex())
}

fn ledger_module_with_config(mock_ledger: &MockLedger, config: LedgerModuleConfig) -> LedgerModule {
    let ledger_writer_a: Arc<dyn LedgerWriter> = Arc::new(
        mock_ledger.writer(AccountId::from_str(OPERATOR_ACCOUNT_ID).expect("pass")),
    );
    LedgerModule::new(config, Arc::new(mock_ledger.clone()), Some(ledger_writer_a))
        .expect("pass")
}

fn ledger_module(mock_ledger: &MockLedger) -> LedgerModule {
    ledger_module_with_config(mock_ledger, operator_config())
}

fn generate_signing_key() -> ed25519_dalek::SigningKey {
    ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng)
}

async fn create_did(ledger_module: &LedgerModule, root_signing_key: &ed25519_dalek::SigningKey) -> DID {
    let did_document = ledger_module
        .did_driver()
        .create(DIDCreateParams::new(root_signing_key.clone()))
        .await
        .expect("pass");
    did_document.did
}

#[tokio::test]
async fn test_did_lifecycle_through_registrar_and_resolver() {
    let mock_ledger = MockLedger::new();
    let ledger_module = ledger_module(&mock_ledger);
    let did_registrar = ledger_module.did_registrar();
    let did_resolver = ledger_module.did_resolver();

    // Create, letting the registrar generate the root key.
    let did_create_options = DIDCreateOptions {
        service_v: vec![Service {
            id: "#hub".to_string(),
            r#type: "DIDCommMessaging".to_string(),
            service_endpoint: "https://hub.example.com".to_string(),
        }],
        ..DIDCreateOptions::new()
    };
    let registration = did_registrar
        .create(did_create_options)
        .await
        .expect("pass");
    tracing::debug!(
        "registration: {}",
        serde_json::to_string_pretty(&registration).expect("pass")
    );
    assert!(registration.is_finished());
    let created_document = registration.did_document_o().expect("pass").clone();
    let did = created_document.did.clone();
    let secret = match &registration.did_state {
        did_ledger::DIDState::Finished { secret_o, .. } => secret_o.clone().expect("pass"),
        did_ledger::DIDState::Failed { reason, .. } => panic!("create failed: {}", reason),
    };
    assert_eq!(did.network(), LedgerNetwork::Testnet);
    assert_eq!(
        created_document.verification_method_v[0].public_key_multibase,
        secret.public_key_multibase
    );
    assert!(created_document
        .service(&did.with_fragment("hub"))
        .is_some());
    let root_signing_key = did_ledger::parse_ed25519_private_key(&secret.private_key_hex).expect("pass");

    // Resolve.
    let did_resolution_result = did_resolver
        .resolve(&did.to_string(), DIDResolutionOptions::default())
        .await;
    assert!(!did_resolution_result.is_error());
    assert_eq!(
        did_resolution_result.did_document_o.as_ref(),
        Some(&created_document)
    );
    assert_eq!(
        did_resolution_result
            .did_resolution_metadata
            .content_type_o
            .as_deref(),
        Some(DID_LD_JSON_CONTENT_TYPE)
    );
    let did_document_metadata = did_resolution_result
        .did_document_metadata_o
        .as_ref()
        .expect("pass");
    assert!(did_document_metadata.created_o.is_some());
    assert_eq!(did_document_metadata.version_id_o, Some(1));
    assert_eq!(did_document_metadata.deactivated_o, None);

    // Update through the driver.
    let k1 = generate_signing_key();
    let did_document = ledger_module
        .did_driver()
        .add_verification_method(
            &did,
            "#k1",
            &k1.verifying_key(),
            vec![KeyPurpose::Authentication, KeyPurpose::KeyAgreement],
            &root_signing_key,
        )
        .await
        .expect("pass");
    let k1_id = did.with_fragment("k1");
    assert!(did_document.verification_method(&k1_id).is_some());
    assert_eq!(did_document.key_agreement_v, vec![k1_id.clone()]);

    // Update through the registrar.
    let registration = did_registrar
        .update(DIDUpdateOptions {
            did: did.to_string(),
            private_key_hex: secret.private_key_hex.clone(),
            operation_v: vec![Operation::RemoveService {
                id: "#hub".to_string(),
            }],
            did_document_o: None,
        })
        .await
        .expect("pass");
    assert!(registration.is_finished());
    assert!(registration
        .did_document_o()
        .expect("pass")
        .service_v
        .is_empty());

    // Deactivate.
    let registration = did_registrar
        .deactivate(DIDDeactivateOptions {
            did: did.to_string(),
            private_key_hex: secret.private_key_hex.clone(),
        })
        .await
        .expect("pass");
    assert!(registration.is_finished());
    let deactivated_document = registration.did_document_o().expect("pass").clone();

    let did_resolution_result = did_resolver
        .resolve(&did.to_string(), DIDResolutionOptions::default())
        .await;
    assert!(!did_resolution_result.is_error());
    assert_eq!(
        did_resolution_result.did_document_o.as_ref(),
        Some(&deactivated_document)
    );
    let did_document_metadata = did_resolution_result
        .did_document_metadata_o
        .as_ref()
        .expect("pass");
    assert_eq!(did_document_metadata.deactivated_o, Some(true));
    assert_eq!(did_document_metadata.version_id_o, Some(4));
    assert_eq!(
        ledger_module.did_driver().status(&did).await.expect("pass"),
        DIDStatus::Deactivated
    );

    // Deactivation is terminal.
    let submit_count = mock_ledger.call_counts().submit_message;
    let registration = did_registrar
        .update(DIDUpdateOptions {
            did: did.to_string(),
            private_key_hex: secret.private_key_hex.clone(),
            operation_v: vec![Operation::RevokeVerificationMethod {
                id: "#k1".to_string(),
            }],
            did_document_o: None,
        })
        .await
        .expect("pass");
    let reason = registration.failure_reason_o().expect("pass");
    assert!(reason.contains("deactivated"), "reason: {}", reason);
    assert_eq!(mock_ledger.call_counts().submit_message, submit_count);
}

#[tokio::test]
async fn test_example_did_resolves_to_initial_document() {
    let mock_ledger = MockLedger::new();
    let ledger_module = ledger_module(&mock_ledger);
    let did = DID::from_str("did:ledger:testnet:EXAMPLE_0.0.1").expect("pass");
    let root_signing_key = generate_signing_key();
    let doc0 = DIDDocument::new_root(did.clone(), &root_signing_key.verifying_key(), Vec::new());

    mock_ledger.insert_topic(*did.topic_id()).expect("pass");
    let operation_message = OperationMessage::new(
        did.clone(),
        Operation::Create {
            initial_document: doc0.clone(),
        },
    );
    mock_ledger
        .append_raw_message(
            did.topic_id(),
            encode_operation_message(&operation_message, &root_signing_key).expect("pass"),
        )
        .expect("pass");

    let did_resolution_result = ledger_module.did_driver().resolve(&did).await;
    assert_eq!(did_resolution_result.did_document_o, Some(doc0));
    assert_eq!(
        ledger_module.did_driver().status(&did).await.expect("pass"),
        DIDStatus::Active
    );
}

#[tokio::test]
async fn test_writes_without_operator_fail_fast() {
    let mock_ledger = MockLedger::new();
    // A writer without a configured operator is ignored.
    let ledger_module =
        ledger_module_with_config(&mock_ledger, LedgerModuleConfig::new(LedgerNetwork::Testnet));
    assert!(!ledger_module.did_driver().can_write());
    assert!(ledger_module.operator_o().is_none());

    let root_signing_key = generate_signing_key();
    assert!(matches!(
        ledger_module
            .did_driver()
            .create(DIDCreateParams::new(root_signing_key.clone()))
            .await,
        Err(Error::NoOperatorConfigured)
    ));
    let did = DID::from_str("did:ledger:testnet:EXAMPLE_0.0.1").expect("pass");
    assert!(matches!(
        ledger_module
            .did_driver()
            .deactivate(&did, &root_signing_key)
            .await,
        Err(Error::NoOperatorConfigured)
    ));

    let registration = ledger_module
        .did_registrar()
        .create(DIDCreateOptions::new())
        .await
        .expect("pass");
    let reason = registration.failure_reason_o().expect("pass");
    assert!(
        reason.to_lowercase().contains("no operator configured"),
        "reason: {}",
        reason
    );

    // Not a single ledger call was made.
    assert_eq!(mock_ledger.call_counts().total(), 0);

    // Resolution still works.
    let did_resolution_result = ledger_module.did_driver().resolve(&did).await;
    assert_eq!(did_resolution_result.error_o(), Some(ERROR_NOT_FOUND));
}

#[tokio::test]
async fn test_resolution_errors() {
    let mock_ledger = MockLedger::new();
    let ledger_module = ledger_module(&mock_ledger);
    let did_resolver = ledger_module.did_resolver();
    assert_eq!(did_resolver.supported_methods(), &["ledger"]);
    assert!(did_resolver.allows_caching());

    let expected_error_v = [
        ("not a DID", ERROR_INVALID_DID),
        ("did:", ERROR_INVALID_DID),
        ("did:web:example.com", ERROR_METHOD_NOT_SUPPORTED),
        ("did:ledger:bogus", ERROR_INVALID_DID),
        ("did:ledger:testnet:EXAMPLE_0.0.1#key", ERROR_INVALID_DID),
        // Topic doesn't exist.
        ("did:ledger:testnet:EXAMPLE_0.0.77", ERROR_NOT_FOUND),
        // DID of another network.
        ("did:ledger:mainnet:EXAMPLE_0.0.77", ERROR_NOT_FOUND),
    ];
    for (did_str, expected_error) in expected_error_v {
        let did_resolution_result = did_resolver
            .resolve(did_str, DIDResolutionOptions::default())
            .await;
        assert_eq!(
            did_resolution_result.error_o(),
            Some(expected_error),
            "resolving {:?}",
            did_str
        );
        assert!(did_resolution_result.did_document_o.is_none());
        assert!(did_resolution_result
            .did_resolution_metadata
            .content_type_o
            .is_none());
    }

    // An existing topic holding only garbage.
    let topic_id = TopicId::from_str("0.0.5").expect("pass");
    mock_ledger.insert_topic(topic_id).expect("pass");
    mock_ledger
        .append_raw_message(&topic_id, b"garbage".to_vec())
        .expect("pass");
    let did_resolution_result = did_resolver
        .resolve("did:ledger:testnet:EXAMPLE_0.0.5", DIDResolutionOptions::default())
        .await;
    assert_eq!(did_resolution_result.error_o(), Some(ERROR_NOT_FOUND));
    assert!(did_resolution_result.did_document_o.is_none());
    assert_eq!(
        did_resolution_result
            .did_document_metadata_o
            .expect("pass")
            .topic_id,
        topic_id
    );

    // Representations.
    let root_signing_key = generate_signing_key();
    let did = create_did(&ledger_module, &root_signing_key).await;
    let did_resolution_result = did_resolver
        .resolve(
            &did.to_string(),
            DIDResolutionOptions::with_accept("text/html"),
        )
        .await;
    assert_eq!(
        did_resolution_result.error_o(),
        Some(ERROR_REPRESENTATION_NOT_SUPPORTED)
    );
    let did_resolution_result = did_resolver
        .resolve(
            &did.to_string(),
            DIDResolutionOptions::with_accept(DID_JSON_CONTENT_TYPE),
        )
        .await;
    assert_eq!(
        did_resolution_result
            .did_resolution_metadata
            .content_type_o
            .as_deref(),
        Some(DID_JSON_CONTENT_TYPE)
    );

    // An unreachable ledger.
    mock_ledger.set_unavailable(true);
    let did_resolution_result = did_resolver
        .resolve(&did.to_string(), DIDResolutionOptions::default())
        .await;
    assert_eq!(did_resolution_result.error_o(), Some(ERROR_NOT_FOUND));
    assert!(did_resolution_result.did_document_o.is_none());
    assert!(ledger_module.did_driver().status(&did).await.is_err());
    mock_ledger.set_unavailable(false);
}

#[tokio::test]
async fn test_ambiguous_writes_and_reconcile() {
    let mock_ledger = MockLedger::new();
    let ledger_module = ledger_module(&mock_ledger);
    let root_signing_key = generate_signing_key();
    let did = create_did(&ledger_module, &root_signing_key).await;
    let did_driver = ledger_module.did_driver();

    // The message lands, but its confirmation is never observed.
    mock_ledger.set_lose_confirmations(true);
    let nonce = match did_driver
        .add_verification_method(
            &did,
            "#k1",
            &generate_signing_key().verifying_key(),
            vec![KeyPurpose::Authentication],
            &root_signing_key,
        )
        .await
    {
        Err(Error::Ambiguous { nonce, .. }) => nonce,
        other => panic!("expected an ambiguous outcome, got {:?}", other),
    };
    mock_ledger.set_lose_confirmations(false);
    assert!(matches!(
        did_driver.reconcile(&did, &nonce).await.expect("pass"),
        Reconciliation::Applied { sequence_number: 2 }
    ));

    // The message never reaches consensus.
    mock_ledger.set_drop_submissions(true);
    let nonce = match did_driver
        .add_verification_method(
            &did,
            "#k2",
            &generate_signing_key().verifying_key(),
            vec![KeyPurpose::Authentication],
            &root_signing_key,
        )
        .await
    {
        Err(Error::Ambiguous { nonce, .. }) => nonce,
        other => panic!("expected an ambiguous outcome, got {:?}", other),
    };
    mock_ledger.set_drop_submissions(false);
    assert_eq!(
        did_driver.reconcile(&did, &nonce).await.expect("pass"),
        Reconciliation::Absent
    );

    // The confirmation takes longer than the driver is willing to wait.
    let impatient_did_driver = did_driver.clone().with_timeouts(LedgerTimeouts {
        confirmation: Duration::from_millis(50),
        ..LedgerTimeouts::default()
    });
    mock_ledger.set_confirmation_delay(Some(Duration::from_millis(500)));
    let nonce = match impatient_did_driver
        .add_service(
            &did,
            Service {
                id: "#hub".to_string(),
                r#type: "LinkedDomains".to_string(),
                service_endpoint: "https://example.com".to_string(),
            },
            &root_signing_key,
        )
        .await
    {
        Err(Error::Ambiguous { nonce, .. }) => nonce,
        other => panic!("expected an ambiguous outcome, got {:?}", other),
    };
    mock_ledger.set_confirmation_delay(None);
    assert!(did_driver
        .reconcile(&did, &nonce)
        .await
        .expect("pass")
        .is_applied());

    let did_document = did_driver
        .resolve(&did)
        .await
        .did_document_o
        .expect("pass");
    assert!(did_document.verification_method(&did.with_fragment("k1")).is_some());
    assert!(did_document.verification_method(&did.with_fragment("k2")).is_none());
    assert!(did_document.service(&did.with_fragment("hub")).is_some());
}

#[tokio::test]
async fn test_ambiguous_create_can_be_reconciled() {
    let mock_ledger = MockLedger::new();
    let ledger_module = ledger_module(&mock_ledger);
    let did_registrar = ledger_module.did_registrar();

    // The Create lands, but its confirmation is never observed.
    mock_ledger.set_lose_confirmations(true);
    let registration = did_registrar
        .create(DIDCreateOptions::new())
        .await
        .expect("pass");
    mock_ledger.set_lose_confirmations(false);
    tracing::debug!(
        "registration: {}",
        serde_json::to_string_pretty(&registration).expect("pass")
    );
    assert!(!registration.is_finished());
    let (did, nonce) = registration.ambiguous_write_o().expect("pass");
    let (did, nonce) = (did.clone(), nonce.clone());
    let reason = registration.failure_reason_o().expect("pass");
    assert!(reason.contains(&did.to_string()), "reason: {}", reason);
    // The generated key isn't lost, since the DID may exist.
    let secret = match &registration.did_state {
        did_ledger::DIDState::Failed {
            secret_o: Some(secret),
            ..
        } => secret.clone(),
        other => panic!("expected the generated key, got {:?}", other),
    };
    assert_eq!(
        mock_ledger
            .topic_messages(did.topic_id())
            .expect("pass")
            .len(),
        1
    );

    assert_eq!(
        ledger_module
            .did_driver()
            .reconcile(&did, &nonce)
            .await
            .expect("pass"),
        Reconciliation::Applied { sequence_number: 1 }
    );
    let did_document = ledger_module
        .did_driver()
        .resolve(&did)
        .await
        .did_document_o
        .expect("pass");
    assert_eq!(
        did_document.verification_method_v[0].public_key_multibase,
        secret.public_key_multibase
    );

    // The returned key controls the DID.
    let registration = did_registrar
        .deactivate(DIDDeactivateOptions {
            did: did.to_string(),
            private_key_hex: secret.private_key_hex.clone(),
        })
        .await
        .expect("pass");
    assert!(registration.is_finished());
}

#[tokio::test]
async fn test_confirmed_write_that_cannot_be_reread_is_ambiguous() {
    let mock_ledger = MockLedger::new();
    let ledger_module = ledger_module(&mock_ledger);
    let did_driver = ledger_module.did_driver();
    let root_signing_key = generate_signing_key();

    // Create is confirmed, but the topic can't be read back.
    mock_ledger.set_reads_unavailable(true);
    let (did, nonce) = match did_driver
        .create(DIDCreateParams::new(root_signing_key.clone()))
        .await
    {
        Err(Error::Ambiguous { did, nonce, .. }) => (did, nonce),
        other => panic!("expected an ambiguous outcome, got {:?}", other),
    };
    mock_ledger.set_reads_unavailable(false);
    assert_eq!(
        did_driver.reconcile(&did, &nonce).await.expect("pass"),
        Reconciliation::Applied { sequence_number: 1 }
    );

    // An update is confirmed, but the reader lags behind consensus.
    mock_ledger.set_reads_frozen(true);
    let (ambiguous_did, nonce) = match did_driver
        .add_verification_method(
            &did,
            "#k1",
            &generate_signing_key().verifying_key(),
            vec![KeyPurpose::Authentication],
            &root_signing_key,
        )
        .await
    {
        Err(Error::Ambiguous { did, nonce, .. }) => (did, nonce),
        other => panic!("expected an ambiguous outcome, got {:?}", other),
    };
    assert_eq!(ambiguous_did, did);
    assert_eq!(
        did_driver.reconcile(&did, &nonce).await.expect("pass"),
        Reconciliation::Absent
    );
    // Once the reader catches up, the operation shows as applied, and was only submitted once.
    mock_ledger.set_reads_frozen(false);
    assert_eq!(
        did_driver.reconcile(&did, &nonce).await.expect("pass"),
        Reconciliation::Applied { sequence_number: 2 }
    );
    assert_eq!(mock_ledger.call_counts().submit_message, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_serialized() {
    const UPDATE_COUNT: usize = 8;

    let mock_ledger = MockLedger::new_with_simulated_latency(Duration::from_millis(5));
    let ledger_module = ledger_module(&mock_ledger);
    let root_signing_key = generate_signing_key();
    let did = create_did(&ledger_module, &root_signing_key).await;

    let mut join_handle_v = Vec::with_capacity(UPDATE_COUNT);
    for i in 0..UPDATE_COUNT {
        let did_driver = ledger_module.did_driver().clone();
        let did = did.clone();
        let root_signing_key = root_signing_key.clone();
        join_handle_v.push(tokio::spawn(async move {
            did_driver
                .add_verification_method(
                    &did,
                    &format!("#k{}", i),
                    &generate_signing_key().verifying_key(),
                    vec![KeyPurpose::AssertionMethod],
                    &root_signing_key,
                )
                .await
        }));
    }
    for join_handle in join_handle_v {
        join_handle.await.expect("pass").expect("pass");
    }

    let projection = ledger_module.did_driver().project(&did).await.expect("pass");
    assert!(projection.skipped_operation_v.is_empty());
    let did_document = projection.did_document_o.expect("pass");
    assert_eq!(did_document.verification_method_v.len(), UPDATE_COUNT + 1);
    assert_eq!(did_document.assertion_method_v.len(), UPDATE_COUNT + 1);
    assert_eq!(
        mock_ledger
            .topic_messages(did.topic_id())
            .expect("pass")
            .len(),
        UPDATE_COUNT + 1
    );
}

#[tokio::test]
async fn test_rejected_submission() {
    let mock_ledger = MockLedger::new();
    let ledger_module = ledger_module(&mock_ledger);
    let root_signing_key = generate_signing_key();
    let did = create_did(&ledger_module, &root_signing_key).await;

    mock_ledger.reject_next_submission("INSUFFICIENT_TX_FEE");
    assert!(matches!(
        ledger_module
            .did_driver()
            .deactivate(&did, &root_signing_key)
            .await,
        Err(Error::RejectedByLedger(_))
    ));
    assert_eq!(
        ledger_module.did_driver().status(&did).await.expect("pass"),
        DIDStatus::Active
    );

    mock_ledger.reject_next_submission("INSUFFICIENT_TX_FEE");
    let registration = ledger_module
        .did_registrar()
        .deactivate(DIDDeactivateOptions {
            did: did.to_string(),
            private_key_hex: hex::encode(root_signing_key.to_bytes()),
        })
        .await
        .expect("pass");
    let reason = registration.failure_reason_o().expect("pass");
    assert!(reason.contains("INSUFFICIENT_TX_FEE"), "reason: {}", reason);

    mock_ledger.reject_next_submission("INSUFFICIENT_TX_FEE");
    let registration = ledger_module
        .did_registrar()
        .create(DIDCreateOptions::new())
        .await
        .expect("pass");
    assert!(!registration.is_finished());
}

#[tokio::test]
async fn test_registrar_rejects_invalid_options_before_any_ledger_call() {
    let mock_ledger = MockLedger::new();
    let ledger_module = ledger_module(&mock_ledger);
    let did_registrar = ledger_module.did_registrar();
    let private_key_hex = hex::encode(generate_signing_key().to_bytes());

    let result = did_registrar
        .create(DIDCreateOptions {
            method: "web".to_string(),
            ..DIDCreateOptions::new()
        })
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    let result = did_registrar
        .create(DIDCreateOptions {
            network_o: Some(LedgerNetwork::Mainnet),
            ..DIDCreateOptions::new()
        })
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    let result = did_registrar
        .create(DIDCreateOptions {
            private_key_hex_o: Some("not hex".to_string()),
            ..DIDCreateOptions::new()
        })
        .await;
    assert!(matches!(result, Err(Error::Malformed(_))));

    let result = did_registrar
        .update(DIDUpdateOptions {
            did: "did:ledger:mainnet:EXAMPLE_0.0.1".to_string(),
            private_key_hex: private_key_hex.clone(),
            operation_v: vec![Operation::Deactivate],
            did_document_o: None,
        })
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    let result = did_registrar
        .update(DIDUpdateOptions {
            did: "did:ledger:testnet:EXAMPLE_0.0.1".to_string(),
            private_key_hex: private_key_hex.clone(),
            operation_v: Vec::new(),
            did_document_o: None,
        })
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    let did = DID::from_str("did:ledger:testnet:EXAMPLE_0.0.1").expect("pass");
    let root_signing_key = generate_signing_key();
    let result = did_registrar
        .update(DIDUpdateOptions {
            did: did.to_string(),
            private_key_hex: private_key_hex.clone(),
            operation_v: vec![Operation::Create {
                initial_document: DIDDocument::new_root(
                    did.clone(),
                    &root_signing_key.verifying_key(),
                    Vec::new(),
                ),
            }],
            did_document_o: None,
        })
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    let result = did_registrar
        .deactivate(DIDDeactivateOptions {
            did: "did:ledger:testnet:EXAMPLE".to_string(),
            private_key_hex: private_key_hex.clone(),
        })
        .await;
    assert!(matches!(result, Err(Error::Malformed(_))));

    // Full document replacement is a recognized request this method doesn't implement.
    let registration = did_registrar
        .update(DIDUpdateOptions {
            did: did.to_string(),
            private_key_hex: private_key_hex.clone(),
            operation_v: Vec::new(),
            did_document_o: Some(DIDDocument::new_root(
                did.clone(),
                &root_signing_key.verifying_key(),
                Vec::new(),
            )),
        })
        .await
        .expect("pass");
    let reason = registration.failure_reason_o().expect("pass");
    assert!(reason.starts_with("not implemented: "), "reason: {}", reason);

    // Service ids are checked before the topic is created.
    let hub = |id: &str| Service {
        id: id.to_string(),
        r#type: "LinkedDomains".to_string(),
        service_endpoint: "https://example.com".to_string(),
    };
    for service_v in [
        vec![hub("no-fragment")],
        vec![hub("#")],
        vec![hub("did:ledger:testnet:EXAMPLE_0.0.1#hub")],
        vec![hub("#hub"), hub("#hub")],
    ] {
        let result = did_registrar
            .create(DIDCreateOptions {
                service_v: service_v.clone(),
                ..DIDCreateOptions::new()
            })
            .await;
        assert!(
            matches!(result, Err(Error::InvalidArgument(_))),
            "services {:?} gave {:?}",
            service_v,
            result
        );
        let result = ledger_module
            .did_driver()
            .create(DIDCreateParams {
                service_v,
                ..DIDCreateParams::new(root_signing_key.clone())
            })
            .await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    assert_eq!(mock_ledger.call_counts().total(), 0);
}

#[tokio::test]
async fn test_update_validation() {
    let mock_ledger = MockLedger::new();
    let ledger_module = ledger_module(&mock_ledger);
    let did_driver = ledger_module.did_driver();
    let root_signing_key = generate_signing_key();

    // Updating a DID that was never created.
    let did = DID::from_str("did:ledger:testnet:EXAMPLE_0.0.1").expect("pass");
    mock_ledger.insert_topic(*did.topic_id()).expect("pass");
    assert!(matches!(
        did_driver.deactivate(&did, &root_signing_key).await,
        Err(Error::InvalidState(_))
    ));

    let did = create_did(&ledger_module, &root_signing_key).await;
    let submit_count = mock_ledger.call_counts().submit_message;

    // Signing with a key that isn't a capabilityInvocation key.
    assert!(matches!(
        did_driver
            .deactivate(&did, &generate_signing_key())
            .await,
        Err(Error::InvalidArgument(_))
    ));
    // Create is not an update.
    assert!(matches!(
        did_driver
            .update(
                &did,
                vec![Operation::Create {
                    initial_document: DIDDocument::new_root(
                        did.clone(),
                        &root_signing_key.verifying_key(),
                        Vec::new(),
                    ),
                }],
                &root_signing_key,
            )
            .await,
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(mock_ledger.call_counts().submit_message, submit_count);

    // An operation the projection skips is reported after the fact.
    assert!(matches!(
        did_driver
            .revoke_verification_method(&did, "#did-root-key", &root_signing_key)
            .await,
        Err(Error::InvalidState(_))
    ));
    assert_eq!(mock_ledger.call_counts().submit_message, submit_count + 1);
    let projection = did_driver.project(&did).await.expect("pass");
    assert_eq!(projection.skipped_operation_v.len(), 1);
    assert_eq!(projection.status(), DIDStatus::Active);
}

#[tokio::test]
async fn test_paged_reading() {
    let mock_ledger = MockLedger::new();
    let config = LedgerModuleConfig {
        page_size: 2,
        ..operator_config()
    };
    let ledger_module = ledger_module_with_config(&mock_ledger, config);
    let root_signing_key = generate_signing_key();
    let did = create_did(&ledger_module, &root_signing_key).await;
    let operation_v = (0..4)
        .map(|i| Operation::AddVerificationMethod {
            id: format!("#k{}", i),
            public_key_multibase: public_key_multibase_encode(
                &generate_signing_key().verifying_key(),
            ),
            relationship_v: vec![KeyPurpose::CapabilityDelegation],
        })
        .collect::<Vec<_>>();
    let did_document = ledger_module
        .did_driver()
        .update(&did, operation_v, &root_signing_key)
        .await
        .expect("pass");
    assert_eq!(did_document.capability_delegation_v.len(), 4);

    let ledger_message_v = ledger_module
        .did_driver()
        .read_log(did.topic_id())
        .await
        .expect("pass");
    assert_eq!(
        ledger_message_v
            .iter()
            .map(|ledger_message| ledger_message.sequence_number)
            .collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    assert_eq!(
        ledger_module.did_driver().resolve(&did).await.did_document_o,
        Some(did_document)
    );
}

#[tokio::test]
async fn test_module_rejects_writer_of_another_operator() {
    let mock_ledger = MockLedger::new();
    let ledger_writer_a: Arc<dyn LedgerWriter> =
        Arc::new(mock_ledger.writer(AccountId::from_str("0.0.999").expect("pass")));
    assert!(matches!(
        LedgerModule::new(
            operator_config(),
            Arc::new(mock_ledger.clone()),
            Some(ledger_writer_a)
        ),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        LedgerModule::new(
            operator_config().with_operator(OPERATOR_ACCOUNT_ID, "zz"),
            Arc::new(mock_ledger.clone()),
            None
        ),
        Err(Error::Malformed(_))
    ));
}

/// Serves a fixed log, as a mirror node would, including any gaps in its sequence numbers.
struct FixedLogReader {
    ledger_message_v: Vec<did_ledger::LedgerMessage>,
}

#[async_trait::async_trait]
impl did_ledger::LogReader for FixedLogReader {
    async fn read_messages(
        &self,
        _topic_id: &TopicId,
        after_sequence_number_o: Option<u64>,
        limit: usize,
    ) -> did_ledger::Result<Vec<did_ledger::LedgerMessage>> {
        let after_sequence_number = after_sequence_number_o.unwrap_or(0);
        Ok(self
            .ledger_message_v
            .iter()
            .filter(|ledger_message| ledger_message.sequence_number > after_sequence_number)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[tokio::test]
async fn test_sequence_number_gaps_are_allowed_but_disorder_is_not() {
    let did = DID::from_str("did:ledger:testnet:EXAMPLE_0.0.1").expect("pass");
    let root_signing_key = generate_signing_key();
    let ledger_message = |sequence_number: u64, operation: Operation| {
        let operation_message = OperationMessage::new(did.clone(), operation);
        did_ledger::LedgerMessage {
            sequence_number,
            consensus_timestamp: time::macros::datetime!(2024-01-01 00:00:00 UTC)
                + Duration::from_secs(sequence_number),
            payload: encode_operation_message(&operation_message, &root_signing_key)
                .expect("pass"),
        }
    };
    let create = Operation::Create {
        initial_document: DIDDocument::new_root(
            did.clone(),
            &root_signing_key.verifying_key(),
            Vec::new(),
        ),
    };
    let add_key = Operation::AddVerificationMethod {
        id: "#k1".to_string(),
        public_key_multibase: public_key_multibase_encode(
            &generate_signing_key().verifying_key(),
        ),
        relationship_v: vec![KeyPurpose::Authentication],
    };

    let gapped_log_reader = FixedLogReader {
        ledger_message_v: vec![
            ledger_message(3, create.clone()),
            ledger_message(7, add_key.clone()),
        ],
    };
    let did_driver =
        did_ledger::DIDDriver::new(LedgerNetwork::Testnet, Arc::new(gapped_log_reader), None)
            .with_page_size(1);
    let projection = did_driver.project(&did).await.expect("pass");
    assert!(projection.skipped_operation_v.is_empty());
    assert_eq!(projection.last_applied_sequence_number_o(), Some(7));

    let disordered_log_reader = FixedLogReader {
        ledger_message_v: vec![ledger_message(3, create), ledger_message(3, add_key)],
    };
    let did_driver = did_ledger::DIDDriver::new(
        LedgerNetwork::Testnet,
        Arc::new(disordered_log_reader),
        None,
    );
    assert!(matches!(
        did_driver.project(&did).await,
        Err(Error::Unavailable(_))
    ));
}
