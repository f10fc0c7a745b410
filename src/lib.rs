mod did;
mod did_create_options;
mod did_create_params;
mod did_deactivate_options;
mod did_document;
mod did_document_metadata;
mod did_driver;
mod did_registrar;
mod did_registration_result;
mod did_resolution_metadata;
mod did_resolution_options;
mod did_resolution_result;
mod did_resolver;
mod did_status;
mod did_update_options;
mod document_projector;
mod entity_id;
mod error;
mod key_purpose;
mod ledger_message;
mod ledger_module;
mod ledger_module_config;
mod ledger_network;
mod ledger_timeouts;
mod ledger_writer;
mod log_reader;
mod message_codec;
mod mirror_node_log_reader;
mod nonce;
mod operation;
mod operation_message;
mod operator;
mod public_key_multibase;
mod reconciliation;
mod service;
mod signed_operation;
mod topic_write_locks;
mod verification_method;

pub use crate::{
    did::{DID, DID_METHOD},
    did_create_options::DIDCreateOptions,
    did_create_params::{DIDCreateParams, DEFAULT_TOPIC_MEMO},
    did_deactivate_options::DIDDeactivateOptions,
    did_document::{DIDDocument, DID_CORE_CONTEXT, ED25519_2020_CONTEXT, ROOT_KEY_FRAGMENT},
    did_document_metadata::DIDDocumentMetadata,
    did_driver::DIDDriver,
    did_registrar::{DIDRegistrar, LedgerDIDRegistrar},
    did_registration_result::{DIDRegistrationResult, DIDSecret, DIDState},
    did_resolution_metadata::{
        DIDResolutionMetadata, DID_JSON_CONTENT_TYPE, DID_LD_JSON_CONTENT_TYPE, ERROR_INVALID_DID,
        ERROR_METHOD_NOT_SUPPORTED, ERROR_NOT_FOUND, ERROR_REPRESENTATION_NOT_SUPPORTED,
    },
    did_resolution_options::DIDResolutionOptions,
    did_resolution_result::DIDResolutionResult,
    did_resolver::{DIDResolver, LedgerDIDResolver},
    did_status::DIDStatus,
    did_update_options::DIDUpdateOptions,
    document_projector::{project, DocumentProjector, Projection, SkippedOperation},
    entity_id::{AccountId, EntityId, TopicId},
    error::Error,
    key_purpose::KeyPurpose,
    ledger_message::{parse_consensus_timestamp, LedgerMessage},
    ledger_module::LedgerModule,
    ledger_module_config::{LedgerModuleConfig, OperatorConfig, DEFAULT_PAGE_SIZE},
    ledger_network::LedgerNetwork,
    ledger_timeouts::LedgerTimeouts,
    ledger_writer::{Confirmation, LedgerWriter, TransactionId},
    log_reader::LogReader,
    message_codec::{decode_operation_message, encode_operation_message},
    mirror_node_log_reader::MirrorNodeLogReader,
    nonce::Nonce,
    operation::Operation,
    operation_message::OperationMessage,
    operator::{parse_ed25519_private_key, Operator},
    public_key_multibase::{
        identifier_for_root_key, public_key_multibase_decode, public_key_multibase_encode,
    },
    reconciliation::Reconciliation,
    service::Service,
    signed_operation::SignedOperation,
    topic_write_locks::{TopicWriteGuard, TopicWriteLocks},
    verification_method::{VerificationMethod, ED25519_VERIFICATION_KEY_2020},
};

pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current UTC time truncated to whole milliseconds, so that it survives a round trip
/// through RFC 3339 serialization unchanged.
pub fn now_utc_milliseconds() -> time::OffsetDateTime {
    let now = time::OffsetDateTime::now_utc();
    now.replace_millisecond(now.millisecond())
        .expect("programmer error: a valid millisecond value can't be out of range")
}
