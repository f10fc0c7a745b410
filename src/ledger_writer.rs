use crate::{AccountId, Result, TopicId};

/// Identifier of a submitted ledger transaction, used to wait for its consensus receipt.
#[derive(
    Clone,
    Debug,
    derive_more::Deref,
    serde::Deserialize,
    derive_more::Display,
    Eq,
    derive_more::From,
    Hash,
    PartialEq,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct TransactionId(String);

/// Evidence that a submitted message reached consensus.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct Confirmation {
    #[serde(rename = "topicId")]
    pub topic_id: TopicId,
    #[serde(rename = "sequenceNumber")]
    pub sequence_number: u64,
    #[serde(rename = "consensusTimestamp", with = "time::serde::rfc3339")]
    pub consensus_timestamp: time::OffsetDateTime,
}

/// Write access to the ledger, on behalf of a fee-paying operator account.  Every call is a
/// remote call; once `submit_message` has returned, the submission can't be taken back.
#[async_trait::async_trait]
pub trait LedgerWriter: Send + Sync {
    /// The operator account that pays for and authorizes submissions.
    fn operator_account_id(&self) -> AccountId;
    /// Creates a new topic.  Fails with `Error::RejectedByLedger` if the ledger refuses the
    /// transaction (e.g. insufficient fee).
    async fn create_topic(&self, memo: &str) -> Result<TopicId>;
    /// Submits a message to a topic.  Fails with `Error::RejectedByLedger` (e.g. insufficient fee,
    /// invalid topic, message too large) or `Error::Unavailable` if the ledger couldn't be reached.
    async fn submit_message(&self, topic_id: &TopicId, payload: &[u8]) -> Result<TransactionId>;
    /// Waits until the given transaction reaches consensus.  Fails with `Error::Timeout` if the
    /// receipt isn't observed within the implementation's own bounded wait.
    async fn wait_for_confirmation(&self, transaction_id: &TransactionId) -> Result<Confirmation>;
}
