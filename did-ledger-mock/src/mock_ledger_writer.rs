use did_ledger::{AccountId, Confirmation, LedgerWriter, Result, TopicId, TransactionId};

use crate::MockLedger;

/// `LedgerWriter` which submits to a `MockLedger` on behalf of an operator account.
#[derive(Clone, Debug)]
pub struct MockLedgerWriter {
    mock_ledger: MockLedger,
    operator_account_id: AccountId,
}

impl MockLedgerWriter {
    pub fn new(mock_ledger: MockLedger, operator_account_id: AccountId) -> Self {
        Self {
            mock_ledger,
            operator_account_id,
        }
    }
    pub fn mock_ledger(&self) -> &MockLedger {
        &self.mock_ledger
    }
}

#[async_trait::async_trait]
impl LedgerWriter for MockLedgerWriter {
    fn operator_account_id(&self) -> AccountId {
        self.operator_account_id
    }
    async fn create_topic(&self, memo: &str) -> Result<TopicId> {
        self.mock_ledger.create_topic_impl(memo).await
    }
    async fn submit_message(&self, topic_id: &TopicId, payload: &[u8]) -> Result<TransactionId> {
        tracing::trace!(
            operator = %self.operator_account_id,
            %topic_id,
            "mock ledger submission of {} bytes",
            payload.len()
        );
        self.mock_ledger.submit_message_impl(topic_id, payload).await
    }
    async fn wait_for_confirmation(&self, transaction_id: &TransactionId) -> Result<Confirmation> {
        self.mock_ledger
            .wait_for_confirmation_impl(transaction_id)
            .await
    }
}
