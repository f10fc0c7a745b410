use crate::{LedgerMessage, Result, TopicId};

/// Read access to the consensus-ordered message log of a topic.
#[async_trait::async_trait]
pub trait LogReader: Send + Sync {
    /// Returns up to `limit` messages of the given topic whose sequence number is greater than
    /// `after_sequence_number_o` (or from the start of the topic if None), in consensus order.
    /// An empty page means there are no further messages.
    ///
    /// Fails with `Error::NotFound` if the topic doesn't exist and `Error::Unavailable` if the
    /// ledger can't be reached.  Implementations must not reorder messages.
    async fn read_messages(
        &self,
        topic_id: &TopicId,
        after_sequence_number_o: Option<u64>,
        limit: usize,
    ) -> Result<Vec<LedgerMessage>>;
}
