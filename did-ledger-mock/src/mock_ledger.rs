use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use did_ledger::{
    AccountId, Confirmation, EntityId, Error, LedgerMessage, LogReader, Result, TopicId,
    TransactionId,
};

use crate::MockLedgerWriter;

/// Number of calls of each kind the mock ledger has served.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MockLedgerCallCounts {
    pub read_messages: usize,
    pub create_topic: usize,
    pub submit_message: usize,
    pub wait_for_confirmation: usize,
}

impl MockLedgerCallCounts {
    /// Calls that would have cost the operator a fee or required the write path.
    pub fn write_calls(&self) -> usize {
        self.create_topic + self.submit_message + self.wait_for_confirmation
    }
    pub fn total(&self) -> usize {
        self.read_messages + self.write_calls()
    }
}

#[derive(Debug)]
struct PendingTransaction {
    /// None if the submission was dropped before reaching consensus.
    confirmation_o: Option<Confirmation>,
}

#[derive(Debug, Default)]
struct MockLedgerState {
    topic_m: HashMap<TopicId, Vec<LedgerMessage>>,
    pending_transaction_m: HashMap<TransactionId, PendingTransaction>,
    next_topic_num: u64,
    next_transaction_num: u64,
    /// Total messages accepted, across topics; drives the consensus clock.
    message_count: u64,
    unavailable: bool,
    reads_unavailable: bool,
    /// While set, reads only see the messages each topic held when reads were frozen.
    frozen_topic_len_mo: Option<HashMap<TopicId, usize>>,
    reject_next_submission_o: Option<String>,
    drop_submissions: bool,
    lose_confirmations: bool,
    confirmation_delay_o: Option<Duration>,
    call_counts: MockLedgerCallCounts,
}

/// Purely in-memory, intra-process ledger with consensus-ordered topics.  Implements `LogReader`
/// directly; `writer` produces the matching `LedgerWriter`.  Clones share the same ledger.
///
/// Faults can be injected to exercise the driver's failure handling: unavailability, rejected
/// submissions, dropped submissions, and lost or delayed confirmations.
#[derive(Clone, Debug, Default)]
pub struct MockLedger {
    state_la: Arc<RwLock<MockLedgerState>>,
    /// Optional simulated network latency duration.  If present, then all ledger calls will sleep
    /// for this duration before beginning their work.
    simulated_latency_o: Option<Duration>,
}

/// First topic number assigned by `create_topic`; lower numbers are free for `insert_topic`.
const FIRST_ASSIGNED_TOPIC_NUM: u64 = 1000;

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn new_with_simulated_latency(simulated_latency: Duration) -> Self {
        Self {
            state_la: Arc::default(),
            simulated_latency_o: Some(simulated_latency),
        }
    }
    /// A writer submitting on behalf of the given operator account.
    pub fn writer(&self, operator_account_id: AccountId) -> MockLedgerWriter {
        MockLedgerWriter::new(self.clone(), operator_account_id)
    }

    //
    // Direct manipulation, bypassing the call counters and injected faults.
    //

    /// Creates an empty topic with a specific id.
    pub fn insert_topic(&self, topic_id: TopicId) -> Result<()> {
        let mut state = self.state_mut();
        if state.topic_m.contains_key(&topic_id) {
            return Err(Error::AlreadyExists(
                format!("topic {} already exists", topic_id).into(),
            ));
        }
        state.topic_m.insert(topic_id, Vec::new());
        Ok(())
    }
    /// Appends an arbitrary payload to a topic, as if some client had submitted it.  Returns the
    /// assigned sequence number.
    pub fn append_raw_message(&self, topic_id: &TopicId, payload: Vec<u8>) -> Result<u64> {
        let mut state = self.state_mut();
        append_message(&mut state, topic_id, payload).map(|ledger_message| ledger_message.sequence_number)
    }
    /// All messages of the topic, or None if it doesn't exist.
    pub fn topic_messages(&self, topic_id: &TopicId) -> Option<Vec<LedgerMessage>> {
        self.state().topic_m.get(topic_id).cloned()
    }
    pub fn call_counts(&self) -> MockLedgerCallCounts {
        self.state().call_counts
    }

    //
    // Fault injection
    //

    /// While set, every call fails with `Error::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state_mut().unavailable = unavailable;
    }
    /// While set, reads fail with `Error::Unavailable`, but writes go through.
    pub fn set_reads_unavailable(&self, reads_unavailable: bool) {
        self.state_mut().reads_unavailable = reads_unavailable;
    }
    /// While set, reads don't see messages accepted after reads were frozen, like a mirror node
    /// lagging behind consensus.  Topics created meanwhile read as empty.
    pub fn set_reads_frozen(&self, reads_frozen: bool) {
        let mut state = self.state_mut();
        state.frozen_topic_len_mo = if reads_frozen {
            Some(
                state
                    .topic_m
                    .iter()
                    .map(|(topic_id, ledger_message_v)| (*topic_id, ledger_message_v.len()))
                    .collect(),
            )
        } else {
            None
        };
    }
    /// The next submission fails with `Error::RejectedByLedger` with the given reason.
    pub fn reject_next_submission(&self, reason: impl Into<String>) {
        self.state_mut().reject_next_submission_o = Some(reason.into());
    }
    /// While set, submissions are accepted but never reach consensus.
    pub fn set_drop_submissions(&self, drop_submissions: bool) {
        self.state_mut().drop_submissions = drop_submissions;
    }
    /// While set, submissions reach consensus but their confirmations are never observed.
    pub fn set_lose_confirmations(&self, lose_confirmations: bool) {
        self.state_mut().lose_confirmations = lose_confirmations;
    }
    /// Delays every confirmation by the given duration.
    pub fn set_confirmation_delay(&self, confirmation_delay_o: Option<Duration>) {
        self.state_mut().confirmation_delay_o = confirmation_delay_o;
    }

    //
    // Ledger operations, used by `LogReader` and `MockLedgerWriter`.
    //

    pub(crate) async fn create_topic_impl(&self, memo: &str) -> Result<TopicId> {
        self.simulate_latency_if_necessary().await;
        let mut state = self.state_mut();
        state.call_counts.create_topic += 1;
        check_available(&state)?;
        let topic_num = FIRST_ASSIGNED_TOPIC_NUM + state.next_topic_num;
        state.next_topic_num += 1;
        let topic_id = TopicId::from(EntityId::new(0, 0, topic_num));
        state.topic_m.insert(topic_id, Vec::new());
        tracing::debug!(%topic_id, memo, "mock ledger created topic");
        Ok(topic_id)
    }
    pub(crate) async fn submit_message_impl(
        &self,
        topic_id: &TopicId,
        payload: &[u8],
    ) -> Result<TransactionId> {
        self.simulate_latency_if_necessary().await;
        let mut state = self.state_mut();
        state.call_counts.submit_message += 1;
        check_available(&state)?;
        if let Some(reason) = state.reject_next_submission_o.take() {
            return Err(Error::RejectedByLedger(reason.into()));
        }
        if !state.topic_m.contains_key(topic_id) {
            return Err(Error::RejectedByLedger(
                format!("invalid topic id {}", topic_id).into(),
            ));
        }
        let confirmation_o = if state.drop_submissions {
            None
        } else {
            let ledger_message = append_message(&mut state, topic_id, payload.to_vec())?;
            Some(Confirmation {
                topic_id: *topic_id,
                sequence_number: ledger_message.sequence_number,
                consensus_timestamp: ledger_message.consensus_timestamp,
            })
        };
        let transaction_id = TransactionId::from(format!("0.0.2@{}", state.next_transaction_num));
        state.next_transaction_num += 1;
        state
            .pending_transaction_m
            .insert(transaction_id.clone(), PendingTransaction { confirmation_o });
        Ok(transaction_id)
    }
    pub(crate) async fn wait_for_confirmation_impl(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Confirmation> {
        self.simulate_latency_if_necessary().await;
        let confirmation_delay_o = {
            let mut state = self.state_mut();
            state.call_counts.wait_for_confirmation += 1;
            state.confirmation_delay_o
        };
        if let Some(confirmation_delay) = confirmation_delay_o {
            tokio::time::sleep(confirmation_delay).await;
        }
        let state = self.state();
        check_available(&state)?;
        let pending_transaction = state
            .pending_transaction_m
            .get(transaction_id)
            .ok_or_else(|| {
                Error::NotFound(format!("unknown transaction {}", transaction_id).into())
            })?;
        match (&pending_transaction.confirmation_o, state.lose_confirmations) {
            (Some(confirmation), false) => Ok(confirmation.clone()),
            _ => Err(Error::Timeout(
                format!("receipt for transaction {} was not observed", transaction_id).into(),
            )),
        }
    }

    async fn simulate_latency_if_necessary(&self) {
        if let Some(simulated_latency) = self.simulated_latency_o {
            tokio::time::sleep(simulated_latency).await;
        }
    }
    // The state lock is never held across an await.
    fn state(&self) -> RwLockReadGuard<'_, MockLedgerState> {
        self.state_la
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
    fn state_mut(&self) -> RwLockWriteGuard<'_, MockLedgerState> {
        self.state_la
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn check_available(state: &MockLedgerState) -> Result<()> {
    if state.unavailable {
        return Err(Error::Unavailable("mock ledger is unavailable".into()));
    }
    Ok(())
}

/// Consensus time of the n-th message accepted by the ledger: one millisecond apart, starting at
/// a fixed instant, so that projections of mock topics are reproducible.
fn consensus_timestamp(message_index: u64) -> time::OffsetDateTime {
    time::macros::datetime!(2024-01-01 00:00:00 UTC)
        + Duration::from_millis(message_index)
}

fn append_message(
    state: &mut MockLedgerState,
    topic_id: &TopicId,
    payload: Vec<u8>,
) -> Result<LedgerMessage> {
    let consensus_timestamp = consensus_timestamp(state.message_count);
    let ledger_message_v = state
        .topic_m
        .get_mut(topic_id)
        .ok_or_else(|| Error::NotFound(format!("topic {} does not exist", topic_id).into()))?;
    let ledger_message = LedgerMessage {
        sequence_number: ledger_message_v.len() as u64 + 1,
        consensus_timestamp,
        payload,
    };
    ledger_message_v.push(ledger_message.clone());
    state.message_count += 1;
    Ok(ledger_message)
}

#[async_trait::async_trait]
impl LogReader for MockLedger {
    async fn read_messages(
        &self,
        topic_id: &TopicId,
        after_sequence_number_o: Option<u64>,
        limit: usize,
    ) -> Result<Vec<LedgerMessage>> {
        self.simulate_latency_if_necessary().await;
        let mut state = self.state_mut();
        state.call_counts.read_messages += 1;
        check_available(&state)?;
        if state.reads_unavailable {
            return Err(Error::Unavailable("mock ledger reads are unavailable".into()));
        }
        let ledger_message_v = state
            .topic_m
            .get(topic_id)
            .ok_or_else(|| Error::NotFound(format!("topic {} does not exist", topic_id).into()))?;
        let visible_len = match &state.frozen_topic_len_mo {
            Some(frozen_topic_len_m) => frozen_topic_len_m.get(topic_id).copied().unwrap_or(0),
            None => ledger_message_v.len(),
        };
        let after_sequence_number = after_sequence_number_o.unwrap_or(0);
        Ok(ledger_message_v[..visible_len]
            .iter()
            .filter(|ledger_message| ledger_message.sequence_number > after_sequence_number)
            .take(limit)
            .cloned()
            .collect())
    }
}
