use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::TopicId;

type TopicLockMap = HashMap<TopicId, Arc<tokio::sync::Mutex<()>>>;

/// Table of per-topic async locks which serialize writes to each topic.  Reads never take these
/// locks.  Entries are created on demand and removed when the last guard or waiter for the topic
/// goes away, so the table only holds topics with a write in progress.
#[derive(Clone, Debug, Default)]
pub struct TopicWriteLocks {
    lock_ma: Arc<Mutex<TopicLockMap>>,
}

impl TopicWriteLocks {
    pub fn new() -> Self {
        Self::default()
    }
    /// Acquires the write lock for the given topic, waiting for any write already in progress.
    pub async fn lock(&self, topic_id: &TopicId) -> TopicWriteGuard {
        let topic_lock_a = {
            // The table lock is only held for the lookup, never across an await.
            let mut lock_m = self.table();
            lock_m
                .entry(*topic_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        let guard = topic_lock_a.lock_owned().await;
        TopicWriteGuard {
            topic_id: *topic_id,
            lock_ma: self.lock_ma.clone(),
            guard_o: Some(guard),
        }
    }
    /// Number of topics currently present in the table.
    pub fn len(&self) -> usize {
        self.table().len()
    }
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
    fn table(&self) -> MutexGuard<'_, TopicLockMap> {
        lock_table(&self.lock_ma)
    }
}

fn lock_table(lock_ma: &Mutex<TopicLockMap>) -> MutexGuard<'_, TopicLockMap> {
    lock_ma
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds the write lock of one topic.  Dropping it releases the lock, and removes the topic's
/// entry from the table if nobody else is holding or waiting for it.
#[derive(Debug)]
pub struct TopicWriteGuard {
    topic_id: TopicId,
    lock_ma: Arc<Mutex<TopicLockMap>>,
    guard_o: Option<tokio::sync::OwnedMutexGuard<()>>,
}

impl Drop for TopicWriteGuard {
    fn drop(&mut self) {
        let mut lock_m = lock_table(&self.lock_ma);
        // Waiters clone the entry under the table lock, so with the table locked, a count of 2
        // (the table and this guard) means nobody else can reach this mutex.
        if lock_m
            .get(&self.topic_id)
            .is_some_and(|topic_lock_a| Arc::strong_count(topic_lock_a) <= 2)
        {
            lock_m.remove(&self.topic_id);
        }
        // Release the topic lock while the table is still locked, so the removal and the release
        // look atomic to anyone acquiring through the table.
        self.guard_o.take();
    }
}
