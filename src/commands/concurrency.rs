//! Concurrency slots limiting simultaneous invocations of one command.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::{cooldown::BucketType, error::CommandError};
use crate::interaction::Interaction;

type Buckets = Arc<Mutex<HashMap<String, Arc<Semaphore>>>>;

/// Limits how many invocations of a command may run at once per bucket.
#[derive(Debug, Clone)]
pub struct MaxConcurrency {
    number: usize,
    per: BucketType,
    wait: bool,
    buckets: Buckets,
}

impl MaxConcurrency {
    /// Allow `number` concurrent invocations per `per` bucket.
    ///
    /// A `number` of zero never admits an invocation; command builders reject it.
    ///
    /// When `wait` is false a full bucket rejects new invocations with
    /// [`CommandError::MaxConcurrencyReached`]; otherwise they queue for a slot.
    pub fn new(number: usize, per: BucketType, wait: bool) -> Self {
        Self {
            number,
            per,
            wait,
            buckets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn per(&self) -> BucketType {
        self.per
    }

    pub fn wait(&self) -> bool {
        self.wait
    }

    /// Acquire a slot in the interaction's bucket.
    pub async fn acquire(&self, inter: &Interaction) -> Result<ConcurrencySlot, CommandError> {
        let key = self.per.key(inter);
        let semaphore = {
            let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
            buckets
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Semaphore::new(self.number)))
                .clone()
        };

        let permit = if self.wait {
            semaphore.acquire_owned().await.ok()
        } else {
            semaphore.try_acquire_owned().ok()
        };
        drop_idle(&self.buckets, &key);

        match permit {
            Some(permit) => {
                tracing::debug!(bucket = %key, "acquired concurrency slot");
                Ok(ConcurrencySlot {
                    permit: Some(permit),
                    key,
                    buckets: Arc::clone(&self.buckets),
                })
            }
            None => Err(CommandError::MaxConcurrencyReached {
                number: self.number,
                per: self.per,
            }),
        }
    }

    /// Number of slots currently held in the interaction's bucket.
    pub fn in_flight(&self, inter: &Interaction) -> usize {
        let key = self.per.key(inter);
        let buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        buckets
            .get(&key)
            .map_or(0, |sem| self.number - sem.available_permits())
    }
}

/// A held concurrency slot.
///
/// The slot goes back to its bucket exactly once: through [`release`](Self::release)
/// or, if the owning invocation is dropped mid-flight, on drop.
#[derive(Debug)]
pub struct ConcurrencySlot {
    permit: Option<OwnedSemaphorePermit>,
    key: String,
    buckets: Buckets,
}

impl ConcurrencySlot {
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(permit) = self.permit.take() {
            drop(permit);
            drop_idle(&self.buckets, &self.key);
            tracing::debug!(bucket = %self.key, "released concurrency slot");
        }
    }
}

impl Drop for ConcurrencySlot {
    fn drop(&mut self) {
        self.release_inner();
    }
}

/// Remove a bucket nobody holds or waits on.
///
/// Every holder and waiter owns a clone of the semaphore `Arc`, and new
/// acquirers clone it under the same lock, so a count of one means idle.
fn drop_idle(buckets: &Buckets, key: &str) {
    let mut buckets = buckets.lock().unwrap_or_else(PoisonError::into_inner);
    if buckets.get(key).is_some_and(|sem| Arc::strong_count(sem) == 1) {
        buckets.remove(key);
    }
}
