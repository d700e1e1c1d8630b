use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Hands out recompute tickets and keeps the snapshot of the newest ticket
/// that finished.
///
/// Tunable-parameter changes supersede each other: whoever holds the newest
/// ticket owns the result slot, and a recompute that finishes after a newer
/// ticket was issued is discarded on arrival, never merged. Snapshots are
/// shared behind `Arc`, so readers keep whatever snapshot they already hold
/// while a replacement lands.
#[derive(Debug)]
pub struct RecomputeSession<T> {
    counter: AtomicU64,
    latest: Mutex<Option<(u64, Arc<T>)>>,
}

impl<T> RecomputeSession<T> {
    pub fn new() -> RecomputeSession<T> {
        RecomputeSession {
            counter: AtomicU64::new(0),
            latest: Mutex::new(None),
        }
    }

    /// Starts a recompute and returns its ticket. Tickets increase
    /// monotonically; issuing a new one supersedes every ticket before it.
    pub fn begin(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while no newer ticket has been issued.
    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.counter.load(Ordering::SeqCst)
    }

    /// Offers a finished snapshot. It is installed only while its ticket is
    /// still the newest issued; the snapshot is returned either way so the
    /// caller can serve its own result even when it lost the race.
    pub fn install(&self, ticket: u64, value: T) -> Arc<T> {
        let snapshot = Arc::new(value);
        let mut latest = self.latest.lock().unwrap();
        if self.is_current(ticket) {
            let regressive = matches!(&*latest, Some((installed, _)) if *installed >= ticket);
            if !regressive {
                *latest = Some((ticket, Arc::clone(&snapshot)));
            }
        }
        snapshot
    }

    /// Newest installed snapshot, if any recompute has completed.
    pub fn latest(&self) -> Option<(u64, Arc<T>)> {
        self.latest.lock().unwrap().clone()
    }
}

impl<T> Default for RecomputeSession<T> {
    fn default() -> RecomputeSession<T> {
        RecomputeSession::new()
    }
}
