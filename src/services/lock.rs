//! Single-flight lock map
//!
//! Best-effort mutual exclusion across update jobs: one entry per course code
//! plus a global entry for the "all courses" sweep. Acquisition is an atomic
//! put-if-absent under a single mutex, and entries carry a TTL so an
//! abandoned lock self-expires instead of deadlocking forever. The TTL is a
//! crude deadlock-breaker, not a correctness mechanism.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Lock key for the "update all courses" sweep
pub const ALL_COURSES_KEY: &str = "ALL";

/// Shared TTL'd lock map
#[derive(Debug, Clone)]
pub struct LockMap {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, Instant>>>,
}

impl LockMap {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        // A poisoned mutex only means a panic elsewhere; the map itself
        // is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Try to take the lock for `key`. Returns true if this caller now
    /// holds it, false if another holder is active.
    pub fn try_acquire(&self, key: &str) -> bool {
        let mut entries = self.lock_entries();
        let now = Instant::now();
        entries.retain(|_, expires_at| *expires_at > now);
        match entries.entry(key.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(now + self.ttl);
                true
            }
        }
    }

    /// Release the lock for `key`. Releasing an unheld key is a no-op.
    pub fn release(&self, key: &str) {
        self.lock_entries().remove(key);
    }

    /// Whether a live (unexpired) lock exists for `key`
    pub fn is_held(&self, key: &str) -> bool {
        let entries = self.lock_entries();
        entries
            .get(key)
            .map(|expires_at| *expires_at > Instant::now())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let locks = LockMap::new(Duration::from_secs(60));
        assert!(locks.try_acquire("PVT"));
        assert!(!locks.try_acquire("PVT"));
        assert!(locks.is_held("PVT"));
    }

    #[test]
    fn release_allows_reacquire() {
        let locks = LockMap::new(Duration::from_secs(60));
        assert!(locks.try_acquire("PVT"));
        locks.release("PVT");
        assert!(!locks.is_held("PVT"));
        assert!(locks.try_acquire("PVT"));
    }

    #[test]
    fn course_and_global_locks_are_independent() {
        let locks = LockMap::new(Duration::from_secs(60));
        assert!(locks.try_acquire(ALL_COURSES_KEY));
        assert!(locks.try_acquire("PVT"));
        assert!(locks.try_acquire("IFR"));
    }

    #[test]
    fn expired_lock_can_be_reacquired() {
        let locks = LockMap::new(Duration::from_millis(20));
        assert!(locks.try_acquire("PVT"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(!locks.is_held("PVT"));
        assert!(locks.try_acquire("PVT"));
    }
}
