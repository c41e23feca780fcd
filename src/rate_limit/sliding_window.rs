use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Per-client sliding-window request tracking.
///
/// Each client maps to the timestamps of its recent requests, in arrival
/// order. The dashmap entry guard serializes record calls for one client
/// while leaving other clients' shards untouched, which is what makes the
/// append-then-prune-then-count sequence race-free without a global lock.
pub struct ClientWindowStore {
    window: Duration,
    clients: DashMap<String, Vec<Instant>>,
}

impl ClientWindowStore {
    /// Create a store tracking a trailing window of the given duration
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            clients: DashMap::new(),
        }
    }

    /// Record one request for a client and return the in-window count.
    ///
    /// Appends `now`, drops every timestamp at or before `now - window`
    /// (strictly "within window" means `t > now - window`), and returns the
    /// count including the entry just recorded. Pruning here touches only
    /// this client's entry, so the cost is independent of how many other
    /// clients are tracked.
    pub fn record(&self, client_id: &str, now: Instant) -> usize {
        let mut timestamps = self.clients.entry(client_id.to_string()).or_default();
        timestamps.push(now);
        drop_expired(&mut timestamps, cutoff(now, self.window));
        timestamps.len()
    }

    /// Store-wide maintenance: prune every client and evict entries whose
    /// timestamp sequence has emptied out. Keeps memory bounded across an
    /// ever-changing population of distinct clients.
    pub fn prune(&self, now: Instant) {
        let cutoff = cutoff(now, self.window);
        self.clients.retain(|_, timestamps| {
            drop_expired(timestamps, cutoff);
            !timestamps.is_empty()
        });
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Start of the trailing window, or None when the process clock is younger
/// than the window itself (nothing can be stale yet in that case).
fn cutoff(now: Instant, window: Duration) -> Option<Instant> {
    now.checked_sub(window)
}

fn drop_expired(timestamps: &mut Vec<Instant>, cutoff: Option<Instant>) {
    if let Some(cutoff) = cutoff {
        timestamps.retain(|t| *t > cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    /// Base instant far enough in the future that `now - window` is
    /// always representable in tests
    fn base() -> Instant {
        Instant::now() + Duration::from_secs(3600)
    }

    #[test]
    fn test_record_counts_within_window() {
        let store = ClientWindowStore::new(WINDOW);
        let t0 = base();

        assert_eq!(store.record("c1", t0), 1);
        assert_eq!(store.record("c1", t0 + Duration::from_secs(1)), 2);
        assert_eq!(store.record("c1", t0 + Duration::from_secs(2)), 3);
    }

    #[test]
    fn test_record_drops_stale_entries() {
        let store = ClientWindowStore::new(WINDOW);
        let t0 = base();

        store.record("c1", t0);
        store.record("c1", t0 + Duration::from_secs(1));

        // 61s later only the t0+1 entry and the new one remain
        let count = store.record("c1", t0 + Duration::from_secs(61));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let store = ClientWindowStore::new(WINDOW);
        let t0 = base();

        store.record("c1", t0);

        // A timestamp exactly window-duration old is pruned
        let count = store.record("c1", t0 + WINDOW);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_clients_are_independent() {
        let store = ClientWindowStore::new(WINDOW);
        let t0 = base();

        store.record("c1", t0);
        store.record("c1", t0);

        assert_eq!(store.record("c2", t0), 1);
    }

    #[test]
    fn test_prune_evicts_silent_clients() {
        let store = ClientWindowStore::new(WINDOW);
        let t0 = base();

        for i in 0..10 {
            store.record(&format!("client-{}", i), t0);
        }
        assert_eq!(store.tracked_clients(), 10);

        store.prune(t0 + Duration::from_secs(61));
        assert_eq!(store.tracked_clients(), 0);
    }

    #[test]
    fn test_prune_keeps_active_clients() {
        let store = ClientWindowStore::new(WINDOW);
        let t0 = base();

        store.record("stale", t0);
        store.record("active", t0 + Duration::from_secs(30));

        store.prune(t0 + Duration::from_secs(61));
        assert_eq!(store.tracked_clients(), 1);
    }

    #[test]
    fn test_young_clock_keeps_everything() {
        // When the clock is younger than the window there is no cutoff
        let store = ClientWindowStore::new(Duration::from_secs(u64::MAX / 2));
        let now = Instant::now();

        assert_eq!(store.record("c1", now), 1);
        store.prune(now);
        assert_eq!(store.tracked_clients(), 1);
    }
}
