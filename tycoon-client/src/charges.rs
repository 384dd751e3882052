//! API charge tracking
//!
//! Most key-protected endpoints consume one charge per call. When tracking is
//! enabled the client keeps a local estimate of the remaining allowance:
//! charged endpoints decrement it optimistically before dispatch, and every
//! successful response carrying the charge-count header overwrites it; the
//! header is authoritative over any local bookkeeping.

use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use std::sync::Arc;

/// Response header carrying the remaining charge count
pub const CHARGES_HEADER: &str = "X-Tycoon-Charges";

#[derive(Debug, Default)]
struct ChargeState {
    count: u64,
    loaded: bool,
}

/// Tracks the remaining API charge allowance for a client.
///
/// State is shared across clones of the client. Updates from concurrent
/// responses are last-write-wins, consistent with the header being the
/// source of truth.
#[derive(Debug, Clone)]
pub struct ChargeTracker {
    checking: bool,
    state: Arc<Mutex<ChargeState>>,
}

impl ChargeTracker {
    pub(crate) fn new(checking: bool) -> Self {
        Self {
            checking,
            state: Arc::new(Mutex::new(ChargeState::default())),
        }
    }

    /// Whether charge tracking is enabled for this client
    pub fn checking(&self) -> bool {
        self.checking
    }

    /// Last known remaining charge count
    pub fn count(&self) -> u64 {
        self.state.lock().count
    }

    /// Whether the count has been populated, either by the explicit setup
    /// call or by a response header
    pub fn loaded(&self) -> bool {
        self.state.lock().loaded
    }

    /// Overwrite the count from an explicit charge check
    pub(crate) fn store(&self, count: u64) {
        let mut state = self.state.lock();
        state.count = count;
        state.loaded = true;
    }

    /// Synchronize the count from a successful response.
    ///
    /// A present charge header overwrites the local count, replacing any
    /// optimistic decrements made since the last sync.
    pub(crate) fn sync_from_response(&self, headers: &HeaderMap) {
        if !self.checking {
            return;
        }
        let Some(count) = headers
            .get(CHARGES_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
        else {
            return;
        };
        let mut state = self.state.lock();
        state.count = count;
        state.loaded = true;
    }

    /// Record one charge as spent ahead of dispatch, pending the
    /// authoritative header sync. Never drops the count below zero.
    pub(crate) fn optimistic_decrement(&self) {
        if !self.checking {
            return;
        }
        let mut state = self.state.lock();
        if state.count > 0 {
            state.count -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers_with_count(count: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-tycoon-charges"),
            HeaderValue::from_str(count).unwrap(),
        );
        headers
    }

    #[test]
    fn test_header_overwrites_local_count() {
        let tracker = ChargeTracker::new(true);
        tracker.store(100);
        tracker.optimistic_decrement();
        tracker.optimistic_decrement();
        assert_eq!(tracker.count(), 98);

        tracker.sync_from_response(&headers_with_count("5"));
        assert_eq!(tracker.count(), 5);
        assert!(tracker.loaded());
    }

    #[test]
    fn test_decrement_never_goes_negative() {
        let tracker = ChargeTracker::new(true);
        assert_eq!(tracker.count(), 0);

        tracker.optimistic_decrement();
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn test_disabled_tracker_ignores_headers() {
        let tracker = ChargeTracker::new(false);
        tracker.sync_from_response(&headers_with_count("7"));

        assert_eq!(tracker.count(), 0);
        assert!(!tracker.loaded());
    }

    #[test]
    fn test_missing_header_leaves_count() {
        let tracker = ChargeTracker::new(true);
        tracker.store(3);
        tracker.sync_from_response(&HeaderMap::new());
        assert_eq!(tracker.count(), 3);
    }

    #[test]
    fn test_unparseable_header_ignored() {
        let tracker = ChargeTracker::new(true);
        tracker.store(3);
        tracker.sync_from_response(&headers_with_count("not-a-number"));
        assert_eq!(tracker.count(), 3);
    }
}
