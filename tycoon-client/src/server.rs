//! Server pool with rotation support for the Tycoon API
//!
//! The API is served by a fixed set of interchangeable game servers. The pool
//! keeps them in order together with a rotation cursor; the request pipeline
//! advances the cursor when a server stops answering.

use crate::{Error, Result};
use reqwest::Client;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// Production Tycoon origins, tried in order
pub const DEFAULT_SERVERS: &[&str] = &[
    "server.tycoon.community:30120",
    "server.tycoon.community:30122",
    "server.tycoon.community:30123",
    "server.tycoon.community:30124",
    "server.tycoon.community:30125",
    "na.tycoon.community:30120",
    "na.tycoon.community:30122",
    "na.tycoon.community:30123",
    "na.tycoon.community:30124",
    "na.tycoon.community:30125",
];

/// Liveness endpoint present on every origin
const ALIVE_PATH: &str = "/status/alive";

/// Ordered set of candidate origins plus a rotation cursor.
///
/// The origin list is fixed at construction; only the cursor moves, and only
/// through [`ServerPool::rotate`]. The cursor is shared across clones, so all
/// handles to one client agree on the active origin. Concurrent rotations may
/// overlap, but modulo advancement converges regardless of interleaving.
#[derive(Debug, Clone)]
pub struct ServerPool {
    hosts: Arc<Vec<String>>,
    cursor: Arc<AtomicUsize>,
}

impl ServerPool {
    /// Create a pool from an ordered list of `host:port` origins
    pub fn new(hosts: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let hosts: Vec<String> = hosts.into_iter().map(Into::into).collect();
        if hosts.is_empty() {
            return Err(Error::EmptyServerPool);
        }
        Ok(Self {
            hosts: Arc::new(hosts),
            cursor: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Create a pool of the production Tycoon origins
    pub fn default_pool() -> Self {
        Self {
            hosts: Arc::new(DEFAULT_SERVERS.iter().map(ToString::to_string).collect()),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of origins in the pool
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the pool has no origins (never true for a constructed pool)
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Origin at a caller-chosen index, for endpoints that address a specific
    /// server rather than the rotating one
    pub fn host(&self, index: usize) -> Option<&str> {
        self.hosts.get(index).map(String::as_str)
    }

    /// The active origin
    pub fn current(&self) -> &str {
        &self.hosts[self.cursor.load(Ordering::Relaxed) % self.hosts.len()]
    }

    /// Current cursor position
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed) % self.hosts.len()
    }

    /// Advance the cursor by one position, wrapping at the end of the pool,
    /// and return the new origin.
    ///
    /// A pure state transition: no I/O, no failure mode.
    pub fn rotate(&self) -> &str {
        let len = self.hosts.len();
        let next = match self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cursor| {
                Some((cursor + 1) % len)
            }) {
            Ok(prev) => (prev + 1) % len,
            // The closure never returns None
            Err(cursor) => cursor % len,
        };
        &self.hosts[next]
    }

    /// Probe whether an origin is answering at all.
    ///
    /// Issues a lightweight GET against the origin's liveness endpoint. The
    /// request pipeline runs this against a freshly rotated origin before
    /// committing to a replay.
    pub async fn probe_alive(&self, client: &Client, host: &str) -> Result<()> {
        let url = format!("http://{host}{ALIVE_PATH}");
        trace!("Probing origin liveness at {}", url);
        client.get(&url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool() {
        let pool = ServerPool::default_pool();
        assert_eq!(pool.len(), 10);
        assert_eq!(pool.current(), "server.tycoon.community:30120");
        assert_eq!(pool.cursor(), 0);
    }

    #[test]
    fn test_rotation_wraps() {
        let pool = ServerPool::new(["a:1", "b:2", "c:3"]).unwrap();

        assert_eq!(pool.rotate(), "b:2");
        assert_eq!(pool.rotate(), "c:3");
        assert_eq!(pool.rotate(), "a:1");
        assert_eq!(pool.current(), "a:1");
        assert_eq!(pool.cursor(), 0);
    }

    #[test]
    fn test_single_host_rotation() {
        let pool = ServerPool::new(["only:30120"]).unwrap();

        assert_eq!(pool.rotate(), "only:30120");
        assert_eq!(pool.rotate(), "only:30120");
        assert_eq!(pool.cursor(), 0);
    }

    #[test]
    fn test_empty_pool_rejected() {
        let hosts: Vec<String> = Vec::new();
        assert!(matches!(
            ServerPool::new(hosts),
            Err(Error::EmptyServerPool)
        ));
    }

    #[test]
    fn test_host_by_index() {
        let pool = ServerPool::new(["a:1", "b:2"]).unwrap();
        assert_eq!(pool.host(0), Some("a:1"));
        assert_eq!(pool.host(1), Some("b:2"));
        assert_eq!(pool.host(2), None);
    }

    #[test]
    fn test_cursor_shared_across_clones() {
        let pool = ServerPool::new(["a:1", "b:2"]).unwrap();
        let clone = pool.clone();

        pool.rotate();
        assert_eq!(clone.current(), "b:2");
    }
}
