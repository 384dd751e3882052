//! Request pipeline for the Tycoon API
//!
//! Every endpoint call goes through [`HttpClient::execute`]: dispatch against
//! the pool's active origin, classify the outcome, and either return, fail
//! fast, or rotate to the next origin and replay. Classification is an
//! explicit ordered function returning a tagged outcome, consumed by a
//! driver loop with no hidden interceptor control flow.

use crate::charges::ChargeTracker;
use crate::server::ServerPool;
use crate::{Error, Result};
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, trace, warn};

/// Request header carrying the account API key
pub const API_KEY_HEADER: &str = "X-Tycoon-Key";

/// Request header for endpoints that accept a caller-supplied public key
/// instead of the account key
pub const PUBLIC_KEY_HEADER: &str = "X-Tycoon-Public-Key";

/// Where a request is aimed: at the rotating pool, or at one fixed origin.
#[derive(Debug, Clone)]
pub(crate) enum Target {
    /// Path under the active pool origin's `/status` base. Rebuilt against
    /// the new origin on replay.
    Relative(String),
    /// Fully-qualified URL addressing a fixed origin. Rotation cannot move
    /// such a request to a different host, which narrows how its failures
    /// may be retried.
    Absolute(String),
}

/// Everything needed to replay one call against a new origin.
#[derive(Debug, Clone)]
pub(crate) struct RequestDescriptor {
    target: Target,
    headers: Vec<(&'static str, String)>,
}

impl RequestDescriptor {
    pub(crate) fn relative(path: impl Into<String>) -> Self {
        Self {
            target: Target::Relative(path.into()),
            headers: Vec::new(),
        }
    }

    pub(crate) fn absolute(url: impl Into<String>) -> Self {
        Self {
            target: Target::Absolute(url.into()),
            headers: Vec::new(),
        }
    }

    pub(crate) fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    fn is_absolute(&self) -> bool {
        matches!(self.target, Target::Absolute(_))
    }

    /// Path shown in route errors
    fn display_path(&self) -> &str {
        match &self.target {
            Target::Relative(path) => path,
            Target::Absolute(url) => url,
        }
    }
}

/// Outcome of classifying one dispatch
enum Outcome {
    Success(Response),
    /// Permanent API failure, surfaced immediately
    Fatal(Error),
    /// Transient network condition, candidate for rotation and replay
    Transient(reqwest::Error),
    /// Unclassified failure, surfaced verbatim
    Passthrough(Error),
}

/// Transport wrapper shared by every endpoint call.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: Client,
    pool: ServerPool,
    charges: ChargeTracker,
    api_key: Option<String>,
    max_retries: u32,
    disable_retry: bool,
    /// Replays consumed by the current chain of transient failures. Shared
    /// across in-flight calls; reset to zero by any success.
    attempts: Arc<AtomicU32>,
}

impl HttpClient {
    pub(crate) fn new(
        client: Client,
        pool: ServerPool,
        charges: ChargeTracker,
        api_key: Option<String>,
        max_retries: u32,
        disable_retry: bool,
    ) -> Self {
        Self {
            client,
            pool,
            charges,
            api_key,
            max_retries,
            disable_retry,
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }

    pub(crate) fn pool(&self) -> &ServerPool {
        &self.pool
    }

    pub(crate) fn charges(&self) -> &ChargeTracker {
        &self.charges
    }

    pub(crate) fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[cfg(test)]
    pub(crate) fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// GET a pool-relative path through the full pipeline
    pub(crate) async fn get(&self, path: impl Into<String>) -> Result<Response> {
        self.execute(RequestDescriptor::relative(path)).await
    }

    /// GET an absolute URL through the full pipeline
    pub(crate) async fn get_absolute(&self, url: impl Into<String>) -> Result<Response> {
        self.execute(RequestDescriptor::absolute(url)).await
    }

    fn request_url(&self, descriptor: &RequestDescriptor) -> String {
        match &descriptor.target {
            Target::Relative(path) => {
                format!("http://{}/status{}", self.pool.current(), path)
            }
            Target::Absolute(url) => url.clone(),
        }
    }

    async fn dispatch(
        &self,
        url: &str,
        descriptor: &RequestDescriptor,
    ) -> std::result::Result<Response, reqwest::Error> {
        let mut request = self.client.get(url);
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        for (name, value) in &descriptor.headers {
            request = request.header(*name, value);
        }
        request.send().await
    }

    /// Classify one dispatch outcome, in priority order: permanent API
    /// failures first, then the retry-disable switch, then the transient
    /// network class, then passthrough.
    fn classify(
        &self,
        result: std::result::Result<Response, reqwest::Error>,
        descriptor: &RequestDescriptor,
    ) -> Outcome {
        match result {
            Ok(response) => {
                let status = response.status();
                trace!("Response status: {}", status);
                if status.is_success() {
                    return Outcome::Success(response);
                }
                match status {
                    StatusCode::PAYMENT_REQUIRED => Outcome::Fatal(Error::NoCharges),
                    StatusCode::UNAUTHORIZED => Outcome::Fatal(Error::KeyRequired),
                    StatusCode::FORBIDDEN => Outcome::Fatal(Error::InvalidKey),
                    StatusCode::NOT_FOUND => {
                        Outcome::Fatal(Error::invalid_route(descriptor.display_path()))
                    }
                    _ => {
                        let error = response.error_for_status().unwrap_err();
                        if !self.disable_retry && status == StatusCode::BAD_GATEWAY {
                            Outcome::Transient(error)
                        } else {
                            Outcome::Passthrough(Error::Http(error))
                        }
                    }
                }
            }
            Err(error) => {
                if self.disable_retry {
                    return Outcome::Passthrough(Error::Http(error));
                }
                // Aborted (timed out) requests can be replayed anywhere. A
                // reset connection on an absolute URL addresses a fixed
                // origin, so rotating the pool cannot help.
                if error.is_connect() && descriptor.is_absolute() {
                    Outcome::Passthrough(Error::Http(error))
                } else if error.is_timeout() || error.is_connect() {
                    Outcome::Transient(error)
                } else {
                    Outcome::Passthrough(Error::Http(error))
                }
            }
        }
    }

    /// Drive one logical call: dispatch, classify, and on a transient
    /// failure rotate the pool, probe the new origin, and replay, bounded
    /// by the retry budget.
    pub(crate) async fn execute(&self, descriptor: RequestDescriptor) -> Result<Response> {
        loop {
            let url = self.request_url(&descriptor);
            debug!("Dispatching GET {}", url);

            let result = self.dispatch(&url, &descriptor).await;
            match self.classify(result, &descriptor) {
                Outcome::Success(response) => {
                    self.attempts.store(0, Ordering::Relaxed);
                    self.charges.sync_from_response(response.headers());
                    return Ok(response);
                }
                Outcome::Fatal(error) | Outcome::Passthrough(error) => return Err(error),
                Outcome::Transient(error) => {
                    let origin = self.pool.rotate().to_string();
                    let attempts = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
                    if attempts > self.max_retries {
                        self.attempts.store(0, Ordering::Relaxed);
                        warn!(
                            "Retry budget exhausted after {} replays: {}",
                            attempts - 1,
                            error
                        );
                        return Err(Error::MaxRetriesExceeded { source: error });
                    }

                    warn!(
                        "Transient failure ({}), rotating to {} (attempt {})",
                        error, origin, attempts
                    );

                    if let Err(probe_error) = self.pool.probe_alive(&self.client, &origin).await {
                        debug!(
                            "Liveness probe against {} failed ({}), abandoning replay",
                            origin, probe_error
                        );
                        return Err(Error::Http(error));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pipeline(hosts: Vec<String>, max_retries: u32) -> HttpClient {
        HttpClient::new(
            Client::new(),
            ServerPool::new(hosts).unwrap(),
            ChargeTracker::new(false),
            None,
            max_retries,
            false,
        )
    }

    fn host(server: &MockServer) -> String {
        server.uri().strip_prefix("http://").unwrap().to_string()
    }

    async fn mount_status(server: &MockServer, endpoint: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_attempts_count_transient_failures() {
        let primary = MockServer::start().await;
        let backup = MockServer::start().await;

        mount_status(&primary, "/status/x", ResponseTemplate::new(502)).await;
        // Backup answers its liveness probe with an error, so the replay is
        // abandoned after exactly one transient failure.
        mount_status(&backup, "/status/alive", ResponseTemplate::new(500)).await;

        let http = pipeline(vec![host(&primary), host(&backup)], 3);
        let err = http.get("/x").await.unwrap_err();

        assert!(matches!(err, Error::Http(_)));
        assert_eq!(http.attempts(), 1);
        assert_eq!(http.pool().cursor(), 1);
    }

    #[tokio::test]
    async fn test_attempts_reset_on_success() {
        let primary = MockServer::start().await;
        let backup = MockServer::start().await;

        mount_status(&primary, "/status/x", ResponseTemplate::new(502)).await;
        mount_status(&backup, "/status/alive", ResponseTemplate::new(200)).await;
        mount_status(&backup, "/status/x", ResponseTemplate::new(200)).await;

        let http = pipeline(vec![host(&primary), host(&backup)], 3);
        http.get("/x").await.unwrap();

        assert_eq!(http.attempts(), 0);
        assert_eq!(http.pool().cursor(), 1);
    }

    #[tokio::test]
    async fn test_budget_trip_resets_attempts() {
        let only = MockServer::start().await;

        mount_status(&only, "/status/x", ResponseTemplate::new(502)).await;
        mount_status(&only, "/status/alive", ResponseTemplate::new(200)).await;

        // Zero budget: the first transient failure already exceeds it, so no
        // replay is dispatched at all.
        let http = pipeline(vec![host(&only)], 0);
        let err = http.get("/x").await.unwrap_err();

        assert!(matches!(err, Error::MaxRetriesExceeded { .. }));
        assert_eq!(http.attempts(), 0);
    }
}
