//! HTTP implementation of the command boundary.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Every call is one round trip with a 30s
//! global timeout; an expired timeout surfaces as `ClientError::Connection`.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use ureq::Agent;

use rfops_core::{Attack, AttackConfig, CrackingJob, CrackingJobConfig, CrackingProgress};

use crate::error::ClientError;
use crate::traits::CommandClient;

/// Bound on every request round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Service liveness response from `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
}

/// HTTP client for the rfops remote service.
///
/// Implements [`CommandClient`] once per operation kind; the endpoint
/// layout is the service's published contract:
///
/// - `POST   /api/v1/attacks`                      create
/// - `POST   /api/v1/attacks/{id}/start`           start
/// - `DELETE /api/v1/attacks/{id}`                 stop
/// - `GET    /api/v1/attacks/{id}`                 fetch status
/// - `GET    /api/v1/attacks`                      list active
/// - `POST   /api/v1/cracking/jobs`                create
/// - `POST   /api/v1/cracking/jobs/{id}/start`     start
/// - `DELETE /api/v1/cracking/jobs/{id}`           stop
/// - `GET    /api/v1/cracking/jobs/{id}`           fetch status
/// - `GET    /api/v1/cracking/jobs/{id}/progress`  progress snapshot
/// - `GET    /health`                              liveness (no prefix)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    agent: Agent,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: Agent::new_with_config(config),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Service liveness probe, used once at startup.
    pub async fn health(&self) -> Result<Health, ClientError> {
        get_json(self.agent.clone(), format!("{}/health", self.base_url), None).await
    }

    /// All attacks the service currently tracks.
    pub async fn active_attacks(&self) -> Result<Vec<Attack>, ClientError> {
        get_json(self.agent.clone(), self.api_url("/attacks"), None).await
    }

    /// Real-time progress snapshot for a cracking job.
    pub async fn cracking_progress(&self, id: &str) -> Result<CrackingProgress, ClientError> {
        get_json(
            self.agent.clone(),
            self.api_url(&format!("/cracking/jobs/{id}/progress")),
            Some(id.to_string()),
        )
        .await
    }
}

#[async_trait]
impl CommandClient<Attack> for ApiClient {
    async fn create(&self, config: &AttackConfig) -> Result<Attack, ClientError> {
        let body = encode(config)?;
        post_json(self.agent.clone(), self.api_url("/attacks"), body).await
    }

    async fn start(&self, id: &str) -> Result<Attack, ClientError> {
        post_empty(
            self.agent.clone(),
            self.api_url(&format!("/attacks/{id}/start")),
            id.to_string(),
        )
        .await
    }

    async fn stop(&self, id: &str) -> Result<Attack, ClientError> {
        delete_json(
            self.agent.clone(),
            self.api_url(&format!("/attacks/{id}")),
            id.to_string(),
        )
        .await
    }

    async fn fetch_status(&self, id: &str) -> Result<Attack, ClientError> {
        get_json(
            self.agent.clone(),
            self.api_url(&format!("/attacks/{id}")),
            Some(id.to_string()),
        )
        .await
    }
}

#[async_trait]
impl CommandClient<CrackingJob> for ApiClient {
    async fn create(&self, config: &CrackingJobConfig) -> Result<CrackingJob, ClientError> {
        let body = encode(config)?;
        post_json(self.agent.clone(), self.api_url("/cracking/jobs"), body).await
    }

    async fn start(&self, id: &str) -> Result<CrackingJob, ClientError> {
        post_empty(
            self.agent.clone(),
            self.api_url(&format!("/cracking/jobs/{id}/start")),
            id.to_string(),
        )
        .await
    }

    async fn stop(&self, id: &str) -> Result<CrackingJob, ClientError> {
        delete_json(
            self.agent.clone(),
            self.api_url(&format!("/cracking/jobs/{id}")),
            id.to_string(),
        )
        .await
    }

    async fn fetch_status(&self, id: &str) -> Result<CrackingJob, ClientError> {
        get_json(
            self.agent.clone(),
            self.api_url(&format!("/cracking/jobs/{id}")),
            Some(id.to_string()),
        )
        .await
    }
}

// ──────────────────────────────────────────────
// Request plumbing
// ──────────────────────────────────────────────

fn encode<B: serde::Serialize>(body: &B) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::Connection {
        message: format!("failed to encode request body: {e}"),
    })
}

async fn get_json<T>(agent: Agent, url: String, id: Option<String>) -> Result<T, ClientError>
where
    T: DeserializeOwned + Send + 'static,
{
    run_blocking(move || {
        let response = agent
            .get(&url)
            .call()
            .map_err(|e| classify(e, id.as_deref()))?;
        read_body(response)
    })
    .await
}

async fn post_json<T>(agent: Agent, url: String, body: serde_json::Value) -> Result<T, ClientError>
where
    T: DeserializeOwned + Send + 'static,
{
    run_blocking(move || {
        let response = agent
            .post(&url)
            .send_json(&body)
            .map_err(|e| classify(e, None))?;
        read_body(response)
    })
    .await
}

async fn post_empty<T>(agent: Agent, url: String, id: String) -> Result<T, ClientError>
where
    T: DeserializeOwned + Send + 'static,
{
    run_blocking(move || {
        let response = agent
            .post(&url)
            .send_empty()
            .map_err(|e| classify(e, Some(&id)))?;
        read_body(response)
    })
    .await
}

async fn delete_json<T>(agent: Agent, url: String, id: String) -> Result<T, ClientError>
where
    T: DeserializeOwned + Send + 'static,
{
    run_blocking(move || {
        let response = agent
            .delete(&url)
            .call()
            .map_err(|e| classify(e, Some(&id)))?;
        read_body(response)
    })
    .await
}

async fn run_blocking<T, F>(f: F) -> Result<T, ClientError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ClientError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ClientError::Connection {
            message: format!("task join error: {e}"),
        })?
}

fn read_body<T: DeserializeOwned>(
    response: ureq::http::Response<ureq::Body>,
) -> Result<T, ClientError> {
    response
        .into_body()
        .read_json()
        .map_err(|e| ClientError::Connection {
            message: format!("failed to parse service response: {e}"),
        })
}

/// Map a transport-level error to the client taxonomy.
///
/// 404 means the service does not know the id; 400/422 mean it rejected
/// the request content. Everything else, timeouts included, is a
/// connection failure.
fn classify(err: ureq::Error, id: Option<&str>) -> ClientError {
    match err {
        ureq::Error::StatusCode(404) => match id {
            Some(id) => ClientError::NotFound { id: id.to_string() },
            None => ClientError::Connection {
                message: "service returned HTTP 404".to_string(),
            },
        },
        ureq::Error::StatusCode(code @ (400 | 422)) => ClientError::Validation {
            message: format!("service returned HTTP {code}"),
        },
        other => ClientError::Connection {
            message: other.to_string(),
        },
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_urls_are_prefixed_and_trimmed() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(
            client.api_url("/attacks"),
            "http://localhost:8000/api/v1/attacks"
        );
        assert_eq!(
            client.api_url("/cracking/jobs/j1/progress"),
            "http://localhost:8000/api/v1/cracking/jobs/j1/progress"
        );
    }

    #[test]
    fn not_found_maps_to_not_found_when_id_known() {
        let err = classify(ureq::Error::StatusCode(404), Some("atk-1"));
        assert_eq!(
            err,
            ClientError::NotFound {
                id: "atk-1".to_string()
            }
        );
    }

    #[test]
    fn not_found_without_id_is_a_connection_error() {
        let err = classify(ureq::Error::StatusCode(404), None);
        assert!(matches!(err, ClientError::Connection { .. }));
    }

    #[test]
    fn client_rejections_map_to_validation() {
        for code in [400, 422] {
            let err = classify(ureq::Error::StatusCode(code), Some("atk-1"));
            assert!(matches!(err, ClientError::Validation { .. }), "{code}");
        }
    }

    #[test]
    fn other_statuses_map_to_connection() {
        for code in [401, 403, 500, 503] {
            let err = classify(ureq::Error::StatusCode(code), Some("atk-1"));
            assert!(matches!(err, ClientError::Connection { .. }), "{code}");
        }
    }

    #[test]
    fn health_deserializes() {
        let health: Health = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(health.status, "ok");
    }
}
