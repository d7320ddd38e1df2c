//! reqwest-backed Rise API client.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use rise_types::{AccountSession, PlanSummary};

use crate::{
    MutationError, MutationFut, MutationMethod, MutationRequest, MutationService,
    extract_error_message,
};

const CONNECT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;
const MAX_RESPONSE_BODY_BYTES: usize = 1024 * 1024;

/// Base URL, credentials and timeout for the Rise API.
///
/// The constructor enforces HTTPS for anything but loopback hosts, so a
/// misconfigured production endpoint fails at startup rather than leaking a
/// bearer token over plain HTTP.
#[derive(Clone)]
pub struct ApiConfig {
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiConfigError {
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("API base URL {0:?} must use https")]
    InsecureScheme(String),
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ApiConfigError> {
        let parsed = Url::parse(base_url.trim()).map_err(|e| ApiConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "https" => {}
            "http" if is_loopback(&parsed) => {}
            "http" => return Err(ApiConfigError::InsecureScheme(base_url.to_string())),
            other => {
                return Err(ApiConfigError::InvalidUrl {
                    url: base_url.to_string(),
                    reason: format!("unsupported scheme {other}"),
                });
            }
        }
        Ok(Self {
            base_url: parsed,
            token: None,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<Url, MutationError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| MutationError::InvalidRequest(format!("{path}: {e}")))
    }
}

// Manual Debug impl to prevent leaking the bearer token in logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn is_loopback(url: &Url) -> bool {
    matches!(
        url.host_str(),
        Some("localhost" | "127.0.0.1" | "[::1]" | "::1")
    )
}

fn base_client_builder() -> reqwest::ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    default_headers.insert("x-rise-client", HeaderValue::from_static("rust"));
    default_headers.insert(
        "x-rise-os",
        HeaderValue::from_static(std::env::consts::OS),
    );

    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

/// Client for the Rise API. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let http = base_client_builder()
            .https_only(config.base_url.scheme() == "https")
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Send one request and decode the JSON response.
    ///
    /// Non-GET requests carry a fresh `Idempotency-Key` so the server can
    /// recognise a duplicated delivery of the same attempt.
    pub async fn send(&self, request: MutationRequest) -> Result<Value, MutationError> {
        let mut url = self.config.endpoint(&request.path)?;
        let builder = match request.method {
            MutationMethod::Get => {
                append_query(&mut url, &request.payload)?;
                self.http.get(url)
            }
            MutationMethod::Post => self
                .http
                .post(url)
                .header("Idempotency-Key", Uuid::new_v4().to_string())
                .json(&request.payload),
        };
        let builder = match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        tracing::debug!(method = request.method.as_str(), path = %request.path, "Sending API request");
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let (body, _truncated) = read_capped_body(response, MAX_ERROR_BODY_BYTES).await;
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            tracing::debug!(%status, path = %request.path, "API request rejected");
            return Err(MutationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let (body, truncated) = read_capped_body(response, MAX_RESPONSE_BODY_BYTES).await;
        if truncated {
            return Err(MutationError::Decode(format!(
                "response exceeded {MAX_RESPONSE_BODY_BYTES} bytes"
            )));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| MutationError::Decode(e.to_string()))
    }

    /// Balances for the signed-in account.
    pub async fn session(&self) -> Result<AccountSession, MutationError> {
        self.fetch("/sessions").await
    }

    /// All plans belonging to the signed-in account.
    pub async fn plans(&self) -> Result<Vec<PlanSummary>, MutationError> {
        self.fetch("/plans").await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, MutationError> {
        let value = self.send(MutationRequest::get(path, Value::Null)).await?;
        serde_json::from_value(value).map_err(|e| MutationError::Decode(e.to_string()))
    }
}

impl MutationService for ApiClient {
    fn mutate(&self, request: MutationRequest) -> MutationFut {
        let client = self.clone();
        Box::pin(async move { client.send(request).await })
    }
}

fn transport_error(err: reqwest::Error) -> MutationError {
    if err.is_timeout() {
        MutationError::Network("timeout".to_string())
    } else if err.is_connect() {
        MutationError::Network("could not reach the server".to_string())
    } else {
        MutationError::Network(format!("request failed: {err}"))
    }
}

fn append_query(url: &mut Url, payload: &Value) -> Result<(), MutationError> {
    let map = match payload {
        Value::Null => return Ok(()),
        Value::Object(map) => map,
        _ => {
            return Err(MutationError::InvalidRequest(
                "GET payload must be an object".to_string(),
            ));
        }
    };
    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(_) | Value::Number(_) => value.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(MutationError::InvalidRequest(format!(
                    "query parameter {key} must be a scalar"
                )));
            }
        };
        pairs.push((key.as_str(), rendered));
    }
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in pairs {
            query.append_pair(key, &value);
        }
    }
    Ok(())
}

/// Read at most `limit` bytes of a response body. The flag reports truncation.
async fn read_capped_body(response: reqwest::Response, limit: usize) -> (String, bool) {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > limit {
            body.truncate(limit);
            return (String::from_utf8_lossy(&body).into_owned(), true);
        }
    }
    (String::from_utf8_lossy(&body).into_owned(), false)
}
