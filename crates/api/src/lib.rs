//! Execution service client.
//!
//! This crate defines the [`ExecutionService`] contract the controller depends
//! on and a lightweight HTTP/JSON implementation of it. The client focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Discovering credentials from `FLOWDECK_API_TOKEN` or `~/.netrc`
//! - Validating `FLOWDECK_API_BASE` for safety
//! - Mapping HTTP responses onto the typed [`ExecutionServiceError`] taxonomy
//!
//! # Example
//!
//! ```ignore
//! use flowdeck_api::{ExecutionClient, ExecutionService};
//! use flowdeck_types::StatusFilter;
//!
//! async fn failed_runs() -> anyhow::Result<()> {
//!     let client = ExecutionClient::new_from_env()?;
//!     let failed = client.list("failed".parse::<StatusFilter>()?).await?;
//!     println!("{} failed executions", failed.len());
//!     Ok(())
//! }
//! ```

mod error;
mod service;

pub use error::{ExecutionServiceError, Operation};
pub use service::ExecutionService;

use std::time::Duration;
use std::{env, fs};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use flowdeck_types::{ExecutionRecord, StatusFilter};
use flowdeck_util::redact_sensitive;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Environment variable naming the execution service base URL.
pub const API_BASE_ENV: &str = "FLOWDECK_API_BASE";
/// Environment variable carrying the bearer token.
pub const API_TOKEN_ENV: &str = "FLOWDECK_API_TOKEN";
/// Base URL used when `FLOWDECK_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Characters escaped when an execution id is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Connection settings for [`ExecutionClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Resolve settings from the environment.
    ///
    /// Resolution order for authentication:
    /// - `FLOWDECK_API_TOKEN` environment variable
    /// - `~/.netrc` entry whose `machine` matches the base URL host
    pub fn from_env() -> Result<Self> {
        let base_url = env::var(API_BASE_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let parsed = validate_base_url(&base_url)?;
        let token = env::var(API_TOKEN_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| parsed.host_str().and_then(get_netrc_token));
        Ok(Self {
            base_url,
            token,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for the execution service.
///
/// The client pre-configures default headers and builds requests against a
/// validated base URL.
pub struct ExecutionClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl ExecutionClient {
    /// Construct an [`ExecutionClient`] from environment variables and `~/.netrc`.
    pub fn new_from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn new(config: ClientConfig) -> Result<Self> {
        validate_base_url(&config.base_url)?;

        let mut default_headers = header::HeaderMap::new();
        if let Some(token) = config.token.as_deref() {
            let mut authorization =
                header::HeaderValue::from_str(&format!("Bearer {token}")).context("token is not a valid header value")?;
            authorization.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, authorization);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout)
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            user_agent: format!("flowdeck/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: Operation,
        id: Option<&str>,
    ) -> Result<T, ExecutionServiceError> {
        let response = builder.send().await.map_err(|error| {
            warn!(operation = operation.as_str(), error = %error, "execution service request failed");
            transport_error(&error)
        })?;
        read_response(response, operation, id).await
    }
}

#[async_trait]
impl ExecutionService for ExecutionClient {
    async fn list(&self, filter: StatusFilter) -> Result<Vec<ExecutionRecord>, ExecutionServiceError> {
        let mut builder = self.request(reqwest::Method::GET, "/executions");
        if let Some(status) = filter.status() {
            builder = builder.query(&[("status", status.as_str())]);
        }
        let records: Vec<ExecutionRecord> = self.send(builder, Operation::List, None).await?;
        for record in &records {
            record
                .validate()
                .map_err(|error| ExecutionServiceError::InvalidResponse(error.to_string()))?;
        }
        debug!(filter = %filter, count = records.len(), "listed executions");
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
        let builder = self.request(reqwest::Method::GET, &execution_path(id, None));
        let record: ExecutionRecord = self.send(builder, Operation::Get, Some(id)).await?;
        checked(record)
    }

    async fn retry(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
        let builder = self.request(reqwest::Method::POST, &execution_path(id, Some("retry")));
        let record: ExecutionRecord = self.send(builder, Operation::Retry, Some(id)).await?;
        checked(record)
    }

    async fn cancel(&self, id: &str) -> Result<ExecutionRecord, ExecutionServiceError> {
        let builder = self.request(reqwest::Method::POST, &execution_path(id, Some("cancel")));
        let record: ExecutionRecord = self.send(builder, Operation::Cancel, Some(id)).await?;
        checked(record)
    }
}

fn checked(record: ExecutionRecord) -> Result<ExecutionRecord, ExecutionServiceError> {
    record
        .validate()
        .map_err(|error| ExecutionServiceError::InvalidResponse(error.to_string()))?;
    Ok(record)
}

fn execution_path(id: &str, action: Option<&str>) -> String {
    let encoded = utf8_percent_encode(id, PATH_SEGMENT);
    match action {
        Some(action) => format!("/executions/{encoded}/{action}"),
        None => format!("/executions/{encoded}"),
    }
}

/// Error payload returned by the service for non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

async fn read_response<T: DeserializeOwned>(
    response: Response,
    operation: Operation,
    id: Option<&str>,
) -> Result<T, ExecutionServiceError> {
    let status = response.status();
    let body = response.bytes().await.map_err(|error| transport_error(&error))?;

    if status.is_success() {
        return serde_json::from_slice(&body).map_err(|error| {
            warn!(operation = operation.as_str(), error = %error, "undecodable execution service response");
            ExecutionServiceError::InvalidResponse(error.to_string())
        });
    }

    let error_body: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
    let message = error_body.message.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(&body).trim().to_string();
        if text.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            text
        }
    });
    // Error bodies may echo request headers back.
    let message = redact_sensitive(&message);
    let mapped = classify_failure(status, error_body.code.as_deref(), message, operation, id);
    debug!(operation = operation.as_str(), status = status.as_u16(), error = %mapped, "execution service returned an error");
    Err(mapped)
}

/// Map a non-success HTTP status (and optional service error code) onto the error taxonomy.
pub fn classify_failure(
    status: StatusCode,
    code: Option<&str>,
    message: String,
    operation: Operation,
    id: Option<&str>,
) -> ExecutionServiceError {
    let id_owned = id.unwrap_or_default().to_string();
    match (status, code) {
        (_, Some("not_found")) | (StatusCode::NOT_FOUND, _) if id.is_some() => {
            ExecutionServiceError::NotFound { id: id_owned }
        }
        (_, Some("not_retryable")) => ExecutionServiceError::NotRetryable {
            id: id_owned,
            reason: message,
        },
        (_, Some("not_cancellable")) => ExecutionServiceError::NotCancellable {
            id: id_owned,
            reason: message,
        },
        (StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY, _) if operation == Operation::Retry => {
            ExecutionServiceError::NotRetryable {
                id: id_owned,
                reason: message,
            }
        }
        (StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY, _) if operation == Operation::Cancel => {
            ExecutionServiceError::NotCancellable {
                id: id_owned,
                reason: message,
            }
        }
        (StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS, _) => {
            ExecutionServiceError::TransientNetworkFailure(message)
        }
        (status, _) if status.is_server_error() => ExecutionServiceError::TransientNetworkFailure(message),
        (status, _) => ExecutionServiceError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

fn transport_error(error: &reqwest::Error) -> ExecutionServiceError {
    if error.is_decode() {
        return ExecutionServiceError::InvalidResponse(error.to_string());
    }
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "could not connect to the execution service".to_string()
    } else {
        error.to_string()
    };
    ExecutionServiceError::TransientNetworkFailure(message)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
pub fn validate_base_url(base: &str) -> Result<Url> {
    let parsed_base_url = Url::parse(base).map_err(|e| anyhow!("Invalid {API_BASE_ENV} URL '{}': {}", base, e))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| anyhow!("{API_BASE_ENV} must include a host"))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(parsed_base_url);
    }

    if parsed_base_url.scheme() != "https" {
        return Err(anyhow!(
            "{API_BASE_ENV} must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        ));
    }

    Ok(parsed_base_url)
}

/// Attempt to read an API token for `host` from the user's `~/.netrc` file.
fn get_netrc_token(host: &str) -> Option<String> {
    let home = dirs_next::home_dir()?;
    let content = fs::read_to_string(home.join(".netrc")).ok()?;
    parse_netrc_password(&content, host)
}

/// Minimal `.netrc` reader returning the `password` of the `machine <host>` stanza.
///
/// ```text
/// machine flowdeck.example.com
///   login ops
///   password <TOKEN>
/// ```
fn parse_netrc_password(content: &str, host: &str) -> Option<String> {
    let mut tokens = content.split_whitespace();
    let mut in_matching_machine = false;

    while let Some(token) = tokens.next() {
        match token {
            "machine" => {
                in_matching_machine = tokens.next().is_some_and(|name| name.eq_ignore_ascii_case(host));
            }
            "default" => in_matching_machine = false,
            "password" if in_matching_machine => return tokens.next().map(str::to_string),
            _ => {}
        }
    }
    None
}
