use crate::domain::model::{FailureCause, FetchResponse};
use crate::domain::ports::Transport;
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ACCEPT: &str = "application/json, text/plain, */*";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; EmbassyMap/1.0)";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// reqwest-backed transport with a fixed timeout and header set.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    accept: String,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str, accept: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            accept: accept.to_string(),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, DEFAULT_ACCEPT)
    }
}

fn classify(err: &reqwest::Error) -> FailureCause {
    if err.is_timeout() {
        FailureCause::Timeout
    } else if err.is_connect() {
        FailureCause::Connect
    } else if let Some(status) = err.status() {
        FailureCause::HttpStatus(status.as_u16())
    } else if err.is_body() || err.is_decode() {
        FailureCause::Body
    } else {
        FailureCause::Request
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> WatchError {
    WatchError::TransportError {
        url: url.to_string(),
        cause: classify(&err),
        message: err.to_string(),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, self.accept.as_str())
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        tracing::debug!("Response status for {}: {}", url, status);

        if !status.is_success() {
            return Err(WatchError::TransportError {
                url: url.to_string(),
                cause: FailureCause::HttpStatus(status.as_u16()),
                message: format!("unexpected status {}", status),
            });
        }

        let body = response.text().await.map_err(|e| transport_error(url, e))?;

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }
}
