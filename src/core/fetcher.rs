use crate::domain::model::FetchResponse;
use crate::domain::ports::Transport;
use crate::utils::error::{Result, WatchError};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(1000);

/// Public CORS relays, in priority order. Each takes the encoded target
/// appended to the prefix.
pub const DEFAULT_RELAYS: [&str; 4] = [
    "https://api.allorigins.win/raw?url=",
    "https://corsproxy.io/?",
    "https://cors-anywhere.herokuapp.com/",
    "https://api.codetabs.com/v1/proxy?quest=",
];

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub relays: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
            relays: DEFAULT_RELAYS.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl RetryPolicy {
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    pub fn relay_for(&self, attempt: u32) -> Option<&str> {
        if self.relays.is_empty() {
            return None;
        }
        let index = attempt as usize % self.relays.len();
        Some(self.relays[index].as_str())
    }
}

// 與瀏覽器 encodeURIComponent 相同的保留字元
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 中繼網址：relay 前綴 + 編碼後的目標網址
pub fn relay_url(relay: &str, target: &str) -> String {
    format!("{}{}", relay, utf8_percent_encode(target, URI_COMPONENT))
}

/// 每次嘗試先直連再走中繼，失敗之間指數退避
pub struct ResilientFetcher<T: Transport> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> ResilientFetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        self.fetch_with_attempts(url, self.policy.max_attempts).await
    }

    pub async fn fetch_with_attempts(&self, url: &str, max_attempts: u32) -> Result<FetchResponse> {
        let attempts = max_attempts.max(1);
        let mut last_error: Option<WatchError> = None;

        for attempt in 0..attempts {
            // 先直接請求
            match self.transport.get(url).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::debug!("Direct request failed for {}: {}", url, e);
                    last_error = Some(e);
                }
            }

            // 失敗時改走中繼
            if let Some(relay) = self.policy.relay_for(attempt) {
                let relayed = relay_url(relay, url);
                tracing::debug!("Retrying {} through relay {}", url, relay);
                match self.transport.get(&relayed).await {
                    Ok(response) => return Ok(response),
                    Err(e) => last_error = Some(e),
                }
            }

            if let Some(e) = &last_error {
                tracing::warn!("Attempt {}/{} failed for {}: {}", attempt + 1, attempts, url, e);
            }

            if attempt + 1 < attempts {
                tokio::time::sleep(self.policy.backoff_delay(attempt)).await;
            }
        }

        let cause = last_error.as_ref().and_then(|e| e.failure_cause());
        Err(WatchError::RetriesExhaustedError {
            attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
            cause,
        })
    }
}
