//! Outbound-call layer: request/outcome types, retry classification, and the
//! SSRF guard applied to caller-supplied targets.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use url::Url;

pub mod caller;
pub mod guard;

pub use caller::ResilientCaller;
pub use guard::{GuardError, sanitize_for_prompt, validate_external_url};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// One outbound request, with the per-attempt timeout and the attempt bound.
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub url: Url,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
    max_attempts: u32,
}

impl CallRequest {
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url, None)
    }

    #[must_use]
    pub fn post(url: Url, body: Value) -> Self {
        Self::new(Method::POST, url, Some(body))
    }

    #[must_use]
    pub fn new(method: Method, url: Url, body: Option<Value>) -> Self {
        Self {
            url,
            method,
            headers: Vec::new(),
            body,
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the attempt bound; values below one are raised to one.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Ephemeral per-attempt failure that is worth retrying.
#[derive(Debug, Clone)]
pub enum AttemptError {
    TimedOut { timeout: Duration },
    Status { status: u16 },
    Transport(String),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut { timeout } => {
                write!(f, "request timed out after {}s", timeout.as_secs_f64())
            }
            Self::Status { status } => write!(f, "upstream returned status {status}"),
            Self::Transport(message) => write!(f, "transport error: {message}"),
        }
    }
}

impl Error for AttemptError {}

/// Terminal outbound failure; never retried further.
#[derive(Debug, Clone)]
pub enum CallError {
    /// Non-retryable upstream status with best-effort extracted detail.
    Status { status: u16, detail: String },
    /// Every attempt was consumed; carries the last retryable cause.
    Exhausted { attempts: u32, last: String },
    /// The upstream answered successfully but the payload did not decode.
    Decode(String),
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, detail } => {
                write!(f, "upstream returned {status}: {detail}")
            }
            Self::Exhausted { attempts, last } => {
                write!(f, "request failed after {attempts} attempts: {last}")
            }
            Self::Decode(message) => write!(f, "failed to decode response payload: {message}"),
        }
    }
}

impl Error for CallError {}

/// Deterministic backoff schedule: `2^attempt` seconds, no jitter.
#[must_use]
pub const fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn attempt_bound_is_at_least_one() {
        let url = Url::parse("https://example.com/").expect("static URL");
        let request = CallRequest::get(url).with_max_attempts(0);
        assert_eq!(request.max_attempts(), 1);
    }

    #[test]
    fn timeout_message_carries_seconds() {
        let err = AttemptError::TimedOut {
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "request timed out after 1.5s");
    }
}
