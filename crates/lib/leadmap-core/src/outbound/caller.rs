//! Resilient outbound caller: bounded per-attempt timeout, exponential
//! backoff on transient failures, immediate surfacing of terminal ones.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{AttemptError, CallError, CallRequest, backoff_delay};

const MAX_DETAIL_CHARS: usize = 200;

enum AttemptFailure {
    Retryable(AttemptError),
    Terminal(CallError),
}

/// Shared outbound HTTP caller.
///
/// One `reqwest::Client` backs every call so connection pools and TLS
/// sessions are reused across invocations.
#[derive(Debug, Clone, Default)]
pub struct ResilientCaller {
    client: Client,
}

impl ResilientCaller {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Performs the request, retrying timeouts, 429s, and 5xx responses with
    /// `2^attempt`-second backoff between attempts.
    ///
    /// At most `request.max_attempts()` network attempts occur, strictly in
    /// sequence, and no backoff wait runs after the final attempt.
    ///
    /// # Errors
    /// Returns `CallError::Status` for a non-retryable upstream status,
    /// `CallError::Decode` when a success body does not parse into `T`, and
    /// `CallError::Exhausted` when every attempt failed transiently.
    pub async fn call<T: DeserializeOwned>(&self, request: CallRequest) -> Result<T, CallError> {
        let max_attempts = request.max_attempts();
        let mut last_cause = String::new();

        for attempt in 0..max_attempts {
            let outcome = match tokio::time::timeout(request.timeout, self.attempt(&request)).await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(AttemptFailure::Retryable(AttemptError::TimedOut {
                    timeout: request.timeout,
                })),
            };

            match outcome {
                Ok(payload) => return Ok(payload),
                Err(AttemptFailure::Terminal(err)) => return Err(err),
                Err(AttemptFailure::Retryable(cause)) => {
                    debug!(
                        url = %request.url,
                        attempt = attempt + 1,
                        max_attempts,
                        %cause,
                        "retryable outbound failure"
                    );
                    last_cause = cause.to_string();
                    if attempt + 1 < max_attempts {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        Err(CallError::Exhausted {
            attempts: max_attempts,
            last: last_cause,
        })
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        request: &CallRequest,
    ) -> Result<T, AttemptFailure> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            AttemptFailure::Retryable(AttemptError::Transport(err.to_string()))
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(AttemptFailure::Retryable(AttemptError::Status {
                status: status.as_u16(),
            }));
        }

        let body = response.text().await.map_err(|err| {
            AttemptFailure::Retryable(AttemptError::Transport(err.to_string()))
        })?;

        if !status.is_success() {
            return Err(AttemptFailure::Terminal(CallError::Status {
                status: status.as_u16(),
                detail: extract_status_detail(&body, status),
            }));
        }

        serde_json::from_str(&body)
            .map_err(|err| AttemptFailure::Terminal(CallError::Decode(err.to_string())))
    }
}

/// Best-effort extraction of a short error detail from a failure body.
fn extract_status_detail(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return trimmed.chars().take(MAX_DETAIL_CHARS).collect();
                }
            }
        }
    }
    status_line(status)
}

fn status_line(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || status.as_u16().to_string(),
        |reason| format!("{} {reason}", status.as_u16()),
    )
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde::Deserialize;
    use serde_json::json;
    use url::Url;

    use super::*;

    async fn spawn_app(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("test listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });
        addr
    }

    fn endpoint(addr: SocketAddr, path: &str) -> Url {
        Url::parse(&format!("http://{addr}{path}")).expect("test endpoint URL")
    }

    fn counting_route(status: StatusCode, body: Value) -> (Router, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let route_hits = hits.clone();
        let app = Router::new().route(
            "/t",
            get(move || {
                let hits = route_hits.clone();
                let body = body.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (status, Json(body)).into_response()
                }
            }),
        );
        (app, hits)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        ok: bool,
    }

    #[tokio::test]
    async fn success_decodes_on_first_attempt() {
        let (app, hits) = counting_route(StatusCode::OK, json!({"ok": true}));
        let addr = spawn_app(app).await;

        let caller = ResilientCaller::new();
        let payload: Payload = caller
            .call(CallRequest::get(endpoint(addr, "/t")))
            .await
            .expect("call should succeed");

        assert_eq!(payload, Payload { ok: true });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_errors_exhaust_with_backoff() {
        let (app, hits) = counting_route(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "boom"}),
        );
        let addr = spawn_app(app).await;

        let caller = ResilientCaller::new();
        let started = Instant::now();
        let err = caller
            .call::<Payload>(CallRequest::get(endpoint(addr, "/t")).with_max_attempts(3))
            .await
            .expect_err("call should exhaust");

        // Exactly three attempts, with 1s + 2s waits between them and none after.
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(7), "elapsed {elapsed:?}");
        match err {
            CallError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(last.contains("500"), "last cause: {last}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn client_errors_are_terminal_without_retry() {
        let (app, hits) = counting_route(StatusCode::NOT_FOUND, json!({"error": "unknown lead"}));
        let addr = spawn_app(app).await;

        let caller = ResilientCaller::new();
        let err = caller
            .call::<Payload>(CallRequest::get(endpoint(addr, "/t")).with_max_attempts(3))
            .await
            .expect_err("404 should be terminal");

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        match err {
            CallError::Status { status, detail } => {
                assert_eq!(status, 404);
                assert_eq!(detail, "unknown lead");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_is_retried_like_a_server_error() {
        let hits = Arc::new(AtomicUsize::new(0));
        let route_hits = hits.clone();
        let app = Router::new().route(
            "/t",
            get(move || {
                let hits = route_hits.clone();
                async move {
                    if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                        (
                            StatusCode::TOO_MANY_REQUESTS,
                            Json(json!({"error": "slow down"})),
                        )
                            .into_response()
                    } else {
                        Json(json!({"ok": true})).into_response()
                    }
                }
            }),
        );
        let addr = spawn_app(app).await;

        let caller = ResilientCaller::new();
        let payload: Payload = caller
            .call(CallRequest::get(endpoint(addr, "/t")).with_max_attempts(3))
            .await
            .expect("retry should recover");

        assert_eq!(payload, Payload { ok: true });
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn slow_responses_time_out_as_retryable() {
        let app = Router::new().route(
            "/t",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"ok": true})).into_response()
            }),
        );
        let addr = spawn_app(app).await;

        let caller = ResilientCaller::new();
        let err = caller
            .call::<Payload>(
                CallRequest::get(endpoint(addr, "/t"))
                    .with_timeout(Duration::from_millis(200))
                    .with_max_attempts(1),
            )
            .await
            .expect_err("slow upstream should time out");

        match err {
            CallError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 1);
                assert!(last.contains("timed out after 0.2s"), "last cause: {last}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn detail_extraction_prefers_error_then_message() {
        assert_eq!(
            extract_status_detail(r#"{"error": "bad input"}"#, StatusCode::BAD_REQUEST),
            "bad input"
        );
        assert_eq!(
            extract_status_detail(r#"{"message": "denied"}"#, StatusCode::FORBIDDEN),
            "denied"
        );
        assert_eq!(
            extract_status_detail("<html>nope</html>", StatusCode::BAD_GATEWAY),
            "502 Bad Gateway"
        );
        let long = format!("{{\"error\": \"{}\"}}", "x".repeat(500));
        assert_eq!(
            extract_status_detail(&long, StatusCode::BAD_REQUEST).len(),
            MAX_DETAIL_CHARS
        );
    }
}
