//! Scripted in-memory transport for tests.

use super::{ApiResponse, Transport, TransportError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

type Reply = (Duration, Result<ApiResponse, TransportError>);

/// A request seen by the transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    pub at: Instant,
}

/// Replays queued POST replies in order and answers GETs per path.
///
/// Once the POST queue is empty the `then_always` reply is used, or a
/// network error if none was set.
#[derive(Default)]
pub struct ScriptedTransport {
    posts: Mutex<VecDeque<Reply>>,
    post_fallback: Mutex<Option<Reply>>,
    gets: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

pub fn status_error(status: u16) -> TransportError {
    TransportError::Status {
        status,
        body: format!("HTTP {}", status),
    }
}

pub fn game_stats_body() -> Value {
    json!({ "blitz": { "wins": 10, "losses": 5, "draws": 1, "total": 16 } })
}

pub fn win_stats_body() -> Value {
    json!({ "blitz": { "resigns": 6, "checkmates": 2, "abandons": 0, "timeouts": 2, "total": 10 } })
}

pub fn loss_stats_body() -> Value {
    json!({ "blitz": { "resigns": 3, "checkmates": 1, "abandons": 0, "timeouts": 1, "total": 5 } })
}

pub fn draw_stats_body() -> Value {
    json!({ "blitz": {
        "repetitions": 1, "insufficients": 0, "timeoutVsInsufficients": 0,
        "stalemates": 0, "agrees": 0, "fiftyMoveRules": 0, "total": 1
    } })
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_ok(self, body: Value) -> Self {
        self.post_delayed(Duration::ZERO, Ok(ApiResponse::ok(body)))
    }

    pub fn post_err(self, err: TransportError) -> Self {
        self.post_delayed(Duration::ZERO, Err(err))
    }

    pub fn post_delayed(self, delay: Duration, reply: Result<ApiResponse, TransportError>) -> Self {
        self.posts.lock().unwrap().push_back((delay, reply));
        self
    }

    pub fn then_always(self, body: Value) -> Self {
        *self.post_fallback.lock().unwrap() = Some((Duration::ZERO, Ok(ApiResponse::ok(body))));
        self
    }

    pub fn get_ok(self, path: &str, body: Value) -> Self {
        self.get_delayed(path, Duration::ZERO, Ok(ApiResponse::ok(body)))
    }

    pub fn get_err(self, path: &str, err: TransportError) -> Self {
        self.get_delayed(path, Duration::ZERO, Err(err))
    }

    pub fn get_delayed(self, path: &str, delay: Duration, reply: Result<ApiResponse, TransportError>) -> Self {
        self.gets.lock().unwrap().insert(path.to_string(), (delay, reply));
        self
    }

    /// Register the four stats endpoints with the canned bodies above.
    pub fn with_stats(self) -> Self {
        self.get_ok("/gamestats", game_stats_body())
            .get_ok("/winstats", win_stats_body())
            .get_ok("/lossstats", loss_stats_body())
            .get_ok("/drawstats", draw_stats_body())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn post_count(&self) -> usize {
        self.calls().iter().filter(|c| c.method == "POST").count()
    }

    pub fn get_count(&self) -> usize {
        self.calls().iter().filter(|c| c.method == "GET").count()
    }

    fn record(&self, method: &'static str, path: &str, body: Option<Value>, query: &[(&str, &str)]) {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            at: Instant::now(),
        });
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        self.record("POST", path, Some(body.clone()), &[]);

        let next = self.posts.lock().unwrap().pop_front();
        let (delay, reply) = match next {
            Some(reply) => reply,
            None => self.post_fallback.lock().unwrap().clone().unwrap_or((
                Duration::ZERO,
                Err(TransportError::Network("no scripted reply".to_string())),
            )),
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse, TransportError> {
        self.record("GET", path, None, query);

        let (delay, reply) = self
            .gets
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or((Duration::ZERO, Err(status_error(404))));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}
