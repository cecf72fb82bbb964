//! Request and response types for the `/setup` endpoint.

use serde_json::{json, Value};
use std::fmt;
use tracing::debug;

/// Path of the setup endpoint, used both to trigger and to poll.
pub const SETUP_PATH: &str = "/setup";

/// Body sent to the setup endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupRequest {
    pub username: String,
}

impl SetupRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// JSON body for the request. The username is forwarded as-is.
    pub fn body(&self) -> Value {
        json!({ "username": self.username })
    }
}

/// Reply from the setup endpoint.
///
/// Both fields are optional on the wire; an empty string counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupResponse {
    pub id: Option<String>,
    pub status: Option<String>,
}

impl SetupResponse {
    /// Decode a response body.
    ///
    /// Each field is read on its own, so a malformed field never hides the
    /// other one. A body that is not an object carries neither field.
    pub fn from_body(body: Value) -> Self {
        if !body.is_object() {
            debug!(body = %body, "Setup response body is not an object");
        }

        Self {
            id: body.get("id").and_then(field_text),
            status: body.get("status").and_then(field_text),
        }
    }

    /// Job identifier, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Job status, if present and non-empty.
    pub fn status(&self) -> Option<SetupStatus> {
        self.status
            .as_deref()
            .filter(|status| !status.is_empty())
            .map(SetupStatus::from)
    }
}

/// Text of a response field. Strings are taken as-is; `null`, `false` and
/// zero are absent; any other value keeps its JSON rendering.
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Status of a setup job as reported by the server.
///
/// The set is open: unknown values land in `Other` and are treated as
/// pending like every other non-`Complete` status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupStatus {
    Started,
    Pending,
    Updating,
    Failed,
    Complete,
    Other(String),
}

impl SetupStatus {
    /// `Complete` is the only terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SetupStatus::Complete)
    }
}

impl From<&str> for SetupStatus {
    fn from(s: &str) -> Self {
        match s {
            "Started" => SetupStatus::Started,
            "Pending" => SetupStatus::Pending,
            "Updating" => SetupStatus::Updating,
            "Failed" => SetupStatus::Failed,
            "Complete" => SetupStatus::Complete,
            other => SetupStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SetupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupStatus::Started => write!(f, "Started"),
            SetupStatus::Pending => write!(f, "Pending"),
            SetupStatus::Updating => write!(f, "Updating"),
            SetupStatus::Failed => write!(f, "Failed"),
            SetupStatus::Complete => write!(f, "Complete"),
            SetupStatus::Other(s) => write!(f, "{}", s),
        }
    }
}
