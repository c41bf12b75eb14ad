//! The upstream REST collaborator consumed by tool handlers.
//!
//! The adapter does not perform HTTP itself; it consumes a [`Backend`]
//! capability with one method per Assistants API operation. Each method
//! returns the upstream resource object as raw JSON or fails with an
//! HTTP-status-derived [`BackendError`]. Retries, auth headers, and
//! connection management are the implementor's concern — the dispatcher
//! makes exactly one best-effort call per tool invocation and never retries.

use crate::jrpc::ErrorCategory;

/// Raw JSON object, the shape of request bodies and upstream resources.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Result of one upstream call.
pub type BackendResult = Result<serde_json::Value, BackendError>;

/// Query options common to the upstream list endpoints.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct ListQuery {
    /// Page size requested from upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Sort order by created_at, "asc" or "desc"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Return objects after this ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Return objects before this ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Filter by the run that produced the object; only meaningful when
    /// listing messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

/// A failed upstream call.
///
/// # Examples
///
/// ```
/// use assistants_mcp::backend::BackendError;
/// use assistants_mcp::jrpc::ErrorCategory;
///
/// let error = BackendError::http(404, "No assistant found".to_string());
/// assert_eq!(error.category(), ErrorCategory::NotFound);
/// assert!(error.to_string().contains("404"));
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// Upstream answered with a non-success HTTP status
    #[error("upstream returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// The call never produced an HTTP response
    #[error("upstream transport failure: {0}")]
    Transport(String),
}

impl BackendError {
    /// Creates an HTTP-status error.
    pub fn http(status: u16, message: String) -> Self {
        BackendError::Http { status, message }
    }

    /// The stable legacy category for this failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            BackendError::Http { status, .. } => ErrorCategory::from_status(*status),
            BackendError::Transport(_) => ErrorCategory::Internal,
        }
    }
}

/// One method per Assistants API operation.
///
/// Implementations are shared across request-handler threads, so they must
/// be `Send + Sync`. Bodies arrive already validated by the schema layer;
/// IDs match their resource kind's pattern.
pub trait Backend: Send + Sync {
    fn create_assistant(&self, body: JsonObject) -> BackendResult;
    fn list_assistants(&self, query: ListQuery) -> BackendResult;
    fn get_assistant(&self, assistant_id: &str) -> BackendResult;
    fn update_assistant(&self, assistant_id: &str, body: JsonObject) -> BackendResult;
    fn delete_assistant(&self, assistant_id: &str) -> BackendResult;

    fn create_thread(&self, body: JsonObject) -> BackendResult;
    fn get_thread(&self, thread_id: &str) -> BackendResult;
    fn update_thread(&self, thread_id: &str, body: JsonObject) -> BackendResult;
    fn delete_thread(&self, thread_id: &str) -> BackendResult;

    fn create_message(&self, thread_id: &str, body: JsonObject) -> BackendResult;
    fn list_messages(&self, thread_id: &str, query: ListQuery) -> BackendResult;
    fn get_message(&self, thread_id: &str, message_id: &str) -> BackendResult;
    fn update_message(&self, thread_id: &str, message_id: &str, body: JsonObject) -> BackendResult;
    fn delete_message(&self, thread_id: &str, message_id: &str) -> BackendResult;

    fn create_run(&self, thread_id: &str, body: JsonObject) -> BackendResult;
    fn list_runs(&self, thread_id: &str, query: ListQuery) -> BackendResult;
    fn get_run(&self, thread_id: &str, run_id: &str) -> BackendResult;
    fn update_run(&self, thread_id: &str, run_id: &str, body: JsonObject) -> BackendResult;
    fn cancel_run(&self, thread_id: &str, run_id: &str) -> BackendResult;
    fn submit_tool_outputs(&self, thread_id: &str, run_id: &str, body: JsonObject) -> BackendResult;

    fn list_run_steps(&self, thread_id: &str, run_id: &str, query: ListQuery) -> BackendResult;
    fn get_run_step(&self, thread_id: &str, run_id: &str, step_id: &str) -> BackendResult;
}
