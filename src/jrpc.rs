//! JSON-RPC 2.0 protocol implementation.
//!
//! This module provides the envelope types used by the Model Context
//! Protocol: requests, responses, and errors, following the
//! [JSON-RPC 2.0 specification](https://www.jsonrpc.org/specification). It
//! is transport-agnostic and does not require an async runtime.
//!
//! # Error taxonomy
//!
//! Top-level error codes are restricted to the five standard JSON-RPC
//! values, modeled by [`ErrorCode`]. The adapter historically exposed
//! finer-grained codes for upstream HTTP failures (unauthorized, forbidden,
//! not-found, rate-limited); those survive only as an [`ErrorCategory`]
//! inside `error.data`, never as the top-level `code`.
//!
//! # Examples
//!
//! ## Creating and answering a request
//!
//! ```
//! use assistants_mcp::jrpc::{Request, Response, Error};
//! use serde_json::json;
//!
//! let request = Request::new(
//!     "tools/call".to_string(),
//!     Some(json!({"name": "assistant-get", "arguments": {"assistant_id": "asst_x"}})),
//!     json!(2),
//! );
//!
//! // A success response echoes the request id.
//! let response = Response::new(json!({"ok": true}), request.id.clone());
//! assert!(response.result.is_some());
//! assert!(response.error.is_none());
//!
//! // An error response carries exactly one of the five standard codes.
//! let response: Response<serde_json::Value> = Response::err(
//!     Error::invalid_params("Missing required parameter: model.".to_string()),
//!     request.id,
//! );
//! assert_eq!(response.error.unwrap().code, -32602);
//! ```

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A JSON-RPC 2.0 request.
///
/// Constructed by a transport adapter from raw bytes and consumed once by
/// the dispatcher. The `id` may be a string, number, or null; it is echoed
/// verbatim in the response.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
pub struct Request {
    /// The JSON-RPC protocol version (must be "2.0")
    pub jsonrpc: String,
    /// The name of the method to invoke
    pub method: String,
    /// Optional parameters for the method call
    pub params: Option<serde_json::Value>,
    /// Unique identifier for this request
    pub id: serde_json::Value,
}

impl Request {
    /// Creates a new JSON-RPC 2.0 request.
    ///
    /// # Examples
    ///
    /// ```
    /// use assistants_mcp::jrpc::Request;
    /// use serde_json::json;
    ///
    /// let request = Request::new("tools/list".to_string(), None, json!(1));
    /// assert_eq!(request.jsonrpc, "2.0");
    /// ```
    pub fn new(method: String, params: Option<serde_json::Value>, id: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method,
            params,
            id,
        }
    }
}

/// A JSON-RPC 2.0 response.
///
/// Exactly one of `result` and `error` is present. The generic parameter
/// `R` is the concrete result type; [`Response::erase`] converts to a
/// uniform `Response<serde_json::Value>` for dispatch.
///
/// # Examples
///
/// ```
/// use assistants_mcp::jrpc::{Response, Error};
/// use serde_json::json;
///
/// let ok = Response::new(json!({"tools": []}), json!(1));
/// let json_str = serde_json::to_string(&ok).unwrap();
/// assert!(json_str.contains("\"result\""));
/// assert!(!json_str.contains("\"error\"")); // omitted when None
///
/// let err: Response<serde_json::Value> = Response::err(Error::method_not_found(), json!(2));
/// assert!(err.result.is_none());
/// assert_eq!(err.error.unwrap().code, -32601);
/// ```
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Response<R> {
    /// The JSON-RPC protocol version (must be "2.0")
    pub jsonrpc: String,
    /// The result of the method call (mutually exclusive with error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<R>,
    /// Error information if the method call failed (mutually exclusive with result)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
    /// The same identifier that was in the request
    pub id: serde_json::Value,
}

impl<R> Response<R> {
    /// Creates a successful response with the given result.
    pub fn new(result: R, id: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Creates an error response with the given error.
    pub fn err(e: Error, id: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(e),
            id,
        }
    }

    /// Converts a typed response into a response with `serde_json::Value`
    /// result.
    ///
    /// The dispatcher handles method results of different types uniformly;
    /// error responses pass through unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the result cannot be serialized to JSON, which cannot
    /// happen for the types in this crate.
    ///
    /// # Examples
    ///
    /// ```
    /// use assistants_mcp::jrpc::Response;
    /// use serde_json::json;
    ///
    /// #[derive(serde::Serialize)]
    /// struct ListResult {
    ///     total: usize,
    /// }
    ///
    /// let erased = Response::new(ListResult { total: 22 }, json!(1)).erase();
    /// assert_eq!(erased.result.as_ref().unwrap()["total"], json!(22));
    /// ```
    pub fn erase(self) -> Response<serde_json::Value>
    where
        R: Serialize,
    {
        Response {
            jsonrpc: self.jsonrpc,
            result: self.result.map(|r| serde_json::to_value(r).unwrap()),
            error: self.error,
            id: self.id,
        }
    }
}

/// The five standard JSON-RPC 2.0 error codes.
///
/// This closed set is the only thing ever placed in the top-level `code`
/// field of an [`Error`]; upstream HTTP failure categories live in
/// [`ErrorCategory`] instead.
///
/// # Examples
///
/// ```
/// use assistants_mcp::jrpc::ErrorCode;
///
/// assert_eq!(ErrorCode::MethodNotFound.code(), -32601);
/// assert_eq!(ErrorCode::InvalidParams.code(), -32602);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received (-32700)
    ParseError,
    /// The JSON sent is not a valid Request object (-32600)
    InvalidRequest,
    /// The method does not exist or is not available (-32601)
    MethodNotFound,
    /// Invalid method parameters (-32602)
    InvalidParams,
    /// Internal JSON-RPC error (-32603)
    InternalError,
}

impl ErrorCode {
    /// Returns the numeric wire code.
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
        }
    }
}

/// Legacy error category for upstream HTTP failures.
///
/// Earlier revisions of the adapter surfaced these as distinct top-level
/// error codes. For JSON-RPC compliance they are now carried inside
/// `error.data` (as `category` plus a `documentation` hint) while the
/// top-level `code` is coerced to a standard [`ErrorCode`]. Callers that
/// need the fine-grained category must inspect `data`.
///
/// # Examples
///
/// ```
/// use assistants_mcp::jrpc::{ErrorCategory, ErrorCode};
///
/// assert_eq!(ErrorCategory::from_status(401), ErrorCategory::Unauthorized);
/// assert_eq!(ErrorCategory::from_status(429), ErrorCategory::RateLimited);
/// assert_eq!(ErrorCategory::from_status(500), ErrorCategory::Internal);
///
/// // 404 and 429 historically coerced to InvalidParams; preserved as-is.
/// assert_eq!(ErrorCategory::NotFound.standard_code(), ErrorCode::InvalidParams);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Upstream rejected the API key (HTTP 401)
    Unauthorized,
    /// Upstream denied access to the resource (HTTP 403)
    Forbidden,
    /// The referenced resource does not exist upstream (HTTP 404)
    NotFound,
    /// Upstream rate limit was hit (HTTP 429)
    RateLimited,
    /// Any other upstream failure
    Internal,
}

impl ErrorCategory {
    /// Derives the category from an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCategory::Unauthorized,
            403 => ErrorCategory::Forbidden,
            404 => ErrorCategory::NotFound,
            429 => ErrorCategory::RateLimited,
            _ => ErrorCategory::Internal,
        }
    }

    /// The standard JSON-RPC code this category coerces to at the top level.
    ///
    /// 404 and 429 map to [`ErrorCode::InvalidParams`], conflating "not
    /// found" with "bad request shape". That mapping predates this
    /// implementation and is kept for compatibility with existing clients;
    /// do not extend the pattern to new categories.
    pub fn standard_code(self) -> ErrorCode {
        match self {
            ErrorCategory::Unauthorized => ErrorCode::InternalError,
            ErrorCategory::Forbidden => ErrorCode::InternalError,
            ErrorCategory::NotFound => ErrorCode::InvalidParams,
            ErrorCategory::RateLimited => ErrorCode::InvalidParams,
            ErrorCategory::Internal => ErrorCode::InternalError,
        }
    }

    /// A documentation hint for callers hitting this category.
    pub fn documentation(self) -> &'static str {
        match self {
            ErrorCategory::Unauthorized => {
                "Check that the OPENAI_API_KEY is set and valid. See https://platform.openai.com/docs/api-reference/authentication"
            }
            ErrorCategory::Forbidden => {
                "The API key does not have access to this resource or operation."
            }
            ErrorCategory::NotFound => {
                "Verify the resource ID; the object may have been deleted upstream."
            }
            ErrorCategory::RateLimited => {
                "Slow down and retry later. See https://platform.openai.com/docs/guides/rate-limits"
            }
            ErrorCategory::Internal => {
                "An unexpected upstream error occurred; retrying may help."
            }
        }
    }
}

/// A JSON-RPC 2.0 error object.
///
/// The `code` field is always one of the five standard values; see
/// [`ErrorCategory`] for how upstream HTTP failures are represented.
///
/// # Examples
///
/// ```
/// use assistants_mcp::jrpc::Error;
///
/// let error = Error::method_not_found();
/// assert_eq!(error.code, -32601);
///
/// let error = Error::invalid_params("Parameter limit must be at most 100.".to_string());
/// assert_eq!(error.code, -32602);
/// assert!(error.message.contains("limit"));
/// ```
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Error {
    /// Error code as defined in JSON-RPC 2.0 specification
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Optional additional information about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Creates a new error with an explicit standard code.
    pub fn new(code: ErrorCode, message: String, data: Option<serde_json::Value>) -> Self {
        Self {
            code: code.code(),
            message,
            data,
        }
    }

    /// Creates a "Parse error" (code -32700) for invalid JSON input.
    ///
    /// # Examples
    ///
    /// ```
    /// use assistants_mcp::jrpc::Error;
    ///
    /// let error = Error::parse_error();
    /// assert_eq!(error.code, -32700);
    /// ```
    pub fn parse_error() -> Self {
        Self {
            code: ErrorCode::ParseError.code(),
            message: "Parse error".to_string(),
            data: None,
        }
    }

    /// Creates an "Invalid Request" error (code -32600) for a malformed
    /// envelope.
    ///
    /// # Examples
    ///
    /// ```
    /// use assistants_mcp::jrpc::Error;
    ///
    /// let error = Error::invalid_request();
    /// assert_eq!(error.code, -32600);
    /// ```
    pub fn invalid_request() -> Self {
        Self {
            code: ErrorCode::InvalidRequest.code(),
            message: "Invalid Request".to_string(),
            data: None,
        }
    }

    /// Creates a "Method not found" error (code -32601).
    pub fn method_not_found() -> Self {
        Self {
            code: ErrorCode::MethodNotFound.code(),
            message: "Method not found".to_string(),
            data: None,
        }
    }

    /// Creates a "Method not found" error (code -32601) for an unknown tool
    /// name.
    ///
    /// # Examples
    ///
    /// ```
    /// use assistants_mcp::jrpc::Error;
    ///
    /// let error = Error::unknown_tool("nonexistent-tool");
    /// assert_eq!(error.code, -32601);
    /// assert_eq!(error.message, "Tool not found: nonexistent-tool");
    /// ```
    pub fn unknown_tool(name: &str) -> Self {
        Self {
            code: ErrorCode::MethodNotFound.code(),
            message: format!("Tool not found: {}", name),
            data: None,
        }
    }

    /// Creates an "Invalid params" error (code -32602).
    ///
    /// The message is the entire diagnostic surface for validation
    /// failures, so callers pass the complete, self-sufficient sentence
    /// produced by the validation layer.
    pub fn invalid_params(message: String) -> Self {
        Self {
            code: ErrorCode::InvalidParams.code(),
            message,
            data: None,
        }
    }

    /// Creates an "Internal error" (code -32603) with a custom message.
    pub fn internal_error(message: String) -> Self {
        Self {
            code: ErrorCode::InternalError.code(),
            message,
            data: None,
        }
    }

    /// Creates an error from a legacy [`ErrorCategory`].
    ///
    /// The top-level code is the category's coerced standard code; the
    /// category itself and a documentation hint are preserved in `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use assistants_mcp::jrpc::{Error, ErrorCategory};
    ///
    /// let error = Error::from_category(ErrorCategory::RateLimited, "Too many requests".to_string());
    /// assert_eq!(error.code, -32602); // legacy coercion, kept for compatibility
    /// let data = error.data.unwrap();
    /// assert_eq!(data["category"], "rate_limited");
    /// assert!(data["documentation"].as_str().unwrap().contains("rate-limits"));
    /// ```
    pub fn from_category(category: ErrorCategory, message: String) -> Self {
        Self {
            code: category.standard_code().code(),
            message,
            data: Some(serde_json::json!({
                "category": category,
                "documentation": category.documentation(),
            })),
        }
    }
}
