//! Validation primitives for tool arguments.
//!
//! Each function validates a single value against a single rule and returns
//! a [`Result`] rather than panicking; expected validation failures are
//! data, not exceptions.
//!
//! The protocol has no structured per-field error array, so a failure's
//! message is the entire diagnostic surface. Every message therefore names
//! the offending parameter, says what was received when meaningful, states
//! what was expected, and — for enums and IDs — includes one concrete
//! example, so a caller can fix the request without consulting external
//! documentation.
//!
//! # Examples
//!
//! ```
//! use assistants_mcp::validate::{required_string, openai_id, IdKind};
//! use serde_json::json;
//!
//! let value = json!("My Assistant");
//! assert!(required_string(Some(&value), "name", &[]).is_ok());
//!
//! let bad = json!("not-an-id");
//! let err = openai_id(Some(&bad), "assistant_id", IdKind::Assistant).unwrap_err();
//! assert!(err.message.contains("asst_"));
//! assert!(err.message.contains("not-an-id"));
//! ```

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Maximum serialized size of a metadata object, in bytes.
pub const METADATA_MAX_BYTES: usize = 16384;

/// A failed validation.
///
/// Carries the complete, caller-ready diagnostic sentence. Re-running the
/// same invalid input always produces the same message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The full diagnostic message
    pub message: String,
}

impl ValidationError {
    fn new(message: String) -> Self {
        ValidationError { message }
    }
}

/// The OpenAI resource kinds whose IDs this adapter validates.
///
/// Each kind has a fixed ID prefix; a well-formed ID is the prefix, an
/// underscore, and 24 alphanumeric characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Assistant,
    Thread,
    Message,
    Run,
    Step,
    File,
    Call,
}

impl IdKind {
    /// The ID prefix for this resource kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use assistants_mcp::validate::IdKind;
    ///
    /// assert_eq!(IdKind::Assistant.prefix(), "asst");
    /// assert_eq!(IdKind::Message.prefix(), "msg");
    /// ```
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Assistant => "asst",
            IdKind::Thread => "thread",
            IdKind::Message => "msg",
            IdKind::Run => "run",
            IdKind::Step => "step",
            IdKind::File => "file",
            IdKind::Call => "call",
        }
    }

    /// A syntactically valid example ID for this kind.
    pub fn example(self) -> String {
        format!("{}_abc123def456ghi789jkl012", self.prefix())
    }

    fn pattern(self) -> String {
        format!("^{}_[A-Za-z0-9]{{24}}$", self.prefix())
    }
}

static ID_PATTERNS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    let kinds = [
        IdKind::Assistant,
        IdKind::Thread,
        IdKind::Message,
        IdKind::Run,
        IdKind::Step,
        IdKind::File,
        IdKind::Call,
    ];
    kinds
        .iter()
        .map(|kind| (kind.prefix(), Regex::new(&kind.pattern()).unwrap()))
        .collect()
});

/// Validates that a required string parameter is present and non-empty.
///
/// Fails if the value is absent, not a string, or empty/whitespace-only.
/// If `examples` are given they are included verbatim in the failure
/// message.
///
/// # Examples
///
/// ```
/// use assistants_mcp::validate::required_string;
/// use serde_json::json;
///
/// let err = required_string(None, "model", &["gpt-4", "gpt-4o"]).unwrap_err();
/// assert!(err.message.contains("model"));
/// assert!(err.message.contains("gpt-4"));
///
/// let blank = json!("   ");
/// assert!(required_string(Some(&blank), "model", &[]).is_err());
/// ```
pub fn required_string(
    value: Option<&Value>,
    param: &str,
    examples: &[&str],
) -> Result<(), ValidationError> {
    let suffix = if examples.is_empty() {
        String::new()
    } else {
        format!(" Examples: {}.", examples.join(", "))
    };
    match value {
        None | Some(Value::Null) => Err(ValidationError::new(format!(
            "Missing required parameter: {}. Expected a non-empty string.{}",
            param, suffix
        ))),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::new(format!(
            "Parameter {} must be a non-empty string, but an empty string was received.{}",
            param, suffix
        ))),
        Some(Value::String(_)) => Ok(()),
        Some(other) => Err(ValidationError::new(format!(
            "Parameter {} must be a string, but {} was received.{}",
            param, other, suffix
        ))),
    }
}

/// Validates that a parameter is a member of a closed set of values.
///
/// If the value is absent and a default exists the validation succeeds (the
/// caller applies the default later). Absent with no default, or present
/// but not a member, fails listing the allowed values and one example.
///
/// # Examples
///
/// ```
/// use assistants_mcp::validate::enum_member;
/// use serde_json::json;
///
/// // Absent with a default: success, caller applies the default.
/// assert!(enum_member(None, "order", &["asc", "desc"], Some("desc")).is_ok());
///
/// let bad = json!("sideways");
/// let err = enum_member(Some(&bad), "order", &["asc", "desc"], Some("desc")).unwrap_err();
/// assert!(err.message.contains("asc, desc"));
/// assert!(err.message.contains("sideways"));
/// ```
pub fn enum_member(
    value: Option<&Value>,
    param: &str,
    allowed: &[&str],
    default: Option<&str>,
) -> Result<(), ValidationError> {
    let listing = allowed.join(", ");
    match value {
        None | Some(Value::Null) => match default {
            Some(_) => Ok(()),
            None => Err(ValidationError::new(format!(
                "Missing required parameter: {}. Expected one of: {}.",
                param, listing
            ))),
        },
        Some(Value::String(s)) if allowed.contains(&s.as_str()) => Ok(()),
        Some(other) => {
            let received = match other {
                Value::String(s) => s.clone(),
                v => v.to_string(),
            };
            Err(ValidationError::new(format!(
                "Parameter {} must be one of: {}, but \"{}\" was received. Example: \"{}\".",
                param, listing, received, allowed[0]
            )))
        }
    }
}

/// Validates that a numeric parameter falls within an inclusive range.
///
/// Absence with a default succeeds; absence without a default fails. Out of
/// range fails stating the bound violated and the received value. A NaN is
/// rejected even though it is numeric.
///
/// # Examples
///
/// ```
/// use assistants_mcp::validate::numeric_range;
/// use serde_json::json;
///
/// assert!(numeric_range(Some(&json!(50)), "limit", 1.0, 100.0, None).is_ok());
/// assert!(numeric_range(None, "limit", 1.0, 100.0, Some(20.0)).is_ok());
///
/// let err = numeric_range(Some(&json!(101)), "limit", 1.0, 100.0, None).unwrap_err();
/// assert!(err.message.contains("at most 100"));
/// assert!(err.message.contains("101"));
/// ```
pub fn numeric_range(
    value: Option<&Value>,
    param: &str,
    min: f64,
    max: f64,
    default: Option<f64>,
) -> Result<(), ValidationError> {
    let n = match value {
        None | Some(Value::Null) => {
            return match default {
                Some(_) => Ok(()),
                None => Err(ValidationError::new(format!(
                    "Missing required parameter: {}. Expected a number between {} and {}.",
                    param, min, max
                ))),
            };
        }
        Some(v) => match v.as_f64() {
            Some(n) => n,
            None => {
                return Err(ValidationError::new(format!(
                    "Parameter {} must be a number between {} and {}, but {} was received.",
                    param, min, max, v
                )));
            }
        },
    };
    if n.is_nan() {
        return Err(ValidationError::new(format!(
            "Parameter {} must be a number between {} and {}, but NaN was received.",
            param, min, max
        )));
    }
    if n < min {
        return Err(ValidationError::new(format!(
            "Parameter {} must be at least {}, but {} was received.",
            param, min, n
        )));
    }
    if n > max {
        return Err(ValidationError::new(format!(
            "Parameter {} must be at most {}, but {} was received.",
            param, max, n
        )));
    }
    Ok(())
}

/// Validates an OpenAI resource ID against its kind's pattern.
///
/// A well-formed ID is `{prefix}_` followed by exactly 24 alphanumeric
/// characters. The failure message includes the expected pattern and an
/// example.
///
/// # Examples
///
/// ```
/// use assistants_mcp::validate::{openai_id, IdKind};
/// use serde_json::json;
///
/// let good = json!("asst_abc123def456ghi789jkl012");
/// assert!(openai_id(Some(&good), "assistant_id", IdKind::Assistant).is_ok());
///
/// let wrong_prefix = json!("thread_abc123def456ghi789jkl012");
/// assert!(openai_id(Some(&wrong_prefix), "assistant_id", IdKind::Assistant).is_err());
///
/// let err = openai_id(None, "assistant_id", IdKind::Assistant).unwrap_err();
/// assert!(err.message.contains("asst_"));
/// ```
pub fn openai_id(value: Option<&Value>, param: &str, kind: IdKind) -> Result<(), ValidationError> {
    let pattern = ID_PATTERNS
        .get(kind.prefix())
        .unwrap_or_else(|| unreachable!("every IdKind has a compiled pattern"));
    match value {
        None | Some(Value::Null) => Err(ValidationError::new(format!(
            "Missing required parameter: {}. Expected an ID matching {}, e.g. \"{}\".",
            param,
            kind.pattern(),
            kind.example()
        ))),
        Some(Value::String(s)) if pattern.is_match(s) => Ok(()),
        Some(Value::String(s)) => Err(ValidationError::new(format!(
            "Parameter {} must match {}, but \"{}\" was received. Example: \"{}\".",
            param,
            kind.pattern(),
            s,
            kind.example()
        ))),
        Some(other) => Err(ValidationError::new(format!(
            "Parameter {} must be a string ID matching {}, but {} was received. Example: \"{}\".",
            param,
            kind.pattern(),
            other,
            kind.example()
        ))),
    }
}

/// Validates that a parameter is an array.
///
/// Presence is checked before type: a required absent array reports
/// "missing", not "wrong type".
///
/// # Examples
///
/// ```
/// use assistants_mcp::validate::array;
/// use serde_json::json;
///
/// assert!(array(None, "messages", false).is_ok());
/// assert!(array(None, "tool_outputs", true).is_err());
///
/// let not_array = json!({"a": 1});
/// let err = array(Some(&not_array), "tool_outputs", true).unwrap_err();
/// assert!(err.message.contains("array"));
/// ```
pub fn array(value: Option<&Value>, param: &str, required: bool) -> Result<(), ValidationError> {
    match value {
        None | Some(Value::Null) => {
            if required {
                Err(ValidationError::new(format!(
                    "Missing required parameter: {}. Expected an array.",
                    param
                )))
            } else {
                Ok(())
            }
        }
        Some(Value::Array(_)) => Ok(()),
        Some(other) => Err(ValidationError::new(format!(
            "Parameter {} must be an array, but {} was received.",
            param, other
        ))),
    }
}

/// Validates an optional metadata object.
///
/// If present it must be a plain (non-array) JSON object whose serialized
/// size does not exceed [`METADATA_MAX_BYTES`]; the failure message
/// includes the measured size.
///
/// # Examples
///
/// ```
/// use assistants_mcp::validate::metadata;
/// use serde_json::json;
///
/// assert!(metadata(None, "metadata").is_ok());
/// assert!(metadata(Some(&json!({"team": "infra"})), "metadata").is_ok());
/// assert!(metadata(Some(&json!(["not", "an", "object"])), "metadata").is_err());
///
/// let big = json!({"blob": "x".repeat(17000)});
/// let err = metadata(Some(&big), "metadata").unwrap_err();
/// assert!(err.message.contains("16384"));
/// ```
pub fn metadata(value: Option<&Value>, param: &str) -> Result<(), ValidationError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(()),
        Some(v) => v,
    };
    if !value.is_object() {
        return Err(ValidationError::new(format!(
            "Parameter {} must be a plain object of key/value pairs, but {} was received.",
            param, value
        )));
    }
    let size = serde_json::to_string(value).unwrap().len();
    if size > METADATA_MAX_BYTES {
        return Err(ValidationError::new(format!(
            "Parameter {} must serialize to at most {} bytes, but it is {} bytes.",
            param, METADATA_MAX_BYTES, size
        )));
    }
    Ok(())
}

const TOOL_TYPES: [&str; 3] = ["code_interpreter", "file_search", "function"];

/// Validates an optional array of assistant tool definitions.
///
/// Each element must be an object whose `type` is one of
/// `code_interpreter`, `file_search`, or `function`; `function`-typed
/// elements additionally require a `function.name` string. Failures name
/// the offending array index.
///
/// # Examples
///
/// ```
/// use assistants_mcp::validate::tools;
/// use serde_json::json;
///
/// let ok = json!([
///     {"type": "code_interpreter"},
///     {"type": "function", "function": {"name": "get_weather"}},
/// ]);
/// assert!(tools(Some(&ok), "tools").is_ok());
///
/// let bad = json!([{"type": "function"}]);
/// let err = tools(Some(&bad), "tools").unwrap_err();
/// assert!(err.message.contains("index 0"));
/// assert!(err.message.contains("function.name"));
/// ```
pub fn tools(value: Option<&Value>, param: &str) -> Result<(), ValidationError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ValidationError::new(format!(
                "Parameter {} must be an array of tool definitions, but {} was received.",
                param, other
            )));
        }
    };
    for (index, item) in items.iter().enumerate() {
        let obj = match item.as_object() {
            Some(obj) => obj,
            None => {
                return Err(ValidationError::new(format!(
                    "Parameter {} at index {} must be an object with a type field, but {} was received.",
                    param, index, item
                )));
            }
        };
        let tool_type = match obj.get("type").and_then(|v| v.as_str()) {
            Some(t) => t,
            None => {
                return Err(ValidationError::new(format!(
                    "Parameter {} at index {} must have a type field, one of: {}.",
                    param,
                    index,
                    TOOL_TYPES.join(", ")
                )));
            }
        };
        if !TOOL_TYPES.contains(&tool_type) {
            return Err(ValidationError::new(format!(
                "Parameter {} at index {} has type \"{}\", expected one of: {}. Example: {{\"type\": \"code_interpreter\"}}.",
                param,
                index,
                tool_type,
                TOOL_TYPES.join(", ")
            )));
        }
        if tool_type == "function" {
            let has_name = obj
                .get("function")
                .and_then(|f| f.get("name"))
                .map(|n| n.is_string())
                .unwrap_or(false);
            if !has_name {
                return Err(ValidationError::new(format!(
                    "Parameter {} at index {} is a function tool and requires a function.name string, e.g. {{\"type\": \"function\", \"function\": {{\"name\": \"get_weather\"}}}}.",
                    param, index
                )));
            }
        }
    }
    Ok(())
}

/// Validates that a tool_resources object only references enabled tools.
///
/// If the object contains a `file_search` or `code_interpreter` key, the
/// corresponding tool type must be present in the `tools` array; otherwise
/// the failure names the missing dependency.
///
/// # Examples
///
/// ```
/// use assistants_mcp::validate::tool_resources;
/// use serde_json::json;
///
/// let resources = json!({"file_search": {"vector_store_ids": []}});
/// let enabled = json!([{"type": "file_search"}]);
/// assert!(tool_resources(Some(&resources), Some(&enabled), "tool_resources").is_ok());
///
/// let err = tool_resources(Some(&resources), None, "tool_resources").unwrap_err();
/// assert!(err.message.contains("file_search"));
/// ```
pub fn tool_resources(
    value: Option<&Value>,
    tools: Option<&Value>,
    param: &str,
) -> Result<(), ValidationError> {
    let obj = match value {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Object(obj)) => obj,
        Some(other) => {
            return Err(ValidationError::new(format!(
                "Parameter {} must be an object, but {} was received.",
                param, other
            )));
        }
    };
    let enabled: Vec<&str> = tools
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("type").and_then(|t| t.as_str()))
                .collect()
        })
        .unwrap_or_default();
    for key in ["file_search", "code_interpreter"] {
        if obj.contains_key(key) && !enabled.contains(&key) {
            return Err(ValidationError::new(format!(
                "Parameter {} configures {} but the tools array does not enable a {} tool. Add {{\"type\": \"{}\"}} to tools.",
                param, key, key, key
            )));
        }
    }
    Ok(())
}
