//! The tool registry: name resolution, descriptor listing, and handler
//! dispatch.
//!
//! The registry owns the [`Backend`] handle and binds each [`ToolId`] to
//! its upstream call through one exhaustive `match` — a missing arm is a
//! compile error. It is constructed once at startup and read-only
//! afterwards; nothing here is registered dynamically.

use crate::backend::{Backend, BackendResult, JsonObject, ListQuery};
use crate::schema::{ToolDescriptor, ToolId};
use std::sync::Arc;

/// Result of comparing registered handlers against the expected tool set.
///
/// With the closed [`ToolId`] enum the compiler already guarantees a
/// handler per tool; this check remains as a deterministic unit test for
/// the advertised name set and for wiring external handler lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completeness {
    /// True when no tools are missing and none are extra
    pub is_complete: bool,
    /// Expected tool names with no registered handler
    pub missing_tools: Vec<String>,
    /// Registered handler names not in the expected set
    pub extra_tools: Vec<String>,
}

/// Maps tool names to descriptors and backend calls.
///
/// # Examples
///
/// ```
/// use assistants_mcp::registry::Registry;
/// use assistants_mcp::schema::ToolId;
///
/// let descriptors = Registry::descriptors();
/// assert_eq!(descriptors.len(), 22);
/// assert_eq!(descriptors[0].name, "assistant-create");
///
/// assert_eq!(Registry::resolve("thread-get"), Some(ToolId::ThreadGet));
/// assert_eq!(Registry::resolve("nonexistent-tool"), None);
/// ```
pub struct Registry {
    backend: Arc<dyn Backend>,
}

impl Registry {
    /// Creates a registry bound to the given backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Registry { backend }
    }

    /// All 22 tool descriptors, in advertisement order.
    ///
    /// The order is stable across calls; `tools/list` pagination relies on
    /// that.
    pub fn descriptors() -> Vec<ToolDescriptor> {
        ToolId::ALL.iter().map(|id| id.descriptor()).collect()
    }

    /// Resolves a wire name to its tool, if registered.
    pub fn resolve(name: &str) -> Option<ToolId> {
        ToolId::from_wire_name(name)
    }

    /// Compares a set of registered handler names against the expected
    /// tool inventory.
    ///
    /// # Examples
    ///
    /// ```
    /// use assistants_mcp::registry::Registry;
    /// use assistants_mcp::schema::ToolId;
    ///
    /// let all: Vec<&str> = ToolId::ALL.iter().map(|id| id.wire_name()).collect();
    /// assert!(Registry::validate_completeness(all.iter().copied()).is_complete);
    ///
    /// let report = Registry::validate_completeness(["assistant-get", "mystery-tool"]);
    /// assert!(!report.is_complete);
    /// assert_eq!(report.extra_tools, vec!["mystery-tool"]);
    /// assert_eq!(report.missing_tools.len(), 21);
    /// ```
    pub fn validate_completeness<'a, I>(registered: I) -> Completeness
    where
        I: IntoIterator<Item = &'a str>,
    {
        let registered: Vec<&str> = registered.into_iter().collect();
        let missing_tools: Vec<String> = ToolId::ALL
            .iter()
            .map(|id| id.wire_name())
            .filter(|name| !registered.contains(name))
            .map(String::from)
            .collect();
        let extra_tools: Vec<String> = registered
            .iter()
            .filter(|name| ToolId::from_wire_name(name).is_none())
            .map(|name| name.to_string())
            .collect();
        Completeness {
            is_complete: missing_tools.is_empty() && extra_tools.is_empty(),
            missing_tools,
            extra_tools,
        }
    }

    /// Invokes the backend call bound to `tool` with validated arguments.
    ///
    /// Arguments must already have passed [`crate::schema::validate_args`];
    /// IDs are extracted by name and bodies assembled from the declared
    /// body parameters that are present.
    pub fn call(&self, tool: ToolId, args: &JsonObject) -> BackendResult {
        let backend = self.backend.as_ref();
        match tool {
            ToolId::AssistantCreate => backend.create_assistant(body(
                args,
                &[
                    "model",
                    "name",
                    "description",
                    "instructions",
                    "tools",
                    "tool_resources",
                    "metadata",
                ],
            )),
            ToolId::AssistantList => backend.list_assistants(list_query(args)),
            ToolId::AssistantGet => backend.get_assistant(id_arg(args, "assistant_id")),
            ToolId::AssistantUpdate => backend.update_assistant(
                id_arg(args, "assistant_id"),
                body(
                    args,
                    &[
                        "model",
                        "name",
                        "description",
                        "instructions",
                        "tools",
                        "tool_resources",
                        "metadata",
                    ],
                ),
            ),
            ToolId::AssistantDelete => backend.delete_assistant(id_arg(args, "assistant_id")),
            ToolId::ThreadCreate => backend.create_thread(body(args, &["messages", "metadata"])),
            ToolId::ThreadGet => backend.get_thread(id_arg(args, "thread_id")),
            ToolId::ThreadUpdate => {
                backend.update_thread(id_arg(args, "thread_id"), body(args, &["metadata"]))
            }
            ToolId::ThreadDelete => backend.delete_thread(id_arg(args, "thread_id")),
            ToolId::MessageCreate => backend.create_message(
                id_arg(args, "thread_id"),
                body(args, &["role", "content", "metadata"]),
            ),
            ToolId::MessageList => {
                backend.list_messages(id_arg(args, "thread_id"), list_query(args))
            }
            ToolId::MessageGet => {
                backend.get_message(id_arg(args, "thread_id"), id_arg(args, "message_id"))
            }
            ToolId::MessageUpdate => backend.update_message(
                id_arg(args, "thread_id"),
                id_arg(args, "message_id"),
                body(args, &["metadata"]),
            ),
            ToolId::MessageDelete => {
                backend.delete_message(id_arg(args, "thread_id"), id_arg(args, "message_id"))
            }
            ToolId::RunCreate => backend.create_run(
                id_arg(args, "thread_id"),
                body(
                    args,
                    &[
                        "assistant_id",
                        "model",
                        "instructions",
                        "additional_instructions",
                        "tools",
                        "metadata",
                    ],
                ),
            ),
            ToolId::RunList => backend.list_runs(id_arg(args, "thread_id"), list_query(args)),
            ToolId::RunGet => backend.get_run(id_arg(args, "thread_id"), id_arg(args, "run_id")),
            ToolId::RunUpdate => backend.update_run(
                id_arg(args, "thread_id"),
                id_arg(args, "run_id"),
                body(args, &["metadata"]),
            ),
            ToolId::RunCancel => {
                backend.cancel_run(id_arg(args, "thread_id"), id_arg(args, "run_id"))
            }
            ToolId::RunSubmitToolOutputs => backend.submit_tool_outputs(
                id_arg(args, "thread_id"),
                id_arg(args, "run_id"),
                body(args, &["tool_outputs"]),
            ),
            ToolId::RunStepList => {
                backend.list_run_steps(id_arg(args, "thread_id"), id_arg(args, "run_id"), list_query(args))
            }
            ToolId::RunStepGet => backend.get_run_step(
                id_arg(args, "thread_id"),
                id_arg(args, "run_id"),
                id_arg(args, "step_id"),
            ),
        }
    }
}

fn id_arg<'a>(args: &'a JsonObject, name: &str) -> &'a str {
    // Validation guarantees presence and type for required IDs.
    args.get(name).and_then(|v| v.as_str()).unwrap_or_default()
}

fn body(args: &JsonObject, names: &[&str]) -> JsonObject {
    names
        .iter()
        .filter_map(|&name| {
            args.get(name)
                .filter(|v| !v.is_null())
                .map(|v| (name.to_string(), v.clone()))
        })
        .collect()
}

fn list_query(args: &JsonObject) -> ListQuery {
    ListQuery {
        // Upstream takes an integer; a fractional limit rounds rather than
        // silently dropping out of the query.
        limit: args
            .get("limit")
            .and_then(|v| v.as_f64())
            .map(|n| n.round() as u64),
        order: args
            .get("order")
            .and_then(|v| v.as_str())
            .map(String::from),
        after: args
            .get("after")
            .and_then(|v| v.as_str())
            .map(String::from),
        before: args
            .get("before")
            .and_then(|v| v.as_str())
            .map(String::from),
        run_id: args
            .get("run_id")
            .and_then(|v| v.as_str())
            .map(String::from),
    }
}
