//! The dispatch core: one JSON-RPC request in, one response out.
//!
//! A request moves through a fixed sequence — envelope check, method
//! routing, tool resolution, argument validation, backend invocation,
//! result mapping — terminating at the first failure. The dispatcher is
//! stateless across requests; pipelined requests may complete in any
//! order, and each response carries its own request's `id`.
//!
//! # Two kinds of failure
//!
//! Protocol failures (malformed envelope, unknown method or tool, invalid
//! arguments) become JSON-RPC `error` objects with one of the five
//! standard codes. A tool that resolved, validated, and *ran* but whose
//! backend call failed is reported as a *successful* JSON-RPC response
//! whose `result` carries `isError: true` — "the tool ran and failed" is
//! distinct from "the request was malformed", and clients depend on the
//! distinction.
//!
//! [`Dispatcher::with_legacy_upstream_errors`] restores the older surface
//! where backend failures came back as JSON-RPC errors with the category in
//! `error.data`.

use crate::backend::{Backend, JsonObject};
use crate::jrpc::{Error, Request, Response};
use crate::logging::log;
use crate::pagination::{self, PageRequest};
use crate::registry::Registry;
use crate::resources::{ContentProvider, StaticContent};
use crate::schema::{self, ToolDescriptor};
use std::sync::Arc;

/// The protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Routes decoded JSON-RPC requests to tools, resources, and prompts.
///
/// Construct one at startup with the backend (and optionally a custom
/// content provider) and share it across transport threads; it holds no
/// per-request state.
///
/// # Examples
///
/// ```
/// use assistants_mcp::backend::{Backend, BackendResult, JsonObject, ListQuery};
/// use assistants_mcp::mcp::Dispatcher;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # struct Stub;
/// # impl Backend for Stub {
/// #     fn create_assistant(&self, _: JsonObject) -> BackendResult { Ok(json!({})) }
/// #     fn list_assistants(&self, _: ListQuery) -> BackendResult { Ok(json!({})) }
/// #     fn get_assistant(&self, id: &str) -> BackendResult { Ok(json!({"id": id})) }
/// #     fn update_assistant(&self, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
/// #     fn delete_assistant(&self, _: &str) -> BackendResult { Ok(json!({})) }
/// #     fn create_thread(&self, _: JsonObject) -> BackendResult { Ok(json!({})) }
/// #     fn get_thread(&self, _: &str) -> BackendResult { Ok(json!({})) }
/// #     fn update_thread(&self, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
/// #     fn delete_thread(&self, _: &str) -> BackendResult { Ok(json!({})) }
/// #     fn create_message(&self, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
/// #     fn list_messages(&self, _: &str, _: ListQuery) -> BackendResult { Ok(json!({})) }
/// #     fn get_message(&self, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
/// #     fn update_message(&self, _: &str, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
/// #     fn delete_message(&self, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
/// #     fn create_run(&self, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
/// #     fn list_runs(&self, _: &str, _: ListQuery) -> BackendResult { Ok(json!({})) }
/// #     fn get_run(&self, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
/// #     fn update_run(&self, _: &str, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
/// #     fn cancel_run(&self, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
/// #     fn submit_tool_outputs(&self, _: &str, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
/// #     fn list_run_steps(&self, _: &str, _: &str, _: ListQuery) -> BackendResult { Ok(json!({})) }
/// #     fn get_run_step(&self, _: &str, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
/// # }
/// let dispatcher = Dispatcher::new(Arc::new(Stub));
/// let response = dispatcher
///     .dispatch_value(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
///     .unwrap();
/// assert_eq!(response.result.unwrap()["tools"].as_array().unwrap().len(), 22);
/// ```
pub struct Dispatcher {
    registry: Registry,
    content: Arc<dyn ContentProvider>,
    legacy_upstream_errors: bool,
}

impl Dispatcher {
    /// Creates a dispatcher over the given backend, serving the built-in
    /// static content catalog.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Dispatcher {
            registry: Registry::new(backend),
            content: Arc::new(StaticContent),
            legacy_upstream_errors: false,
        }
    }

    /// Creates a dispatcher with a custom content provider.
    pub fn with_content(backend: Arc<dyn Backend>, content: Arc<dyn ContentProvider>) -> Self {
        Dispatcher {
            registry: Registry::new(backend),
            content,
            legacy_upstream_errors: false,
        }
    }

    /// Reports backend failures as JSON-RPC error objects instead of
    /// `isError` tool results.
    ///
    /// Pre-MCP integrations of this adapter keyed on the coerced top-level
    /// codes (404 and 429 surface as -32602, everything else as -32603)
    /// with the fine-grained category and a documentation hint in
    /// `error.data`. New integrations should keep the default tool-error
    /// shape; see [`crate::jrpc::ErrorCategory`].
    pub fn with_legacy_upstream_errors(mut self) -> Self {
        self.legacy_upstream_errors = true;
        self
    }

    /// Dispatches a decoded JSON value.
    ///
    /// This is the transport entry point: it performs the envelope checks
    /// that [`dispatch`](Self::dispatch) assumes. Returns `None` for
    /// notifications (no `id` field), which produce no response.
    pub fn dispatch_value(&self, value: serde_json::Value) -> Option<Response<serde_json::Value>> {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => {
                return Some(Response::err(Error::invalid_request(), serde_json::Value::Null));
            }
        };
        let method = obj.get("method").and_then(|m| m.as_str());
        let id = match obj.get("id") {
            Some(id) => id.clone(),
            // Id-less input is a notification only if it names a method;
            // otherwise it is a malformed envelope and gets an answer.
            None => match method {
                Some(method) => {
                    log(&format!("notification: {}", method));
                    return None;
                }
                None => {
                    return Some(Response::err(Error::invalid_request(), serde_json::Value::Null));
                }
            },
        };
        let version_ok = obj.get("jsonrpc").and_then(|v| v.as_str()) == Some("2.0");
        let (Some(method), true) = (method, version_ok) else {
            return Some(Response::err(Error::invalid_request(), id));
        };
        let request = Request {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params: obj.get("params").cloned(),
            id,
        };
        Some(self.dispatch(request))
    }

    /// Dispatches a well-formed request to its method handler.
    pub fn dispatch(&self, request: Request) -> Response<serde_json::Value> {
        if request.jsonrpc != "2.0" {
            return Response::err(Error::invalid_request(), request.id);
        }
        match request.method.as_str() {
            "initialize" => Response::new(InitializeResult::new(), request.id).erase(),
            "ping" => Response::new(serde_json::json!({}), request.id),
            "tools/list" => self.tools_list(request),
            "tools/call" => self.tools_call(request),
            "resources/list" => Response::new(
                serde_json::json!({"resources": self.content.list_resources()}),
                request.id,
            ),
            "resources/read" => self.resources_read(request),
            "prompts/list" => Response::new(
                serde_json::json!({"prompts": self.content.list_prompts()}),
                request.id,
            ),
            "prompts/get" => self.prompts_get(request),
            "completion/complete" => self.complete(request),
            _ => Response::err(Error::method_not_found(), request.id),
        }
    }

    fn tools_list(&self, request: Request) -> Response<serde_json::Value> {
        let page_request: PageRequest = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(page_request) => page_request,
                Err(err) => {
                    return Response::err(Error::invalid_params(err.to_string()), request.id);
                }
            },
            None => PageRequest::default(),
        };
        let descriptors = Registry::descriptors();
        if page_request.cursor.is_none() && page_request.limit.is_none() {
            return Response::new(ToolListResult::full(descriptors), request.id).erase();
        }
        match pagination::paginate(&descriptors, &page_request) {
            Ok(page) => Response::new(
                ToolListResult {
                    tools: page.items,
                    next_cursor: page.next_cursor,
                },
                request.id,
            )
            .erase(),
            Err(err) => Response::err(Error::invalid_params(err.to_string()), request.id),
        }
    }

    fn tools_call(&self, request: Request) -> Response<serde_json::Value> {
        let params = match request.params {
            Some(params) => match serde_json::from_value::<ToolCallParams>(params) {
                Ok(params) => params,
                Err(err) => {
                    return Response::err(Error::invalid_params(err.to_string()), request.id);
                }
            },
            None => {
                return Response::err(
                    Error::invalid_params(
                        "Missing params: tools/call requires a tool name and arguments."
                            .to_string(),
                    ),
                    request.id,
                );
            }
        };
        let tool = match Registry::resolve(&params.name) {
            Some(tool) => tool,
            None => return Response::err(Error::unknown_tool(&params.name), request.id),
        };
        if let Err(err) = schema::validate_args(tool, &params.arguments) {
            return Response::err(Error::invalid_params(err.message), request.id);
        }
        let result = match self.registry.call(tool, &params.arguments) {
            Ok(value) => ToolCallResult::success(&value),
            Err(err) => {
                log(&format!("tool {} failed: {}", params.name, err));
                if self.legacy_upstream_errors {
                    return Response::err(
                        Error::from_category(err.category(), err.to_string()),
                        request.id,
                    );
                }
                ToolCallResult::failure(&format!(
                    "Error: {}. {}",
                    err,
                    err.category().documentation()
                ))
            }
        };
        Response::new(result, request.id).erase()
    }

    fn resources_read(&self, request: Request) -> Response<serde_json::Value> {
        let uri = match request
            .params
            .as_ref()
            .and_then(|p| p.get("uri"))
            .and_then(|u| u.as_str())
        {
            Some(uri) => uri,
            None => {
                return Response::err(
                    Error::invalid_params(
                        "Missing required parameter: uri. Expected a resource URI from resources/list.".to_string(),
                    ),
                    request.id,
                );
            }
        };
        match self.content.read_resource(uri) {
            Ok(contents) => Response::new(
                serde_json::json!({"contents": [contents]}),
                request.id,
            ),
            Err(err) => Response::err(Error::invalid_params(err.to_string()), request.id),
        }
    }

    fn prompts_get(&self, request: Request) -> Response<serde_json::Value> {
        let params = request.params.unwrap_or_default();
        let name = match params.get("name").and_then(|n| n.as_str()) {
            Some(name) => name,
            None => {
                return Response::err(
                    Error::invalid_params(
                        "Missing required parameter: name. Expected a prompt name from prompts/list.".to_string(),
                    ),
                    request.id,
                );
            }
        };
        let arguments = params.get("arguments").and_then(|a| a.as_object());
        match self.content.get_prompt(name, arguments) {
            Ok(prompt) => Response::new(prompt, request.id).erase(),
            Err(err) => Response::err(Error::invalid_params(err.to_string()), request.id),
        }
    }

    fn complete(&self, request: Request) -> Response<serde_json::Value> {
        let params = request.params.unwrap_or_default();
        let argument = params.get("argument");
        let name = argument
            .and_then(|a| a.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or_default();
        let value = argument
            .and_then(|a| a.get("value"))
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let completion = self.content.complete(name, value);
        Response::new(serde_json::json!({"completion": completion}), request.id)
    }
}

/// The `initialize` result: protocol version, capability flags, and server
/// identity.
#[derive(Debug, serde::Serialize)]
struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    capabilities: serde_json::Value,
    #[serde(rename = "serverInfo")]
    server_info: ServerInfo,
}

#[derive(Debug, serde::Serialize)]
struct ServerInfo {
    name: String,
    version: String,
}

impl InitializeResult {
    fn new() -> Self {
        InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: serde_json::json!({
                "tools": {"listChanged": false},
                "resources": {},
                "prompts": {},
                "completions": {},
            }),
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Parameters of a `tools/call` request.
#[derive(Debug, serde::Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: JsonObject,
}

/// The `tools/list` result.
#[derive(Debug, serde::Serialize)]
struct ToolListResult {
    tools: Vec<ToolDescriptor>,
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

impl ToolListResult {
    fn full(tools: Vec<ToolDescriptor>) -> Self {
        ToolListResult {
            tools,
            next_cursor: None,
        }
    }
}

/// The result of one tool invocation, success or tool-level failure.
#[derive(Debug, serde::Serialize)]
pub struct ToolCallResult {
    content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    is_error: bool,
}

impl ToolCallResult {
    fn success(value: &serde_json::Value) -> Self {
        ToolCallResult {
            content: vec![ToolContent::Text {
                text: serde_json::to_string(value).unwrap(),
            }],
            is_error: false,
        }
    }

    fn failure(message: &str) -> Self {
        ToolCallResult {
            content: vec![ToolContent::Text {
                text: message.to_string(),
            }],
            is_error: true,
        }
    }
}

/// Content returned by a tool; only text today.
#[derive(Debug, serde::Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, BackendResult, ListQuery};
    use serde_json::json;

    struct MockBackend {
        fail_status: Option<u16>,
    }

    impl MockBackend {
        fn ok() -> Arc<Self> {
            Arc::new(MockBackend { fail_status: None })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(MockBackend {
                fail_status: Some(status),
            })
        }

        fn check(&self) -> Result<(), BackendError> {
            match self.fail_status {
                Some(status) => Err(BackendError::http(
                    status,
                    "simulated upstream failure".to_string(),
                )),
                None => Ok(()),
            }
        }

        fn object(&self, kind: &str, id: &str) -> BackendResult {
            self.check()?;
            Ok(json!({"id": id, "object": kind, "created_at": 1700000000}))
        }

        fn listing(&self, kind: &str) -> BackendResult {
            self.check()?;
            Ok(json!({"object": "list", "data": [], "has_more": false, "kind": kind}))
        }
    }

    impl Backend for MockBackend {
        fn create_assistant(&self, body: JsonObject) -> BackendResult {
            self.check()?;
            let mut object = body;
            object.insert("id".to_string(), "asst_new123new123new123new1".into());
            object.insert("object".to_string(), "assistant".into());
            Ok(serde_json::Value::Object(object))
        }
        fn list_assistants(&self, _query: ListQuery) -> BackendResult {
            self.listing("assistant")
        }
        fn get_assistant(&self, assistant_id: &str) -> BackendResult {
            self.object("assistant", assistant_id)
        }
        fn update_assistant(&self, assistant_id: &str, _body: JsonObject) -> BackendResult {
            self.object("assistant", assistant_id)
        }
        fn delete_assistant(&self, assistant_id: &str) -> BackendResult {
            self.check()?;
            Ok(json!({"id": assistant_id, "object": "assistant.deleted", "deleted": true}))
        }
        fn create_thread(&self, _body: JsonObject) -> BackendResult {
            self.object("thread", "thread_new123new123new123new1")
        }
        fn get_thread(&self, thread_id: &str) -> BackendResult {
            self.object("thread", thread_id)
        }
        fn update_thread(&self, thread_id: &str, _body: JsonObject) -> BackendResult {
            self.object("thread", thread_id)
        }
        fn delete_thread(&self, thread_id: &str) -> BackendResult {
            self.check()?;
            Ok(json!({"id": thread_id, "object": "thread.deleted", "deleted": true}))
        }
        fn create_message(&self, _thread_id: &str, _body: JsonObject) -> BackendResult {
            self.object("thread.message", "msg_new123new123new123new12")
        }
        fn list_messages(&self, _thread_id: &str, _query: ListQuery) -> BackendResult {
            self.listing("thread.message")
        }
        fn get_message(&self, _thread_id: &str, message_id: &str) -> BackendResult {
            self.object("thread.message", message_id)
        }
        fn update_message(
            &self,
            _thread_id: &str,
            message_id: &str,
            _body: JsonObject,
        ) -> BackendResult {
            self.object("thread.message", message_id)
        }
        fn delete_message(&self, _thread_id: &str, message_id: &str) -> BackendResult {
            self.check()?;
            Ok(json!({"id": message_id, "object": "thread.message.deleted", "deleted": true}))
        }
        fn create_run(&self, _thread_id: &str, _body: JsonObject) -> BackendResult {
            self.object("thread.run", "run_new123new123new123new12")
        }
        fn list_runs(&self, _thread_id: &str, _query: ListQuery) -> BackendResult {
            self.listing("thread.run")
        }
        fn get_run(&self, _thread_id: &str, run_id: &str) -> BackendResult {
            self.object("thread.run", run_id)
        }
        fn update_run(&self, _thread_id: &str, run_id: &str, _body: JsonObject) -> BackendResult {
            self.object("thread.run", run_id)
        }
        fn cancel_run(&self, _thread_id: &str, run_id: &str) -> BackendResult {
            self.check()?;
            Ok(json!({"id": run_id, "object": "thread.run", "status": "cancelling"}))
        }
        fn submit_tool_outputs(
            &self,
            _thread_id: &str,
            run_id: &str,
            _body: JsonObject,
        ) -> BackendResult {
            self.object("thread.run", run_id)
        }
        fn list_run_steps(
            &self,
            _thread_id: &str,
            _run_id: &str,
            _query: ListQuery,
        ) -> BackendResult {
            self.listing("thread.run.step")
        }
        fn get_run_step(&self, _thread_id: &str, _run_id: &str, step_id: &str) -> BackendResult {
            self.object("thread.run.step", step_id)
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(MockBackend::ok())
    }

    fn call(dispatcher: &Dispatcher, value: serde_json::Value) -> Response<serde_json::Value> {
        dispatcher.dispatch_value(value).expect("expected a response")
    }

    const ASSISTANT_ID: &str = "asst_abc123def456ghi789jkl012";
    const THREAD_ID: &str = "thread_abc123def456ghi789jkl012";

    #[test]
    fn missing_method_is_invalid_request() {
        let response = call(&dispatcher(), json!({"jsonrpc": "2.0", "id": 1}));
        assert_eq!(response.error.unwrap().code, -32600);
        assert!(response.result.is_none());
    }

    #[test]
    fn missing_method_without_id_is_still_invalid_request() {
        let response = call(&dispatcher(), json!({"jsonrpc": "2.0"}));
        assert_eq!(response.error.unwrap().code, -32600);
        assert_eq!(response.id, json!(null));
    }

    #[test]
    fn wrong_version_is_invalid_request() {
        let response = call(
            &dispatcher(),
            json!({"jsonrpc": "1.0", "id": 1, "method": "tools/list"}),
        );
        assert_eq!(response.error.unwrap().code, -32600);
    }

    #[test]
    fn non_object_input_is_invalid_request() {
        let response = call(&dispatcher(), json!([1, 2, 3]));
        assert_eq!(response.error.unwrap().code, -32600);
    }

    #[test]
    fn unknown_method_is_method_not_found() {
        let response = call(
            &dispatcher(),
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/destroy"}),
        );
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn unknown_tool_is_method_not_found() {
        let response = call(
            &dispatcher(),
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "nonexistent-tool", "arguments": {}},
            }),
        );
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert!(error.message.contains("nonexistent-tool"));
    }

    #[test]
    fn notifications_produce_no_response() {
        let response = dispatcher().dispatch_value(json!({
            "jsonrpc": "2.0", "method": "notifications/initialized",
        }));
        assert!(response.is_none());
    }

    #[test]
    fn responses_echo_their_request_id() {
        let response = call(
            &dispatcher(),
            json!({"jsonrpc": "2.0", "id": "req-77", "method": "ping"}),
        );
        assert_eq!(response.id, json!("req-77"));
    }

    #[test]
    fn initialize_advertises_capabilities() {
        let response = call(
            &dispatcher(),
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
        );
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], json!(PROTOCOL_VERSION));
        assert_eq!(result["serverInfo"]["name"], json!("assistants-mcp"));
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["prompts"].is_object());
    }

    #[test]
    fn tools_list_advertises_all_22() {
        let response = call(
            &dispatcher(),
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
        );
        let result = response.result.unwrap();
        assert_eq!(result["tools"].as_array().unwrap().len(), 22);
        assert!(result.get("nextCursor").is_none());
    }

    #[test]
    fn tools_list_pagination_walks_all_pages() {
        let d = dispatcher();
        let mut names = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut params = json!({"limit": 10});
            if let Some(c) = &cursor {
                params["cursor"] = json!(c);
            }
            let response = call(
                &d,
                json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": params}),
            );
            let result = response.result.unwrap();
            for tool in result["tools"].as_array().unwrap() {
                names.push(tool["name"].as_str().unwrap().to_string());
            }
            match result.get("nextCursor").and_then(|c| c.as_str()) {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }
        assert_eq!(names.len(), 22);
        assert_eq!(names[0], "assistant-create");
        assert_eq!(names[21], "run-step-get");
    }

    #[test]
    fn tools_list_rejects_malformed_cursor() {
        let response = call(
            &dispatcher(),
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/list",
                "params": {"cursor": "garbage"},
            }),
        );
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn missing_required_param_names_it_with_an_example() {
        let response = call(
            &dispatcher(),
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "assistant-create", "arguments": {"name": "Bot"}},
            }),
        );
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("model"));
        assert!(error.message.contains("gpt-4"));
    }

    #[test]
    fn invalid_id_reports_pattern_and_received_value() {
        let response = call(
            &dispatcher(),
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "assistant-get", "arguments": {"assistant_id": "banana"}},
            }),
        );
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("asst_"));
        assert!(error.message.contains("banana"));
    }

    #[test]
    fn successful_call_wraps_backend_json_as_text() {
        let response = call(
            &dispatcher(),
            json!({
                "jsonrpc": "2.0", "id": 2, "method": "tools/call",
                "params": {"name": "assistant-get", "arguments": {"assistant_id": ASSISTANT_ID}},
            }),
        );
        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert!(result.get("isError").is_none());
        let content = &result["content"][0];
        assert_eq!(content["type"], json!("text"));
        let parsed: serde_json::Value =
            serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
        assert_eq!(parsed["id"], json!(ASSISTANT_ID));
    }

    #[test]
    fn read_only_calls_are_idempotent() {
        let d = dispatcher();
        let request = json!({
            "jsonrpc": "2.0", "id": 3, "method": "tools/call",
            "params": {"name": "thread-get", "arguments": {"thread_id": THREAD_ID}},
        });
        let first = call(&d, request.clone()).result.unwrap();
        let second = call(&d, request).result.unwrap();
        assert_eq!(first["content"][0]["text"], second["content"][0]["text"]);
    }

    #[test]
    fn backend_failure_is_a_tool_error_not_a_protocol_error() {
        let d = Dispatcher::new(MockBackend::failing(404));
        let response = call(
            &d,
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "assistant-get", "arguments": {"assistant_id": ASSISTANT_ID}},
            }),
        );
        assert!(response.error.is_none(), "tool failures are not JSON-RPC errors");
        let result = response.result.unwrap();
        assert_eq!(result["isError"], json!(true));
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error:"));
        assert!(text.contains("404"));
    }

    #[test]
    fn rate_limit_failure_carries_guidance() {
        let d = Dispatcher::new(MockBackend::failing(429));
        let response = call(
            &d,
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "assistant-list", "arguments": {}},
            }),
        );
        let result = response.result.unwrap();
        assert_eq!(result["isError"], json!(true));
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("rate-limits"));
    }

    #[test]
    fn legacy_mode_coerces_not_found_to_invalid_params() {
        let d = Dispatcher::new(MockBackend::failing(404)).with_legacy_upstream_errors();
        let response = call(
            &d,
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "assistant-get", "arguments": {"assistant_id": ASSISTANT_ID}},
            }),
        );
        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        let data = error.data.unwrap();
        assert_eq!(data["category"], json!("not_found"));
        assert!(data["documentation"].as_str().unwrap().contains("deleted"));
    }

    #[test]
    fn legacy_mode_maps_auth_failures_to_internal() {
        let d = Dispatcher::new(MockBackend::failing(401)).with_legacy_upstream_errors();
        let response = call(
            &d,
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "assistant-list", "arguments": {}},
            }),
        );
        let error = response.error.unwrap();
        assert_eq!(error.code, -32603);
        assert_eq!(error.data.unwrap()["category"], json!("unauthorized"));
    }

    #[test]
    fn validation_happens_before_invocation() {
        // A backend that would fail is never reached when validation fails.
        let d = Dispatcher::new(MockBackend::failing(500));
        let response = call(
            &d,
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                "params": {"name": "assistant-get", "arguments": {}},
            }),
        );
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn resources_round_trip() {
        let d = dispatcher();
        let listed = call(&d, json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}));
        let resources = listed.result.unwrap();
        let uri = resources["resources"][0]["uri"].as_str().unwrap().to_string();
        let read = call(
            &d,
            json!({
                "jsonrpc": "2.0", "id": 2, "method": "resources/read",
                "params": {"uri": uri},
            }),
        );
        let contents = read.result.unwrap();
        assert!(!contents["contents"][0]["text"].as_str().unwrap().is_empty());
    }

    #[test]
    fn unknown_resource_is_invalid_params() {
        let response = call(
            &dispatcher(),
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "resources/read",
                "params": {"uri": "assistants://docs/nope"},
            }),
        );
        let error = response.error.unwrap();
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("assistants://docs/nope"));
    }

    #[test]
    fn prompts_get_expands_arguments() {
        let response = call(
            &dispatcher(),
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "prompts/get",
                "params": {"name": "create-coding-assistant", "arguments": {"language": "Rust"}},
            }),
        );
        let result = response.result.unwrap();
        assert!(result["messages"][0]["content"]["text"]
            .as_str()
            .unwrap()
            .contains("Rust"));
    }

    #[test]
    fn completion_suggests_models() {
        let response = call(
            &dispatcher(),
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "completion/complete",
                "params": {
                    "ref": {"type": "ref/prompt", "name": "create-coding-assistant"},
                    "argument": {"name": "model", "value": "gpt-4"},
                },
            }),
        );
        let result = response.result.unwrap();
        let values = result["completion"]["values"].as_array().unwrap();
        assert!(!values.is_empty());
    }

    #[test]
    fn every_tool_dispatches_to_its_backend_method() {
        let d = dispatcher();
        let args_for = |name: &str| -> serde_json::Value {
            let mut args = serde_json::Map::new();
            let tool = Registry::resolve(name).unwrap();
            for spec in tool.params() {
                if !spec.required {
                    continue;
                }
                let value = match spec.kind {
                    crate::schema::ParamKind::Id(kind) => json!(kind.example()),
                    crate::schema::ParamKind::String { .. } => json!("hello"),
                    crate::schema::ParamKind::Enum { allowed, .. } => json!(allowed[0]),
                    crate::schema::ParamKind::Array => json!([]),
                    _ => json!(null),
                };
                args.insert(spec.name.to_string(), value);
            }
            serde_json::Value::Object(args)
        };
        for tool in crate::schema::ToolId::ALL {
            let response = call(
                &d,
                json!({
                    "jsonrpc": "2.0", "id": 1, "method": "tools/call",
                    "params": {"name": tool.wire_name(), "arguments": args_for(tool.wire_name())},
                }),
            );
            assert!(
                response.error.is_none(),
                "{} failed: {:?}",
                tool.wire_name(),
                response.error
            );
            let result = response.result.unwrap();
            assert!(result.get("isError").is_none(), "{}", tool.wire_name());
        }
    }
}
