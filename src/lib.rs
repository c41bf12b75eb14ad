/*!
An embeddable MCP adapter for the OpenAI Assistants API.

assistants-mcp exposes the Assistants REST operations (assistants, threads,
messages, runs, run steps) as Model Context Protocol tools, so any MCP
client can drive the Assistants API through `tools/call`. It is a protocol
adapter, not an HTTP client: you supply the upstream REST calls by
implementing one trait, and the crate handles everything between the wire
and that trait.

# Overview

The Model Context Protocol is a JSON-RPC 2.0 convention for LLM clients to
discover and invoke named tools, read resources, and fetch prompts. This
crate maps each of the 22 Assistants API operations to exactly one tool,
validates arguments against a declared schema before anything touches the
network, and translates upstream failures into the MCP result shapes
clients expect.

No async runtime is required. Transports use threads, and the upstream
[`backend::Backend`] trait is synchronous; implementations are free to
block.

# Quick Start

```
use assistants_mcp::backend::{Backend, BackendResult, JsonObject, ListQuery};
use assistants_mcp::mcp::Dispatcher;
use serde_json::json;
use std::sync::Arc;

// A backend that answers every call with a canned object. A real one
// forwards to api.openai.com.
# struct Canned;
# impl Backend for Canned {
#     fn create_assistant(&self, _: JsonObject) -> BackendResult { Ok(json!({})) }
#     fn list_assistants(&self, _: ListQuery) -> BackendResult { Ok(json!({})) }
#     fn get_assistant(&self, id: &str) -> BackendResult { Ok(json!({"id": id})) }
#     fn update_assistant(&self, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
#     fn delete_assistant(&self, _: &str) -> BackendResult { Ok(json!({})) }
#     fn create_thread(&self, _: JsonObject) -> BackendResult { Ok(json!({})) }
#     fn get_thread(&self, _: &str) -> BackendResult { Ok(json!({})) }
#     fn update_thread(&self, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
#     fn delete_thread(&self, _: &str) -> BackendResult { Ok(json!({})) }
#     fn create_message(&self, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
#     fn list_messages(&self, _: &str, _: ListQuery) -> BackendResult { Ok(json!({})) }
#     fn get_message(&self, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
#     fn update_message(&self, _: &str, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
#     fn delete_message(&self, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
#     fn create_run(&self, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
#     fn list_runs(&self, _: &str, _: ListQuery) -> BackendResult { Ok(json!({})) }
#     fn get_run(&self, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
#     fn update_run(&self, _: &str, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
#     fn cancel_run(&self, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
#     fn submit_tool_outputs(&self, _: &str, _: &str, _: JsonObject) -> BackendResult { Ok(json!({})) }
#     fn list_run_steps(&self, _: &str, _: &str, _: ListQuery) -> BackendResult { Ok(json!({})) }
#     fn get_run_step(&self, _: &str, _: &str, _: &str) -> BackendResult { Ok(json!({})) }
# }

let dispatcher = Arc::new(Dispatcher::new(Arc::new(Canned)));

// Serve over stdio (blocks until EOF):
// assistants_mcp::stdio::Server::new(dispatcher).serve();

// Or over HTTP:
// assistants_mcp::http::Server::serve("127.0.0.1:3000", dispatcher)?;

// Or drive it directly:
let response = dispatcher
    .dispatch_value(json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}))
    .unwrap();
assert!(response.result.is_some());
```

# Error contract

Two failure channels, deliberately distinct:

- **Protocol errors** — malformed envelope, unknown method or tool, failed
  argument validation — come back as JSON-RPC `error` objects with one of
  the five standard codes.
- **Tool errors** — the upstream call itself failed — come back as
  *successful* responses whose `result` has `isError: true`, because "the
  tool ran and failed" and "the request was malformed" are different facts.

Every validation message is written to be the complete diagnostic: the
parameter, what was received, what was expected, and an example.

Integrations that keyed on the pre-MCP error surface can opt back in with
[`mcp::Dispatcher::with_legacy_upstream_errors`], which reports backend
failures as JSON-RPC errors carrying the legacy category in `error.data`.

# Module Organization

- [`mcp`] — the dispatcher tying everything together
- [`jrpc`] — JSON-RPC 2.0 envelope types and the error taxonomy
- [`schema`] — the 22-tool inventory and its parameter tables
- [`validate`] — single-value validation primitives
- [`registry`] — tool name resolution and backend dispatch
- [`pagination`] — stateless cursor pagination for list results
- [`backend`] — the upstream REST capability you implement
- [`resources`] — static resource/prompt content
- [`stdio`], [`http`] — transports

*/
pub mod backend;
pub mod http;
pub mod jrpc;
mod logging;
pub mod mcp;
pub mod pagination;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod stdio;
pub mod validate;
