//! Line-delimited stdio transport.
//!
//! One JSON-RPC message per line on stdin, one response per line on
//! stdout. Requests are handed to worker threads, so a pipelining client
//! may receive responses out of order; each response carries its request's
//! `id`. Notifications produce no output line.

use crate::mcp::Dispatcher;
use std::io::{BufRead, Write};
use std::sync::Arc;

pub struct Server {
    dispatcher: Arc<Dispatcher>,
}

impl Server {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Server { dispatcher }
    }

    /// Reads stdin until EOF, dispatching each line.
    ///
    /// Blocks the calling thread. Workers still running at EOF are joined
    /// before this returns, so no in-flight response is lost.
    pub fn serve(&self) {
        let stdin = std::io::stdin();
        self.serve_from(stdin.lock(), Arc::new(|line: &str| write_line(line)));
    }

    fn serve_from<R: BufRead>(&self, mut input: R, out: Arc<dyn Fn(&str) + Send + Sync>) {
        let mut workers = Vec::new();
        loop {
            let mut buffer = String::new();
            match input.read_line(&mut buffer) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    crate::logging::log(&format!("stdin read failed: {}", e));
                    break;
                }
            }
            let dispatcher = Arc::clone(&self.dispatcher);
            let out = Arc::clone(&out);
            let spawned = std::thread::Builder::new()
                .name("assistants_mcp::stdio".to_string())
                .spawn(move || {
                    if let Some(line) = handle_line(&dispatcher, &buffer) {
                        out(&line);
                    }
                });
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => crate::logging::log(&format!("failed to spawn request worker: {}", e)),
            }
            workers.retain(|worker| !worker.is_finished());
        }
        for worker in workers {
            let _ = worker.join();
        }
    }
}

fn write_line(line: &str) {
    let mut bytes = line.as_bytes().to_vec();
    bytes.push(b'\n');
    // One locked write per response keeps pipelined output lines whole.
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(&bytes).and_then(|_| stdout.flush()) {
        crate::logging::log(&format!("stdout write failed: {}", e));
    }
}

/// Processes one input line, returning the serialized response line, if
/// any.
///
/// Empty lines and notifications yield `None`. Bytes that are not JSON
/// yield a Parse error response with a null id.
pub fn handle_line(dispatcher: &Dispatcher, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let response = match serde_json::from_str::<serde_json::Value>(line) {
        Ok(value) => dispatcher.dispatch_value(value)?,
        Err(_) => crate::jrpc::Response::err(
            crate::jrpc::Error::parse_error(),
            serde_json::Value::Null,
        ),
    };
    Some(serde_json::to_string(&response).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, BackendError, BackendResult, JsonObject, ListQuery};
    use serde_json::json;

    struct UnreachableBackend;

    impl Backend for UnreachableBackend {
        fn create_assistant(&self, _: JsonObject) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn list_assistants(&self, _: ListQuery) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn get_assistant(&self, _: &str) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn update_assistant(&self, _: &str, _: JsonObject) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn delete_assistant(&self, _: &str) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn create_thread(&self, _: JsonObject) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn get_thread(&self, _: &str) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn update_thread(&self, _: &str, _: JsonObject) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn delete_thread(&self, _: &str) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn create_message(&self, _: &str, _: JsonObject) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn list_messages(&self, _: &str, _: ListQuery) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn get_message(&self, _: &str, _: &str) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn update_message(&self, _: &str, _: &str, _: JsonObject) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn delete_message(&self, _: &str, _: &str) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn create_run(&self, _: &str, _: JsonObject) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn list_runs(&self, _: &str, _: ListQuery) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn get_run(&self, _: &str, _: &str) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn update_run(&self, _: &str, _: &str, _: JsonObject) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn cancel_run(&self, _: &str, _: &str) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn submit_tool_outputs(&self, _: &str, _: &str, _: JsonObject) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn list_run_steps(&self, _: &str, _: &str, _: ListQuery) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
        fn get_run_step(&self, _: &str, _: &str, _: &str) -> BackendResult {
            Err(BackendError::Transport("unreachable".to_string()))
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(std::sync::Arc::new(UnreachableBackend))
    }

    #[test]
    fn invalid_json_yields_parse_error() {
        let line = handle_line(&dispatcher(), "{not json").unwrap();
        let response: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["error"]["code"], json!(-32700));
        assert_eq!(response["id"], json!(null));
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert!(handle_line(&dispatcher(), "   \n").is_none());
    }

    #[test]
    fn notifications_yield_no_line() {
        let line = handle_line(
            &dispatcher(),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        );
        assert!(line.is_none());
    }

    #[test]
    fn requests_yield_one_line() {
        let line = handle_line(
            &dispatcher(),
            r#"{"jsonrpc":"2.0","id":9,"method":"tools/list"}"#,
        )
        .unwrap();
        let response: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["id"], json!(9));
        assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 22);
    }

    #[test]
    fn in_flight_responses_are_written_before_serve_returns() {
        use std::sync::{Arc, Mutex};

        let server = Server::new(Arc::new(dispatcher()));
        let input = "\
            {\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\
            {\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n\
            {\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"ping\"}\n";
        let collected: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink: Arc<dyn Fn(&str) + Send + Sync> = {
            let collected = Arc::clone(&collected);
            Arc::new(move |line: &str| collected.lock().unwrap().push(line.to_string()))
        };
        server.serve_from(std::io::Cursor::new(input), sink);
        let lines = collected.lock().unwrap();
        assert_eq!(lines.len(), 3);
        for line in lines.iter() {
            let response: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(response.get("result").is_some());
        }
    }

    #[test]
    fn transport_failure_is_a_tool_error() {
        let line = handle_line(
            &dispatcher(),
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"thread-get","arguments":{"thread_id":"thread_abc123def456ghi789jkl012"}}}"#,
        )
        .unwrap();
        let response: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["result"]["isError"], json!(true));
        assert!(response["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("unreachable"));
    }
}
