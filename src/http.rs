//! Minimal HTTP transport.
//!
//! A hand-rolled HTTP/1.1 listener over `TcpListener` and threads, enough
//! to accept `POST /` with a JSON-RPC body and answer with the response
//! envelope. One request per connection; no keep-alive, no TLS — put a
//! real proxy in front for anything internet-facing.

use crate::logging::log;
use crate::mcp::Dispatcher;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

const MAX_BODY_BYTES: usize = 1024 * 1024;
const MAX_HEADER_LINES: usize = 100;
const READ_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Server;

impl Server {
    /// Binds `addr` and serves until the process exits.
    ///
    /// Each connection is handled on its own thread; the dispatcher is
    /// shared.
    pub fn serve(addr: &str, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
        let listener = TcpListener::bind(addr)?;
        log(&format!("http transport listening on {}", listener.local_addr()?));
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    log(&format!("accept failed: {}", e));
                    continue;
                }
            };
            let dispatcher = Arc::clone(&dispatcher);
            let spawned = std::thread::Builder::new()
                .name("assistants_mcp::http".to_string())
                .spawn(move || {
                    if let Err(e) = handle_connection(stream, &dispatcher) {
                        log(&format!("connection failed: {}", e));
                    }
                });
            if let Err(e) = spawned {
                log(&format!("failed to spawn connection thread: {}", e));
            }
        }
        Ok(())
    }
}

/// The parsed request line and the one header this transport cares about.
struct RequestHead {
    method: String,
    path: String,
    content_length: usize,
}

#[derive(Debug, thiserror::Error)]
enum HeadError {
    #[error("header block exceeds {MAX_HEADER_LINES} lines")]
    TooManyHeaders,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn read_head<R: BufRead>(reader: &mut R) -> Result<RequestHead, HeadError> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    for _ in 0..MAX_HEADER_LINES {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        if line.trim().is_empty() {
            return Ok(RequestHead {
                method,
                path,
                content_length,
            });
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    Err(HeadError::TooManyHeaders)
}

fn handle_connection(stream: TcpStream, dispatcher: &Dispatcher) -> std::io::Result<()> {
    // A trickling client should not pin this thread forever.
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut stream = stream;
    let head = match read_head(&mut reader) {
        Ok(head) => head,
        Err(HeadError::TooManyHeaders) => {
            return write_response(
                &mut stream,
                "431 Request Header Fields Too Large",
                "text/plain",
                b"too many headers\n",
            );
        }
        Err(HeadError::Io(e)) => return Err(e),
    };

    if head.method != "POST" {
        return write_response(&mut stream, "405 Method Not Allowed", "text/plain", b"POST only\n");
    }
    if head.path != "/" && head.path != "/mcp" {
        return write_response(&mut stream, "404 Not Found", "text/plain", b"no such path\n");
    }
    if head.content_length > MAX_BODY_BYTES {
        return write_response(&mut stream, "413 Payload Too Large", "text/plain", b"body too large\n");
    }

    let mut body = vec![0u8; head.content_length];
    reader.read_exact(&mut body)?;

    let response = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => dispatcher.dispatch_value(value),
        Err(_) => Some(crate::jrpc::Response::err(
            crate::jrpc::Error::parse_error(),
            serde_json::Value::Null,
        )),
    };
    match response {
        Some(response) => {
            let bytes = serde_json::to_vec(&response).unwrap();
            write_response(&mut stream, "200 OK", "application/json", &bytes)
        }
        // Notification: acknowledged, nothing to say.
        None => write_response(&mut stream, "202 Accepted", "application/json", b""),
    }
}

fn write_response(
    stream: &mut TcpStream,
    status: &str,
    content_type: &str,
    body: &[u8],
) -> std::io::Result<()> {
    let headers = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    stream.write_all(headers.as_bytes())?;
    stream.write_all(body)?;
    stream.flush()
}
