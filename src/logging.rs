//! Logging utilities for the adapter.
//!
//! On the stdio transport, stdout carries the JSON-RPC protocol stream, so
//! diagnostics must never be written there. This module funnels all
//! diagnostic output to stderr.

/// Logs a message to stderr.
///
/// stdout is reserved for protocol traffic on the stdio transport; every
/// diagnostic in this crate goes through here instead.
///
/// # Examples
///
/// ```
/// # mod logging {
/// #     pub fn log(str: &str) {
/// #         eprintln!("{}", str);
/// #     }
/// # }
/// # use logging::log;
/// log("server started");
///
/// let port = 3000;
/// log(&format!("listening on port {}", port));
/// ```
pub fn log(str: &str) {
    eprintln!("{}", str);
}
