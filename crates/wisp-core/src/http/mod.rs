//! HTTP/1.x wire codec.
//!
//! Shared by the plain and TLS transports once a byte stream exists: writes
//! one `GET`, reads one response framed by `Content-Length`, and decodes the
//! body as UTF-8. Chunked or compressed responses are rejected.

mod parse;
mod request;

use std::collections::HashMap;
use std::io::{BufReader, Read, Write};

use crate::error::{FetchError, Result};

pub use request::serialize_request;

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub version: String,
    pub status: u16,
    pub reason: String,
    /// Lowercased header names; a repeated header keeps its last value.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Response {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Sends `GET path` for `host` over `stream` and reads the response.
///
/// Runs in the current thread and blocks until the body is complete or a
/// failure is detected. Partial bodies are never returned.
pub fn exchange<S: Read + Write>(
    stream: &mut S,
    host: &str,
    path: &str,
    user_agent: &str,
) -> Result<Response> {
    let request = serialize_request(host, path, user_agent);
    stream.write_all(&request).map_err(FetchError::Transport)?;
    stream.flush().map_err(FetchError::Transport)?;
    tracing::debug!(host, path, bytes = request.len(), "request sent");

    let mut reader = BufReader::new(stream);
    let (status, headers) = parse::read_head(&mut reader)?;
    tracing::debug!(
        status = status.status,
        reason = %status.reason,
        headers = headers.len(),
        "response head"
    );

    parse::check_framing(&headers)?;
    let length = parse::content_length(&headers)?;
    let body = parse::read_body(&mut reader, length)?;
    let body = String::from_utf8(body)
        .map_err(|e| FetchError::encoding("response body is not valid UTF-8", e))?;

    Ok(Response {
        version: status.version,
        status: status.status,
        reason: status.reason,
        headers,
        body,
    })
}
