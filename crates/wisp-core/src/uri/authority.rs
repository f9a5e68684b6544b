//! Host, port and path for the http family of schemes.

use crate::error::{FetchError, Result};

pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Network target of an `http`, `https` or `view-source:http` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTarget {
    pub host: String,
    /// Explicit `:port` from the authority, else the scheme default.
    pub port: u16,
    /// Always starts with `/`.
    pub path: String,
    /// TLS over the TCP connection (`https`).
    pub secure: bool,
    /// `view-source:` wrapper was present.
    pub view_source: bool,
}

impl HttpTarget {
    pub fn default_port(&self) -> u16 {
        if self.secure {
            DEFAULT_HTTPS_PORT
        } else {
            DEFAULT_HTTP_PORT
        }
    }
}

/// Splits the text after `://` into authority and path, then the authority
/// into host and optional port.
pub(super) fn parse_http(
    raw: &str,
    rest: &str,
    secure: bool,
    view_source: bool,
) -> Result<HttpTarget> {
    let (authority, path) = match rest.split_once('/') {
        Some((authority, tail)) => (authority, format!("/{}", tail)),
        None => (rest, "/".to_string()),
    };

    let default_port = if secure {
        DEFAULT_HTTPS_PORT
    } else {
        DEFAULT_HTTP_PORT
    };
    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, parse_port(raw, port)?),
        None => (authority, default_port),
    };

    if host.is_empty() {
        return Err(FetchError::malformed_uri(raw, "empty host"));
    }
    // Both end up verbatim in the request line and Host header.
    if host.chars().any(forbidden) {
        return Err(FetchError::malformed_uri(raw, "whitespace or control character in host"));
    }
    if path.chars().any(forbidden) {
        return Err(FetchError::malformed_uri(raw, "whitespace or control character in path"));
    }

    Ok(HttpTarget {
        host: host.to_string(),
        port,
        path,
        secure,
        view_source,
    })
}

fn forbidden(c: char) -> bool {
    c.is_control() || c.is_whitespace()
}

fn parse_port(raw: &str, port: &str) -> Result<u16> {
    // u16::from_str accepts a leading '+'; a port is digits only.
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FetchError::malformed_uri(raw, "port is not a number"));
    }
    port.parse::<u16>()
        .map_err(|_| FetchError::malformed_uri(raw, "port out of range"))
}
