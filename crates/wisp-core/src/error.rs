//! Failure taxonomy for parsing and fetching.
//!
//! Every failure the core can produce is a distinct variant so callers can
//! decide whether to retry, fall back or abort. Nothing here is retried.

use std::io;

/// Result alias used across the core.
pub type Result<T, E = FetchError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No recognized scheme delimiter, or a scheme-specific part that cannot
    /// be split into its fields (empty host, bad port, data URI without `,`).
    #[error("malformed URI {uri:?}: {reason}")]
    MalformedUri { uri: String, reason: &'static str },

    /// Scheme token is not one of `http`, `https`, `file`, `view-source:http`, `data`.
    #[error("unsupported scheme {scheme:?}")]
    UnsupportedScheme { scheme: String },

    /// A `file` descriptor whose path could not be opened or read.
    #[error("cannot read {path}")]
    ResourceUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    /// TCP connection (including name resolution) could not be established.
    #[error("cannot connect to {host}:{port}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// TLS negotiation with `host` failed (untrusted certificate, protocol error, bad SNI name).
    /// `source` is the `io::Error` from the handshake I/O (wrapping the
    /// `rustls::Error` for trust and protocol failures), or the setup error.
    #[error("TLS handshake with {host} failed")]
    TlsHandshakeFailed {
        host: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Response uses a body framing or encoding this client does not decode.
    #[error("unsupported response framing: {header}: {value}")]
    UnsupportedFraming { header: &'static str, value: String },

    /// Stream ended before `Content-Length` bytes were received.
    #[error("truncated body: expected {expected} bytes, got {received}")]
    TruncatedBody { expected: u64, received: u64 },

    /// Body bytes (or a decoded base64 payload) are not valid text.
    #[error("cannot decode body: {reason}")]
    EncodingError {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Status line or header block that cannot be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// I/O failure on an established connection that is not end-of-data.
    #[error("transport error")]
    Transport(#[source] io::Error),
}

impl FetchError {
    pub(crate) fn malformed_uri(uri: &str, reason: &'static str) -> Self {
        FetchError::MalformedUri {
            uri: uri.to_string(),
            reason,
        }
    }

    pub(crate) fn encoding<E>(reason: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FetchError::EncodingError {
            reason: reason.to_string(),
            source: Some(Box::new(source)),
        }
    }
}
