//! Fetcher: performs the I/O a descriptor calls for and returns text.
//!
//! Each call owns its socket, TLS session or file handle for exactly its own
//! duration; nothing is pooled or shared between calls, so one `Fetcher`
//! may serve many threads. Calls block the current thread.

mod data;
mod file;
mod transport;

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::http::{self, Response};
use crate::uri::{self, HttpTarget, UriDescriptor};

pub const DEFAULT_USER_AGENT: &str = concat!("wisp/", env!("CARGO_PKG_VERSION"));

/// Transport settings applied to every network fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Sent as the `User-Agent` request header.
    pub user_agent: String,
    /// Deadline for establishing the TCP connection; `None` waits on the OS.
    pub connect_timeout: Option<Duration>,
    /// Deadline for each socket read or write once connected.
    pub read_timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Some(Duration::from_secs(15)),
            read_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Body of a successful fetch plus how the caller should present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub body: String,
    /// Set only for `view-source:` descriptors.
    pub display_as_source: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Resolves `descriptor` and returns its body as text.
    ///
    /// `data` descriptors never touch the network or disk. `file`
    /// descriptors read the whole file. `http` family descriptors open one
    /// connection (TLS for `https`), send one request and close it. Any
    /// failure is returned unchanged; nothing is retried.
    pub fn fetch(&self, descriptor: &UriDescriptor) -> Result<FetchResult> {
        let started = Instant::now();
        let scheme = descriptor.scheme();

        let outcome = match descriptor {
            UriDescriptor::Data(d) => data::decode(d),
            UriDescriptor::File { path } => file::read_text(path),
            UriDescriptor::Http(target) => self.fetch_http(target).map(|r| r.body),
        };

        let body = match outcome {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(scheme, error = %e, "fetch failed");
                return Err(e);
            }
        };

        tracing::info!(
            scheme,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetch complete"
        );
        Ok(FetchResult {
            body,
            display_as_source: descriptor.view_source(),
        })
    }

    /// One request/response over a fresh connection. The connection is
    /// closed when this returns, whatever the outcome.
    pub fn fetch_http(&self, target: &HttpTarget) -> Result<Response> {
        let tcp = transport::connect_tcp(&target.host, target.port, &self.options)?;
        let ua = self.options.user_agent.as_str();

        let response = if target.secure {
            let mut tls = transport::handshake(&target.host, tcp)?;
            let response = http::exchange(&mut tls, &target.host, &target.path, ua);
            transport::close_tls(&mut tls);
            response?
        } else {
            let mut tcp = tcp;
            http::exchange(&mut tcp, &target.host, &target.path, ua)?
        };

        if !(200..300).contains(&response.status) {
            tracing::warn!(
                host = %target.host,
                path = %target.path,
                status = response.status,
                reason = %response.reason,
                "non-success status"
            );
        }
        Ok(response)
    }
}

/// Parses `raw` and fetches it with `options`.
pub fn fetch_uri(raw: &str, options: &FetchOptions) -> Result<FetchResult> {
    let descriptor = uri::parse(raw)?;
    Fetcher::new(options.clone()).fetch(&descriptor)
}
