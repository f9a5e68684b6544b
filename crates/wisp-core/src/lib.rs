//! wisp-core: a minimal resource-fetching client.
//!
//! [`uri::parse`] turns a URI string into a [`UriDescriptor`];
//! [`Fetcher::fetch`] performs the scheme's I/O (nothing for `data`, a file
//! read for `file`, one HTTP/1.1 exchange over TCP or TLS for the http
//! family) and returns the body as text.

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod uri;

pub use error::{FetchError, Result};
pub use fetch::{fetch_uri, FetchOptions, FetchResult, Fetcher};
pub use uri::{parse, UriDescriptor};
