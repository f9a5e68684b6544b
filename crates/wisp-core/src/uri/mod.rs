//! URI descriptors.
//!
//! Classifies a raw URI string into one of the schemes the fetcher knows
//! (`http`, `https`, `view-source:http`, `file`, `data`) and splits out the
//! scheme-specific fields. No I/O happens here.

mod authority;
mod data;

use std::fmt;
use std::str::FromStr;

use crate::error::{FetchError, Result};

pub use authority::{HttpTarget, DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT};
pub use data::DataUri;

const SCHEME_DELIMITER: &str = "://";
const VIEW_SOURCE_HTTP: &str = "view-source:http";

/// Parsed, immutable form of a URI. Exactly one variant is active and each
/// carries only the fields its scheme uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriDescriptor {
    /// `http`, `https` or `view-source:http`.
    Http(HttpTarget),
    /// `file://<path>`; the path is used as written.
    File { path: String },
    /// Inline `data:` content.
    Data(DataUri),
}

impl UriDescriptor {
    /// Canonical scheme token of this descriptor.
    pub fn scheme(&self) -> &'static str {
        match self {
            UriDescriptor::Http(t) if t.view_source => VIEW_SOURCE_HTTP,
            UriDescriptor::Http(t) if t.secure => "https",
            UriDescriptor::Http(_) => "http",
            UriDescriptor::File { .. } => "file",
            UriDescriptor::Data(_) => "data",
        }
    }

    /// True when the body should be shown as raw markup.
    pub fn view_source(&self) -> bool {
        matches!(self, UriDescriptor::Http(t) if t.view_source)
    }
}

/// Parses `raw` into a descriptor.
///
/// Fails with [`FetchError::MalformedUri`] when there is no scheme delimiter
/// or the scheme-specific part is unusable, and with
/// [`FetchError::UnsupportedScheme`] for any scheme token outside the
/// recognized set.
///
/// # Examples
///
/// - `parse("http://example.com")` → host `example.com`, port 80, path `/`
/// - `parse("https://example.com:8443/a/b")` → port 8443, path `/a/b`
/// - `parse("data:text/html,Hello")` → media type `text/html`, payload `Hello`
pub fn parse(raw: &str) -> Result<UriDescriptor> {
    if let Some(rest) = raw.strip_prefix("data:") {
        return data::parse_data(raw, rest).map(UriDescriptor::Data);
    }

    let (scheme, rest) = raw
        .split_once(SCHEME_DELIMITER)
        .ok_or_else(|| FetchError::malformed_uri(raw, "missing scheme delimiter \"://\""))?;

    let descriptor = match scheme {
        "http" => UriDescriptor::Http(authority::parse_http(raw, rest, false, false)?),
        "https" => UriDescriptor::Http(authority::parse_http(raw, rest, true, false)?),
        VIEW_SOURCE_HTTP => UriDescriptor::Http(authority::parse_http(raw, rest, false, true)?),
        "file" => {
            if rest.is_empty() {
                return Err(FetchError::malformed_uri(raw, "empty file path"));
            }
            UriDescriptor::File {
                path: rest.to_string(),
            }
        }
        other => {
            return Err(FetchError::UnsupportedScheme {
                scheme: other.to_string(),
            })
        }
    };

    tracing::trace!(uri = raw, scheme = descriptor.scheme(), "parsed uri");
    Ok(descriptor)
}

impl FromStr for UriDescriptor {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl fmt::Display for UriDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriDescriptor::Http(target) => {
                write!(f, "{}://{}", self.scheme(), target.host)?;
                if target.port != target.default_port() {
                    write!(f, ":{}", target.port)?;
                }
                f.write_str(&target.path)
            }
            UriDescriptor::File { path } => write!(f, "file://{}", path),
            UriDescriptor::Data(data) => {
                write!(f, "data:{}", data.media_type)?;
                if data.is_base64 {
                    f.write_str(";base64")?;
                }
                write!(f, ",{}", data.payload)
            }
        }
    }
}
