//! `data` descriptors: the payload is the body, no I/O.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{FetchError, Result};
use crate::uri::DataUri;

/// Returns the payload, base64-decoded first when the URI says so.
pub(crate) fn decode(data: &DataUri) -> Result<String> {
    if !data.is_base64 {
        return Ok(data.payload.clone());
    }

    let bytes = STANDARD
        .decode(data.payload.as_bytes())
        .map_err(|e| FetchError::encoding("invalid base64 payload", e))?;
    String::from_utf8(bytes)
        .map_err(|e| FetchError::encoding("decoded payload is not valid UTF-8", e))
}
