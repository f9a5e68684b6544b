//! `data:` URIs: `data:<media type>[;base64],<payload>`.

use crate::error::{FetchError, Result};

const BASE64_SUFFIX: &str = ";base64";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Metadata before the first `,`, minus a trailing `;base64`. May be empty.
    pub media_type: String,
    pub is_base64: bool,
    /// Everything after the first `,`, undecoded.
    pub payload: String,
}

/// `rest` is `raw` without its `data:` prefix.
pub(super) fn parse_data(raw: &str, rest: &str) -> Result<DataUri> {
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| FetchError::malformed_uri(raw, "data URI has no ',' before its payload"))?;

    let (media_type, is_base64) = match metadata.strip_suffix(BASE64_SUFFIX) {
        Some(media_type) => (media_type, true),
        None => (metadata, false),
    };

    Ok(DataUri {
        media_type: media_type.to_string(),
        is_base64,
        payload: payload.to_string(),
    })
}
