//! `file` descriptors: read a local file as text.

use std::fs::File;
use std::io::{self, Read};

use crate::error::{FetchError, Result};

/// Reads the whole file at `path` and decodes it as UTF-8. The handle is
/// closed before returning on every path.
pub(crate) fn read_text(path: &str) -> Result<String> {
    let unavailable = |source: io::Error| FetchError::ResourceUnavailable {
        path: path.to_string(),
        source,
    };

    let bytes = {
        let mut file = File::open(path).map_err(unavailable)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(unavailable)?;
        bytes
    };
    tracing::debug!(path, bytes = bytes.len(), "file read");

    String::from_utf8(bytes).map_err(|e| FetchError::encoding("file is not valid UTF-8", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_fixture_exactly() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all("line one\nline two ✓\n".as_bytes()).unwrap();
        f.flush().unwrap();
        let text = read_text(f.path().to_str().unwrap()).unwrap();
        assert_eq!(text, "line one\nline two ✓\n");
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        match read_text(path.to_str().unwrap()) {
            Err(FetchError::ResourceUnavailable { path: p, source }) => {
                assert!(p.ends_with("nope.txt"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected ResourceUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_text(dir.path().to_str().unwrap()),
            Err(FetchError::ResourceUnavailable { .. })
        ));
    }

    #[test]
    fn binary_file_is_encoding_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[0xc3, 0x28]).unwrap();
        f.flush().unwrap();
        assert!(matches!(
            read_text(f.path().to_str().unwrap()),
            Err(FetchError::EncodingError { .. })
        ));
    }
}
