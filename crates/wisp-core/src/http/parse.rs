//! Response parsing: status line, header block, framing checks, body.

use std::collections::HashMap;
use std::io::{self, BufRead, Read};

use crate::error::{FetchError, Result};

/// Upper bound on status line plus headers.
pub(crate) const MAX_HEAD_BYTES: u64 = 64 * 1024;

const BODY_CHUNK: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusLine {
    pub version: String,
    pub status: u16,
    pub reason: String,
}

/// `HTTP/1.1 404 Not Found` → version, code, reason. The reason phrase may
/// contain spaces and may be absent.
pub(crate) fn parse_status_line(line: &str) -> Result<StatusLine> {
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    let code = parts.next().unwrap_or_default();
    let reason = parts.next().unwrap_or_default();

    if !version.starts_with("HTTP/") {
        return Err(FetchError::MalformedResponse(format!(
            "bad status line {:?}",
            line
        )));
    }
    let status = code.parse::<u16>().map_err(|_| {
        FetchError::MalformedResponse(format!("bad status code in {:?}", line))
    })?;

    Ok(StatusLine {
        version: version.to_string(),
        status,
        reason: reason.to_string(),
    })
}

/// `Name: value` → (`name`, `value`) with the name lowercased and the value trimmed.
pub(crate) fn parse_header_line(line: &str) -> Result<(String, String)> {
    let (name, value) = line.split_once(':').ok_or_else(|| {
        FetchError::MalformedResponse(format!("header line without ':': {:?}", line))
    })?;
    Ok((name.trim().to_ascii_lowercase(), value.trim().to_string()))
}

/// Reads the status line and headers up to and including the blank line.
/// Later duplicates of a header replace earlier ones.
pub(crate) fn read_head<R: BufRead>(
    reader: &mut R,
) -> Result<(StatusLine, HashMap<String, String>)> {
    let mut budget = MAX_HEAD_BYTES;

    let status_line = read_line(reader, &mut budget)?;
    let status = parse_status_line(&status_line)?;

    let mut headers = HashMap::new();
    loop {
        let line = read_line(reader, &mut budget)?;
        if line.is_empty() {
            break;
        }
        let (name, value) = parse_header_line(&line)?;
        headers.insert(name, value);
    }

    Ok((status, headers))
}

/// One trimmed line of the head. End of stream here is never valid.
fn read_line<R: BufRead>(reader: &mut R, budget: &mut u64) -> Result<String> {
    let mut buf = Vec::new();
    let n = reader
        .by_ref()
        .take(*budget)
        .read_until(b'\n', &mut buf)
        .map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => FetchError::MalformedResponse(
                "connection closed before end of headers".to_string(),
            ),
            _ => FetchError::Transport(e),
        })?;

    if n == 0 {
        if *budget == 0 {
            return Err(FetchError::MalformedResponse(format!(
                "response head exceeds {} bytes",
                MAX_HEAD_BYTES
            )));
        }
        return Err(FetchError::MalformedResponse(
            "connection closed before end of headers".to_string(),
        ));
    }
    *budget -= n as u64;
    if buf.last() != Some(&b'\n') {
        if *budget == 0 {
            return Err(FetchError::MalformedResponse(format!(
                "response head exceeds {} bytes",
                MAX_HEAD_BYTES
            )));
        }
        return Err(FetchError::MalformedResponse(
            "connection closed before end of headers".to_string(),
        ));
    }

    let line = String::from_utf8(buf).map_err(|_| {
        FetchError::MalformedResponse("response head is not valid UTF-8".to_string())
    })?;
    Ok(line.trim().to_string())
}

/// Rejects bodies that need chunked decoding or decompression.
pub(crate) fn check_framing(headers: &HashMap<String, String>) -> Result<()> {
    for header in ["transfer-encoding", "content-encoding"] {
        if let Some(value) = headers.get(header) {
            return Err(FetchError::UnsupportedFraming {
                header,
                value: value.clone(),
            });
        }
    }
    Ok(())
}

/// Declared body length; 0 when `Content-Length` is absent.
pub(crate) fn content_length(headers: &HashMap<String, String>) -> Result<u64> {
    match headers.get("content-length") {
        None => Ok(0),
        Some(value) => value.parse::<u64>().map_err(|_| {
            FetchError::MalformedResponse(format!("bad Content-Length {:?}", value))
        }),
    }
}

/// Reads exactly `expected` bytes, across as many partial reads as the
/// stream needs. Fewer bytes before end of stream is a truncation and the
/// partial data is dropped.
pub(crate) fn read_body<R: Read>(reader: &mut R, expected: u64) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(expected.min(1024 * 1024) as usize);
    let mut chunk = [0u8; BODY_CHUNK];

    while (body.len() as u64) < expected {
        let want = (expected - body.len() as u64).min(BODY_CHUNK as u64) as usize;
        match reader.read(&mut chunk[..want]) {
            Ok(0) => {
                return Err(FetchError::TruncatedBody {
                    expected,
                    received: body.len() as u64,
                })
            }
            Ok(n) => body.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            // TLS peer went away without close_notify.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(FetchError::TruncatedBody {
                    expected,
                    received: body.len() as u64,
                })
            }
            Err(e) => return Err(FetchError::Transport(e)),
        }
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    /// Reader that hands out at most one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn status_line_with_spaced_reason() {
        let s = parse_status_line("HTTP/1.1 404 Not Found Here").unwrap();
        assert_eq!(s.version, "HTTP/1.1");
        assert_eq!(s.status, 404);
        assert_eq!(s.reason, "Not Found Here");
    }

    #[test]
    fn status_line_without_reason() {
        let s = parse_status_line("HTTP/1.0 200").unwrap();
        assert_eq!(s.status, 200);
        assert_eq!(s.reason, "");
    }

    #[test]
    fn status_line_garbage() {
        assert!(parse_status_line("").is_err());
        assert!(parse_status_line("HTTP/1.1 abc OK").is_err());
        assert!(parse_status_line("SSH-2.0-OpenSSH_9.6").is_err());
    }

    #[test]
    fn header_name_lowercased_value_trimmed() {
        let (n, v) = parse_header_line("Content-Type:   text/html; charset=utf-8  ").unwrap();
        assert_eq!(n, "content-type");
        assert_eq!(v, "text/html; charset=utf-8");
        let (n, v) = parse_header_line("Location: http://x:8080/").unwrap();
        assert_eq!(n, "location");
        assert_eq!(v, "http://x:8080/");
    }

    #[test]
    fn header_without_colon_is_malformed() {
        assert!(matches!(
            parse_header_line("garbage"),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn head_duplicates_last_wins() {
        let raw = b"HTTP/1.1 200 OK\r\nX-A: 1\r\nx-a: 2\r\nContent-Length: 0\r\n\r\nrest";
        let mut reader = BufReader::new(&raw[..]);
        let (status, headers) = read_head(&mut reader).unwrap();
        assert_eq!(status.status, 200);
        assert_eq!(headers.get("x-a").map(String::as_str), Some("2"));
        assert_eq!(headers.len(), 2);
        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "rest");
    }

    #[test]
    fn head_accepts_bare_lf() {
        let raw = b"HTTP/1.1 200 OK\nContent-Length: 3\n\nabc";
        let (_, headers) = read_head(&mut Cursor::new(&raw[..])).unwrap();
        assert_eq!(headers.get("content-length").map(String::as_str), Some("3"));
    }

    #[test]
    fn head_eof_before_blank_line() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n";
        assert!(matches!(
            read_head(&mut Cursor::new(&raw[..])),
            Err(FetchError::MalformedResponse(_))
        ));
        assert!(matches!(
            read_head(&mut Cursor::new(&b""[..])),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn head_too_large() {
        let mut raw = b"HTTP/1.1 200 OK\r\nX-Big: ".to_vec();
        raw.extend(std::iter::repeat(b'a').take(MAX_HEAD_BYTES as usize));
        raw.extend_from_slice(b"\r\n\r\n");
        match read_head(&mut Cursor::new(raw)) {
            Err(FetchError::MalformedResponse(msg)) => assert!(msg.contains("exceeds")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn framing_rejects_chunked_and_compressed() {
        let mut headers = HashMap::new();
        assert!(check_framing(&headers).is_ok());
        headers.insert("transfer-encoding".to_string(), "chunked".to_string());
        assert!(matches!(
            check_framing(&headers),
            Err(FetchError::UnsupportedFraming {
                header: "transfer-encoding",
                ..
            })
        ));
        headers.clear();
        headers.insert("content-encoding".to_string(), "gzip".to_string());
        assert!(matches!(
            check_framing(&headers),
            Err(FetchError::UnsupportedFraming {
                header: "content-encoding",
                ..
            })
        ));
    }

    #[test]
    fn content_length_absent_or_bad() {
        let mut headers = HashMap::new();
        assert_eq!(content_length(&headers).unwrap(), 0);
        headers.insert("content-length".to_string(), "42".to_string());
        assert_eq!(content_length(&headers).unwrap(), 42);
        headers.insert("content-length".to_string(), "-1".to_string());
        assert!(content_length(&headers).is_err());
    }

    #[test]
    fn body_accumulates_partial_reads() {
        let data = b"<div>Hello, world!</div>";
        let body = read_body(&mut Trickle(data), data.len() as u64).unwrap();
        assert_eq!(body, data);
    }

    #[test]
    fn body_stops_at_content_length() {
        let body = read_body(&mut Cursor::new(&b"abcdef"[..]), 3).unwrap();
        assert_eq!(body, b"abc");
    }

    #[test]
    fn body_truncated() {
        match read_body(&mut Trickle(b"abc"), 10) {
            Err(FetchError::TruncatedBody { expected, received }) => {
                assert_eq!(expected, 10);
                assert_eq!(received, 3);
            }
            other => panic!("expected TruncatedBody, got {other:?}"),
        }
    }

    /// Hands out its bytes, then fails like a TLS stream whose peer closed
    /// the socket without `close_notify`.
    struct AbruptTls<'a>(&'a [u8]);

    impl Read for AbruptTls<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "peer closed connection without sending TLS close_notify",
                ));
            }
            let n = self.0.len().min(buf.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn body_unexpected_eof_is_truncated() {
        match read_body(&mut AbruptTls(b"abc"), 10) {
            Err(FetchError::TruncatedBody { expected, received }) => {
                assert_eq!(expected, 10);
                assert_eq!(received, 3);
            }
            other => panic!("expected TruncatedBody, got {other:?}"),
        }
    }

    #[test]
    fn body_complete_before_unexpected_eof() {
        let body = read_body(&mut AbruptTls(b"abc"), 3).unwrap();
        assert_eq!(body, b"abc");
    }

    #[test]
    fn body_zero_length_reads_nothing() {
        let body = read_body(&mut Cursor::new(&b"ignored"[..]), 0).unwrap();
        assert!(body.is_empty());
    }
}
