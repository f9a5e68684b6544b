//! Request serialization.

use std::fmt::Write;

/// Builds the exact bytes of a `GET` request for `path` on `host`.
///
/// Header order is fixed: `Host`, `Connection: close`, `User-Agent`. The
/// transport lives for one response only, so the connection is never
/// advertised as reusable.
pub fn serialize_request(host: &str, path: &str, user_agent: &str) -> Vec<u8> {
    let headers = [
        ("Host", host),
        ("Connection", "close"),
        ("User-Agent", user_agent),
    ];

    let mut request = format!("GET {} HTTP/1.1\r\n", path);
    for (name, value) in headers {
        // Writing into a String cannot fail.
        let _ = write!(request, "{}: {}\r\n", name, value);
    }
    request.push_str("\r\n");
    request.into_bytes()
}
