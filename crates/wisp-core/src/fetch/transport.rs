//! Byte-stream transports: plain TCP and TLS over TCP.

use std::io::{self, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use super::FetchOptions;
use crate::error::{FetchError, Result};

pub(crate) type TlsStream = StreamOwned<ClientConnection, TcpStream>;

/// Resolves `host` and connects to the first address that accepts, applying
/// the configured connect and read/write deadlines.
pub(crate) fn connect_tcp(host: &str, port: u16, options: &FetchOptions) -> Result<TcpStream> {
    let failed = |source: io::Error| FetchError::ConnectionFailed {
        host: host.to_string(),
        port,
        source,
    };

    let addrs = (host, port).to_socket_addrs().map_err(failed)?;
    let mut last_err = None;
    for addr in addrs {
        let attempt = match options.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                stream
                    .set_read_timeout(options.read_timeout)
                    .map_err(failed)?;
                stream
                    .set_write_timeout(options.read_timeout)
                    .map_err(failed)?;
                tracing::debug!(%addr, "connected");
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!(%addr, error = %e, "connect attempt failed");
                last_err = Some(e);
            }
        }
    }

    Err(failed(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
    })))
}

/// Client config trusting the Mozilla root set, TLS 1.2 and 1.3.
fn client_config() -> std::result::Result<Arc<ClientConfig>, rustls::Error> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(Arc::new(config))
}

/// Negotiates TLS over `tcp`, verifying the certificate against `host`.
/// The handshake completes here, before any application data is written.
pub(crate) fn handshake(host: &str, tcp: TcpStream) -> Result<TlsStream> {
    let failed = |source: Box<dyn std::error::Error + Send + Sync>| {
        FetchError::TlsHandshakeFailed {
            host: host.to_string(),
            source,
        }
    };

    let config = client_config().map_err(|e| failed(e.into()))?;
    let name = ServerName::try_from(host.to_string()).map_err(|e| failed(e.into()))?;
    let conn = ClientConnection::new(config, name).map_err(|e| failed(e.into()))?;

    let mut stream = StreamOwned::new(conn, tcp);
    while stream.conn.is_handshaking() {
        stream
            .conn
            .complete_io(&mut stream.sock)
            .map_err(|e| failed(e.into()))?;
    }
    tracing::debug!(
        host,
        version = ?stream.conn.protocol_version(),
        "tls established"
    );
    Ok(stream)
}

/// Best-effort `close_notify`; the socket itself closes when dropped.
pub(crate) fn close_tls(stream: &mut TlsStream) {
    stream.conn.send_close_notify();
    if stream.conn.write_tls(&mut stream.sock).is_ok() {
        let _ = stream.sock.flush();
    }
}
