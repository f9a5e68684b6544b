//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every connection with the same canned bytes and records each
//! request head so tests can compare the wire format byte-for-byte. The
//! connection is closed right after the response, so a response whose body
//! is shorter than its Content-Length exercises truncation.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct CannedServer {
    pub port: u16,
    requests: Receiver<Vec<u8>>,
}

impl CannedServer {
    /// Reads each request head, then writes `response` and closes.
    pub fn start(response: Vec<u8>) -> Self {
        Self::spawn(response, true)
    }

    /// Writes `response` as soon as a client connects, without reading.
    /// Used to feed garbage to a client that expects to speak first.
    pub fn start_eager(response: Vec<u8>) -> Self {
        Self::spawn(response, false)
    }

    /// `200 OK` with `body` and a correct Content-Length.
    pub fn ok(body: &str) -> Self {
        Self::start(
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            )
            .into_bytes(),
        )
    }

    fn spawn(response: Vec<u8>, read_first: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();
        let response = Arc::new(response);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let response = Arc::clone(&response);
                let tx = tx.clone();
                thread::spawn(move || handle(stream, &response, read_first, tx));
            }
        });
        Self { port, requests: rx }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Next recorded request head (including the terminating blank line).
    pub fn next_request(&self) -> Vec<u8> {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("server saw no request")
    }
}

fn handle(mut stream: TcpStream, response: &[u8], read_first: bool, tx: Sender<Vec<u8>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    if read_first {
        let head = read_head(&mut stream);
        let _ = tx.send(head);
    }
    let _ = stream.write_all(response);
    let _ = stream.flush();
}

fn read_head(stream: &mut TcpStream) -> Vec<u8> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    head
}
