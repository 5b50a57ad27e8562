//! Canned HTTP responder for exercising engine sessions in tests.

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

pub(crate) struct EngineStub {
    pub addr: SocketAddr,
    pub requests: mpsc::UnboundedReceiver<String>,
}

impl EngineStub {
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.addr.port())
    }
}

/// Spawn a stub engine node answering sequential connections until the test
/// runtime shuts down.
///
/// Select requests (path `/select`) receive `select_body`; anything else
/// (updates, deletes) receives a minimal acknowledgement. Every response
/// carries `status`. Full request text is captured on the `requests` channel.
pub(crate) async fn spawn_engine_stub(status: &'static str, select_body: String) -> EngineStub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let Some(raw) = read_request(&mut stream).await else {
                continue;
            };
            let body = if raw.starts_with("GET /select") {
                select_body.clone()
            } else {
                r#"{"responseHeader":{"status":0,"QTime":1}}"#.to_string()
            };
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len(),
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
            let _ = tx.send(raw);
        }
    });
    EngineStub { addr, requests: rx }
}

/// Read one full HTTP request: head plus Content-Length bytes of body.
async fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        if let Some(head_end) = find_head_end(&data) {
            let head = String::from_utf8_lossy(&data[..head_end]).into_owned();
            let total = head_end + 4 + content_length_of(&head);
            while data.len() < total {
                let n = stream.read(&mut buf).await.ok()?;
                if n == 0 {
                    break;
                }
                data.extend_from_slice(&buf[..n]);
            }
            return Some(String::from_utf8_lossy(&data).into_owned());
        }
        let n = stream.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
    }
}

fn find_head_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length_of(head: &str) -> usize {
    for line in head.lines() {
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                return value.trim().parse().unwrap_or(0);
            }
        }
    }
    0
}
