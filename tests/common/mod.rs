//! Shared utilities for ping integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cronitor_agent::config::{AgentConfig, TransportErrorPolicy};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request target, e.g. `/abc/run?try=1&msg=`.
    pub target: String,
    pub user_agent: Option<String>,
}

/// Requests received by a mock backend, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `status` receives the request itself and returns the status code to send.
pub async fn start_programmable_backend<F>(status: F) -> (SocketAddr, Recorder)
where
    F: Fn(&RecordedRequest) -> u16 + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorder = Recorder::default();
    let status = Arc::new(status);

    let rec = recorder.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let status = status.clone();
                    let rec = rec.clone();
                    tokio::spawn(async move {
                        let (reader, mut writer) = socket.split();
                        let Some(request) = read_request(reader).await else {
                            return;
                        };
                        let code = status(&request);
                        rec.push(request);

                        let body = "ok";
                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            code,
                            reason(code),
                            body.len(),
                            body
                        );
                        let _ = writer.write_all(response.as_bytes()).await;
                        let _ = writer.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, recorder)
}

/// Mock backend that answers `code` with `Content-Length: 100` but sends a
/// two-byte body and closes, so the body read fails after the headers.
pub async fn start_truncated_backend(code: u16) -> (SocketAddr, Recorder) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorder = Recorder::default();

    let rec = recorder.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let rec = rec.clone();
            tokio::spawn(async move {
                let (reader, mut writer) = socket.split();
                let Some(request) = read_request(reader).await else {
                    return;
                };
                rec.push(request);

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: 100\r\nConnection: close\r\n\r\nok",
                    code,
                    reason(code)
                );
                let _ = writer.write_all(response.as_bytes()).await;
                let _ = writer.shutdown().await;
            });
        }
    });

    (addr, recorder)
}

/// Mock backend that always answers with `code`.
pub async fn start_fixed_backend(code: u16) -> (SocketAddr, Recorder) {
    start_programmable_backend(move |_| code).await
}

/// Mock backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// An address with nothing listening on it.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// Shared hit counter for backends that answer based on the overall attempt.
pub fn shared_counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

pub fn next(counter: &AtomicUsize) -> usize {
    counter.fetch_add(1, Ordering::SeqCst)
}

/// Agent config pointing the primary and fallback hosts at local backends.
pub fn local_config(primary: SocketAddr, fallback: SocketAddr) -> AgentConfig {
    let mut config = AgentConfig::default();
    config.hosts.primary = format!("http://{}", primary);
    config.hosts.fallback = format!("http://{}", fallback);
    config.ping.timeout_secs = 1;
    config.ping.system_proxy = false;
    config.ping.on_transport_error = TransportErrorPolicy::Abort;
    config
}

/// Read the request line and headers, keeping the target and User-Agent.
async fn read_request<R>(reader: R) -> Option<RecordedRequest>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
        return None;
    }
    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let mut user_agent = None;
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await.unwrap_or(0);
        if n == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = Some(value.trim().to_string());
            }
        }
    }

    Some(RecordedRequest { target, user_agent })
}

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
