//! Mock mirrors for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket};

/// Start a mirror that answers every request with `status`.
#[allow(dead_code)]
pub async fn start_mirror(status: u16) -> SocketAddr {
    start_programmable_mirror(move || async move { (status, Duration::ZERO) }).await
}

/// Start a mirror whose status and response delay are computed per request.
pub async fn start_programmable_mirror<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, Duration)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Drain the request head before answering.
                        let mut buf = [0u8; 2048];
                        let _ = socket.read(&mut buf).await;

                        let (status, delay) = f().await;
                        tokio::time::sleep(delay).await;

                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            status,
                            reason(status)
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mirror that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_black_hole() -> SocketAddr {
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

/// Reason phrase for a status line. Unknown codes are a bug in the test.
fn reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or_else(|| panic!("mock mirror asked to answer unknown status {}", status))
}

/// A port that refuses connections. The socket is bound but never listens,
/// so the port stays reserved (and closed) while the guard is alive.
#[allow(dead_code)]
pub struct ClosedPort {
    pub addr: SocketAddr,
    _socket: TcpSocket,
}

#[allow(dead_code)]
pub fn closed_port() -> ClosedPort {
    let socket = TcpSocket::new_v4().unwrap();
    socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = socket.local_addr().unwrap();
    ClosedPort { addr, _socket: socket }
}

/// A probe client that ignores proxy settings from the environment.
#[allow(dead_code)]
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
