//! Minimal in-process HTTP server for exercising the feed client.
//!
//! Serves canned responses in order; the last one repeats once the script
//! runs out. Every connection is answered with `Connection: close`.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum StubResponse {
    Respond { status: u16, body: Vec<u8> },
    /// Read the request and never answer.
    Hang,
}

impl StubResponse {
    pub fn ok(body: &str) -> Self {
        Self::ok_bytes(body.as_bytes().to_vec())
    }

    pub fn ok_bytes(body: Vec<u8>) -> Self {
        Self::Respond { status: 200, body }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::Respond {
            status,
            body: body.as_bytes().to_vec(),
        }
    }
}

pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let requests = Arc::new(AtomicUsize::new(0));
        let script = Arc::new(Mutex::new(VecDeque::from(responses)));

        let counter = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let response = next_response(&script);
                let counter = Arc::clone(&counter);
                tokio::spawn(async move {
                    serve(stream, response, &counter).await;
                });
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/signals", self.addr)).expect("stub server url")
    }

    /// Requests fully read so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// A URL on a port nothing is listening on.
    pub async fn unused_url() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind throwaway listener");
        let addr = listener.local_addr().expect("throwaway listener address");
        drop(listener);
        Url::parse(&format!("http://{addr}/signals")).expect("unused url")
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn next_response(script: &Mutex<VecDeque<StubResponse>>) -> StubResponse {
    let mut script = script.lock().expect("stub script lock");
    if script.len() > 1 {
        script.pop_front().expect("non-empty script")
    } else {
        script
            .front()
            .cloned()
            .unwrap_or_else(|| StubResponse::status(404, ""))
    }
}

async fn serve(mut stream: TcpStream, response: StubResponse, counter: &AtomicUsize) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    counter.fetch_add(1, Ordering::SeqCst);

    match response {
        StubResponse::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        StubResponse::Respond { status, body } => {
            let reason = if status == 200 { "OK" } else { "Stub" };
            let head = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&body).await;
            let _ = stream.shutdown().await;
        }
    }
}
