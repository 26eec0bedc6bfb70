//! Shared fixtures for unit tests: encoded images and a loopback HTTP server.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tokio::net::TcpListener;

fn encode(format: image::ImageFormat) -> Bytes {
    let img = image::DynamicImage::new_rgb8(8, 8);
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("encoding a blank image cannot fail");
    Bytes::from(buf)
}

/// A small valid PNG.
pub fn png_bytes() -> Bytes {
    encode(image::ImageFormat::Png)
}

/// A small valid JPEG.
pub fn jpeg_bytes() -> Bytes {
    encode(image::ImageFormat::Jpeg)
}

/// HTTP client that ignores proxy settings from the environment.
pub fn test_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(timeout)
        .build()
        .expect("test client")
}

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl CannedResponse {
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self::with_status(200, content_type, body)
    }

    pub fn with_status(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            body,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn not_found() -> Self {
        Self::with_status(404, "text/plain", b"not found".to_vec())
    }
}

/// Loopback HTTP server answering each path with a canned response.
pub struct TestServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

#[derive(Clone)]
struct ServerState {
    routes: Arc<HashMap<String, CannedResponse>>,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    pub async fn start(routes: Vec<(&str, CannedResponse)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let state = ServerState {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|(path, response)| (path.to_string(), response))
                    .collect(),
            ),
            hits: hits.clone(),
        };

        let app = Router::new().fallback(respond).with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn respond(State(state): State<ServerState>, uri: Uri) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let canned = state
        .routes
        .get(uri.path())
        .cloned()
        .unwrap_or_else(CannedResponse::not_found);

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, canned.content_type)],
        canned.body,
    )
        .into_response()
}
