//! HttpRecognitionClient against an in-process backend

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use docscan_config::recognition::RecognitionConfig;
use docscan_types::{ExtractedText, Image, ImageOrigin};
use tokio::net::TcpListener;

use crate::response::PARSE_ERROR_MESSAGE;
use crate::{HttpRecognitionClient, RecognitionClient, RecognitionError};

struct MockBackend {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    hits: AtomicUsize,
    last_content_type: Mutex<Option<String>>,
    last_body: Mutex<Vec<u8>>,
}

impl MockBackend {
    fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
            hits: AtomicUsize::new(0),
            last_content_type: Mutex::new(None),
            last_body: Mutex::new(Vec::new()),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn handle_ocr(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    *backend.last_content_type.lock().unwrap() = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *backend.last_body.lock().unwrap() = body.to_vec();

    if let Some(delay) = backend.delay {
        tokio::time::sleep(delay).await;
    }

    (
        backend.status,
        [(header::CONTENT_TYPE, "application/json")],
        backend.body.clone(),
    )
}

/// Serve `backend` on an ephemeral port, return the endpoint URL
async fn serve(backend: Arc<MockBackend>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/api/ocr", post(handle_ocr))
        .with_state(backend);

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{}/api/ocr", addr)
}

fn client_for(url: String, timeout_secs: u64) -> HttpRecognitionClient {
    HttpRecognitionClient::new(&RecognitionConfig {
        endpoint_url: url,
        request_timeout_secs: timeout_secs,
    })
    .unwrap()
}

fn png_image() -> Image {
    let bytes = b"\x89PNG\r\n\x1a\nfake-pixels".to_vec();
    Image::new(bytes, "image/png", ImageOrigin::File).with_name("receipt.png")
}

#[tokio::test]
async fn test_success_returns_text() {
    let backend = Arc::new(MockBackend::new(StatusCode::OK, r#"{"text":"Hello"}"#));
    let client = client_for(serve(backend.clone()).await, 5);

    let text = client.recognize(&png_image()).await;

    assert_eq!(text, Ok(ExtractedText::from("Hello")));
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_request_is_multipart_with_file_field() {
    let backend = Arc::new(MockBackend::new(StatusCode::OK, r#"{"text":""}"#));
    let client = client_for(serve(backend.clone()).await, 5);

    client.recognize(&png_image()).await.unwrap();

    let content_type = backend.last_content_type.lock().unwrap().clone().unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "{}", content_type);

    let body = String::from_utf8_lossy(&backend.last_body.lock().unwrap()).to_string();
    assert!(body.contains(r#"name="file""#), "{}", body);
    assert!(body.contains(r#"filename="receipt.png""#), "{}", body);
    assert!(body.contains("Content-Type: image/png"), "{}", body);
    assert!(body.contains("fake-pixels"));
}

#[tokio::test]
async fn test_unnamed_image_gets_generated_file_name() {
    let backend = Arc::new(MockBackend::new(StatusCode::OK, r#"{"text":"x"}"#));
    let client = client_for(serve(backend.clone()).await, 5);

    let image = Image::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg", ImageOrigin::Camera);
    client.recognize(&image).await.unwrap();

    let body = String::from_utf8_lossy(&backend.last_body.lock().unwrap()).to_string();
    assert!(body.contains(r#"filename="image.jpg""#), "{}", body);
}

#[tokio::test]
async fn test_empty_text_is_success() {
    let backend = Arc::new(MockBackend::new(StatusCode::OK, r#"{"text":""}"#));
    let client = client_for(serve(backend).await, 5);

    let text = client.recognize(&png_image()).await.unwrap();
    assert!(text.is_empty());
}

#[tokio::test]
async fn test_error_field_on_client_error_status() {
    let backend = Arc::new(MockBackend::new(
        StatusCode::BAD_REQUEST,
        r#"{"error":"bad image"}"#,
    ));
    let client = client_for(serve(backend).await, 5);

    assert_eq!(
        client.recognize(&png_image()).await,
        Err(RecognitionError::Application("bad image".to_string()))
    );
}

#[tokio::test]
async fn test_error_field_on_ok_status() {
    let backend = Arc::new(MockBackend::new(StatusCode::OK, r#"{"error":"bad image"}"#));
    let client = client_for(serve(backend).await, 5);

    assert_eq!(
        client.recognize(&png_image()).await,
        Err(RecognitionError::Application("bad image".to_string()))
    );
}

#[tokio::test]
async fn test_malformed_body_is_protocol_error() {
    let backend = Arc::new(MockBackend::new(
        StatusCode::BAD_GATEWAY,
        "<html>upstream down</html>",
    ));
    let client = client_for(serve(backend).await, 5);

    assert_eq!(
        client.recognize(&png_image()).await,
        Err(RecognitionError::Protocol(PARSE_ERROR_MESSAGE.to_string()))
    );
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{}/api/ocr", addr), 5);
    let result = client.recognize(&png_image()).await;

    assert!(matches!(result, Err(RecognitionError::Transport(_))), "{:?}", result);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = Arc::new(
        MockBackend::new(StatusCode::OK, r#"{"text":"late"}"#).with_delay(Duration::from_secs(3)),
    );
    let client = client_for(serve(backend).await, 1);

    assert_eq!(
        client.recognize(&png_image()).await,
        Err(RecognitionError::Transport("Request timed out".to_string()))
    );
}

#[tokio::test]
async fn test_failures_are_not_retried() {
    let backend = Arc::new(MockBackend::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
    ));
    let client = client_for(serve(backend.clone()).await, 5);

    assert!(client.recognize(&png_image()).await.is_err());
    assert_eq!(backend.hits(), 1);
}
