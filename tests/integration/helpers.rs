//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use hive_api::{AppState, build_app};
use hive_core::config::AppConfig;
use hive_core::traits::Repository;
use hive_entity::{Device, Network, Storage};
use hive_kv::KvStore;

/// Test application context over the in-memory backend.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Repositories for seeding and direct assertions
    pub storage: Storage,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let storage = KvStore::new().storage();
        let state =
            AppState::new(AppConfig::default(), storage.clone()).expect("Failed to build state");
        Self {
            router: build_app(state),
            storage,
        }
    }

    /// Serve the router on an ephemeral local port.
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });
        addr
    }

    pub async fn create_network(&self, name: &str) -> Network {
        self.storage
            .networks
            .persist(Network::named(name))
            .await
            .expect("Failed to create network")
    }

    /// Create a device whose key is `"{guid}-key"`.
    pub async fn create_device(&self, guid: &str, network: Option<&Network>) -> Device {
        let mut device = Device::new(guid, format!("{guid}-key"), guid.to_uppercase());
        device.network_id = network.and_then(|n| n.id);
        self.storage
            .devices
            .persist(device)
            .await
            .expect("Failed to create device")
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// A device-side WebSocket client.
pub struct DeviceClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl DeviceClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let (stream, _) = connect_async(format!("ws://{addr}/websocket/device"))
            .await
            .expect("Failed to open device socket");
        Self { stream }
    }

    pub async fn send(&mut self, frame: Value) {
        self.stream
            .send(Message::Text(frame.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    pub async fn send_raw(&mut self, message: Message) {
        self.stream.send(message).await.expect("Failed to send frame");
    }

    /// Next JSON frame, failing the test after two seconds.
    pub async fn recv(&mut self) -> Value {
        loop {
            let message = tokio::time::timeout(Duration::from_secs(2), self.stream.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Socket closed")
                .expect("Socket error");
            if let Message::Text(text) = message {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
        }
    }

    /// Skip frames until the response carrying `request_id`.
    pub async fn response_to(&mut self, request_id: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["requestId"] == request_id {
                return frame;
            }
        }
    }

    /// Send `frame` tagged with `request_id` and wait for its response.
    pub async fn call(&mut self, request_id: &str, mut frame: Value) -> Value {
        frame["requestId"] = Value::String(request_id.to_string());
        self.send(frame).await;
        self.response_to(request_id).await
    }

    pub async fn authenticate(&mut self, guid: &str) -> Value {
        self.call(
            "auth",
            serde_json::json!({
                "action": "authenticate",
                "deviceId": guid,
                "deviceKey": format!("{guid}-key"),
            }),
        )
        .await
    }
}
