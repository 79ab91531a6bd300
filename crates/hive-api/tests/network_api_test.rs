//! `/network` REST endpoints through the full router.

use std::collections::HashSet;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use hive_api::{AppState, build_app};
use hive_core::config::AppConfig;
use hive_core::traits::Repository;
use hive_entity::repository::UserRepository;
use hive_entity::{AccessKey, AccessKeyPermission, Device, Network, Storage, User, UserRole, actions};
use hive_kv::KvStore;

struct TestApp {
    router: Router,
    storage: Storage,
}

#[derive(Debug)]
struct TestResponse {
    status: StatusCode,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let storage = KvStore::new().storage();
        let state = AppState::new(AppConfig::default(), storage.clone()).expect("state");
        Self {
            router: build_app(state),
            storage,
        }
    }

    async fn user(&self, login: &str, role: UserRole) -> User {
        self.storage.users.persist(User::new(login, role)).await.unwrap()
    }

    async fn key(&self, secret: &str, user: &User, permission: AccessKeyPermission) -> AccessKey {
        self.key_expiring(secret, user, permission, None).await
    }

    async fn key_expiring(
        &self,
        secret: &str,
        user: &User,
        permission: AccessKeyPermission,
        expiration: Option<chrono::DateTime<Utc>>,
    ) -> AccessKey {
        self.storage
            .access_keys
            .persist(AccessKey {
                id: None,
                key: secret.into(),
                label: secret.into(),
                user_id: user.id.unwrap(),
                expiration,
                permissions: vec![permission],
            })
            .await
            .unwrap()
    }

    async fn network(&self, name: &str) -> Network {
        self.storage.networks.persist(Network::named(name)).await.unwrap()
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let req = req.body(Body::from(body_str)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }
}

fn allow(action_names: &[&str]) -> AccessKeyPermission {
    AccessKeyPermission {
        actions: Some(action_names.iter().map(|a| a.to_string()).collect()),
        ..Default::default()
    }
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_missing_or_bad_credentials_are_unauthorized() {
    let app = TestApp::new();
    let admin = app.user("root", UserRole::Admin).await;
    app.key_expiring(
        "stale",
        &admin,
        AccessKeyPermission::default(),
        Some(Utc::now() - Duration::minutes(1)),
    )
    .await;

    let response = app.request("GET", "/network", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHENTICATION");

    let response = app.request("GET", "/network", None, Some("unknown")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", "/network", None, Some("stale")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_filters_sorts_and_pages() {
    let app = TestApp::new();
    let admin = app.user("root", UserRole::Admin).await;
    app.key("admin-key", &admin, AccessKeyPermission::default()).await;
    for name in ["Foo", "Football", "Bar", "afore"] {
        app.network(name).await;
    }

    let response = app
        .request("GET", "/network?name=Foo", None, Some("admin-key"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(names(&response.body), vec!["Foo"]);

    let response = app
        .request(
            "GET",
            "/network?namePattern=Fo&sortField=Name&sortOrder=ASC",
            None,
            Some("admin-key"),
        )
        .await;
    assert_eq!(names(&response.body), vec!["Foo", "Football", "afore"]);

    let response = app
        .request(
            "GET",
            "/network?sortField=ID&sortOrder=DESC&take=2&skip=1",
            None,
            Some("admin-key"),
        )
        .await;
    assert_eq!(names(&response.body), vec!["Bar", "Football"]);

    let response = app
        .request("GET", "/network?sortField=size", None, Some("admin-key"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_update_delete_round_trip() {
    let app = TestApp::new();
    let admin = app.user("root", UserRole::Admin).await;
    app.key("admin-key", &admin, AccessKeyPermission::default()).await;

    let response = app
        .request(
            "POST",
            "/network",
            Some(json!({"name": "Lab", "description": "first floor"})),
            Some("admin-key"),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_i64().unwrap();

    let response = app
        .request("POST", "/network", Some(json!({"name": "Lab"})), Some("admin-key"))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request("POST", "/network", Some(json!({"name": ""})), Some("admin-key"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", "/network", Some(json!({})), Some("admin-key"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "PUT",
            &format!("/network/{id}"),
            Some(json!({"description": "second floor"})),
            Some("admin-key"),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Lab");
    assert_eq!(response.body["description"], "second floor");

    let response = app
        .request("GET", &format!("/network/{id}"), None, Some("admin-key"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["devices"], json!([]));

    let response = app
        .request("DELETE", &format!("/network/{id}"), None, Some("admin-key"))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", &format!("/network/{id}"), None, Some("admin-key"))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_key_actions_gate_management() {
    let app = TestApp::new();
    let admin = app.user("root", UserRole::Admin).await;
    app.key("read-only", &admin, allow(&[actions::GET_NETWORK])).await;
    let network = app.network("Lab").await;

    let response = app.request("GET", "/network", None, Some("read-only")).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("POST", "/network", Some(json!({"name": "New"})), Some("read-only"))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "DELETE",
            &format!("/network/{}", network.id.unwrap()),
            None,
            Some("read-only"),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.storage.networks.find(network.id.unwrap()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_client_key_sees_only_granted_networks_and_devices() {
    let app = TestApp::new();
    let client = app.user("alice", UserRole::Client).await;
    let home = app.network("home").await;
    let office = app.network("office").await;
    app.storage
        .users
        .grant_network(client.id.unwrap(), home.id.unwrap())
        .await
        .unwrap();

    let mut lamp = Device::new("lamp", "lamp-key", "Lamp");
    lamp.network_id = home.id;
    app.storage.devices.persist(lamp).await.unwrap();

    let scoped = AccessKeyPermission {
        actions: Some(HashSet::from([actions::GET_NETWORK.to_string()])),
        device_guids: Some(HashSet::from(["lamp".to_string()])),
        ..Default::default()
    };
    app.key("alice-key", &client, scoped).await;

    let response = app.request("GET", "/network", None, Some("alice-key")).await;
    assert_eq!(names(&response.body), vec!["home"]);

    let response = app
        .request(
            "GET",
            &format!("/network/{}", home.id.unwrap()),
            None,
            Some("alice-key"),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["devices"][0]["id"], "lamp");
    assert!(response.body["devices"][0].get("key").is_none());

    let response = app
        .request(
            "GET",
            &format!("/network/{}", office.id.unwrap()),
            None,
            Some("alice-key"),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["sessions"], 0);
}
