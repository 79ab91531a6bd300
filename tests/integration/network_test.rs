//! Devices registered over the socket show up in the network REST view.

use axum::http::StatusCode;
use serde_json::json;

use hive_core::traits::Repository;
use hive_entity::{AccessKey, AccessKeyPermission, User, UserRole};

use crate::helpers::{DeviceClient, TestApp};

async fn admin_key(app: &TestApp, secret: &str) {
    let admin = app
        .storage
        .users
        .persist(User::new("root", UserRole::Admin))
        .await
        .expect("Failed to create user");
    app.storage
        .access_keys
        .persist(AccessKey {
            id: None,
            key: secret.to_string(),
            label: "admin".to_string(),
            user_id: admin.id.expect("user id"),
            expiration: None,
            permissions: vec![AccessKeyPermission::default()],
        })
        .await
        .expect("Failed to create access key");
}

#[tokio::test]
async fn test_saved_device_is_listed_under_its_network() {
    let app = TestApp::new();
    admin_key(&app, "admin-secret").await;
    let addr = app.spawn().await;

    let mut client = DeviceClient::connect(addr).await;
    let response = client
        .call(
            "save",
            json!({
                "action": "device/save",
                "deviceId": "thermo-1",
                "deviceKey": "thermo-key",
                "device": {
                    "name": "Thermostat",
                    "key": "thermo-key",
                    "network": {"name": "garage"},
                    "deviceClass": {"name": "Climate", "version": "1.0"}
                }
            }),
        )
        .await;
    assert_eq!(response["status"], "success", "{response}");

    let response = app
        .request("GET", "/network?name=garage", Some("admin-secret"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let id = response.body[0]["id"].as_i64().expect("network id");

    let response = app
        .request("GET", &format!("/network/{id}"), Some("admin-secret"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "garage");
    assert_eq!(response.body["devices"][0]["id"], "thermo-1");
    assert_eq!(response.body["devices"][0]["deviceClass"]["name"], "Climate");
}

#[tokio::test]
async fn test_network_listing_requires_a_key() {
    let app = TestApp::new();

    let response = app.request("GET", "/network", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
