//! Integration tests for device WebSocket sessions.

use axum::http::StatusCode;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

use crate::helpers::{DeviceClient, TestApp};

#[tokio::test]
async fn test_plain_get_is_not_upgraded() {
    let app = TestApp::new();

    let response = app.request("GET", "/websocket/device", None).await;

    assert!(
        response.status.is_client_error(),
        "Expected a 4xx without upgrade headers, got {}",
        response.status
    );
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.get("status").unwrap().as_str().unwrap(), "ok");
}

#[tokio::test]
async fn test_authenticate_and_echo_request_id() {
    let app = TestApp::new();
    app.create_device("lamp", None).await;
    let addr = app.spawn().await;

    let mut lamp = DeviceClient::connect(addr).await;
    let response = lamp.authenticate("lamp").await;
    assert_eq!(response["status"], "success");
    assert_eq!(response["action"], "authenticate");

    let response = lamp
        .call("info-1", json!({"action": "server/info"}))
        .await;
    assert_eq!(response["status"], "success");
    assert_eq!(response["action"], "server/info");
    assert!(response["info"]["serverTimestamp"].is_string());
}

#[tokio::test]
async fn test_unauthenticated_socket_gets_error_frames() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut client = DeviceClient::connect(addr).await;
    let response = client
        .call("r1", json!({"action": "command/subscribe"}))
        .await;
    assert_eq!(response["status"], "error");
    assert_eq!(response["code"], 403);

    client.send_raw(Message::Text("{broken".into())).await;
    let response = client.recv().await;
    assert_eq!(response["status"], "error");
    assert_eq!(response["code"], 400);

    client.send_raw(Message::Binary(vec![1u8, 2, 3].into())).await;
    let response = client.recv().await;
    assert_eq!(response["status"], "error");
}

#[tokio::test]
async fn test_command_flows_between_two_sockets() {
    let app = TestApp::new();
    let home = app.create_network("home").await;
    app.create_device("lamp", Some(&home)).await;
    app.create_device("switch", Some(&home)).await;
    let addr = app.spawn().await;

    let mut lamp = DeviceClient::connect(addr).await;
    lamp.authenticate("lamp").await;
    let response = lamp
        .call("sub", json!({"action": "command/subscribe"}))
        .await;
    assert_eq!(response["status"], "success");

    let mut switch = DeviceClient::connect(addr).await;
    switch.authenticate("switch").await;
    let response = switch
        .call(
            "insert",
            json!({
                "action": "command/insert",
                "deviceGuid": "lamp",
                "command": {"command": "on", "parameters": {"level": 40}}
            }),
        )
        .await;
    assert_eq!(response["status"], "success", "{response}");
    let command_id = response["command"]["id"].as_i64().unwrap();

    let push = lamp.recv().await;
    assert_eq!(push["action"], "command/insert");
    assert_eq!(push["deviceGuid"], "lamp");
    assert_eq!(push["command"]["id"], command_id);
    assert_eq!(push["command"]["command"], "on");
    assert_eq!(push["command"]["parameters"]["level"], 40);

    let response = lamp
        .call(
            "done",
            json!({
                "action": "command/update",
                "commandId": command_id,
                "command": {"status": "done", "result": {"level": 40}}
            }),
        )
        .await;
    assert_eq!(response["status"], "success");

    let update = switch.recv().await;
    assert_eq!(update["action"], "command/update");
    assert_eq!(update["command"]["id"], command_id);
    assert_eq!(update["command"]["status"], "done");
}

#[tokio::test]
async fn test_closed_socket_releases_its_session() {
    let app = TestApp::new();
    app.create_device("lamp", None).await;
    let addr = app.spawn().await;

    let mut lamp = DeviceClient::connect(addr).await;
    lamp.authenticate("lamp").await;
    assert_eq!(app.request("GET", "/health", None).await.body["sessions"], 1);

    lamp.send_raw(Message::Close(None)).await;
    drop(lamp);

    let mut sessions = 1;
    for _ in 0..50 {
        sessions = app.request("GET", "/health", None).await.body["sessions"]
            .as_u64()
            .unwrap();
        if sessions == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(sessions, 0);
}
