// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the Telegram bot client using wiremock.

use std::time::Duration;

use atm_watch::transport::{TelegramClient, TelegramConfig};
use atm_watch::{DeliveryError, SignalKind, SubscriberId, Transport};
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123:test-token";

fn client_for(server: &MockServer) -> TelegramClient {
    TelegramConfig::new(TOKEN)
        .with_api_url(server.uri())
        .with_request_timeout(Duration::from_secs(2))
        .with_long_poll_timeout(Duration::ZERO)
        .with_retry_delay(Duration::from_millis(20))
        .into_client()
        .unwrap()
}

fn method_path(name: &str) -> String {
    format!("/bot{TOKEN}/{name}")
}

fn ok_message() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": {"message_id": 1, "date": 0, "chat": {"id": 42, "type": "private"}}
    }))
}

// ============================================================================
// Authentication
// ============================================================================

mod authenticate {
    use super::*;

    #[tokio::test]
    async fn returns_bot_account() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(method_path("getMe")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"id": 777, "is_bot": true, "first_name": "ATM", "username": "atm_bot"}
            })))
            .mount(&server)
            .await;

        let me = client_for(&server).authenticate().await.unwrap();
        assert_eq!(me.id, 777);
        assert_eq!(me.username.as_deref(), Some("atm_bot"));
    }

    #[tokio::test]
    async fn rejected_token_is_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(method_path("getMe")))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "ok": false,
                "error_code": 401,
                "description": "Unauthorized"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).authenticate().await.unwrap_err();
        assert!(matches!(err, DeliveryError::Unauthorized));
    }
}

// ============================================================================
// Delivery
// ============================================================================

mod deliver {
    use super::*;

    #[tokio::test]
    async fn sends_text_to_chat() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(method_path("sendMessage")))
            .and(body_partial_json(json!({"chat_id": 42, "text": "New ATM"})))
            .respond_with(ok_message())
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .deliver(SubscriberId::new(42), "New ATM")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_error_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(method_path("sendMessage")))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .deliver(SubscriberId::new(42), "hi")
            .await
            .unwrap_err();

        match err {
            DeliveryError::Rejected { code, description } => {
                assert_eq!(code, 403);
                assert!(description.contains("blocked"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_reply_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .deliver(SubscriberId::new(1), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Decode(_)));
    }
}

// ============================================================================
// Inbound updates
// ============================================================================

mod updates {
    use super::*;

    fn update(id: i64, chat: i64, username: &str, text: &str) -> serde_json::Value {
        json!({
            "update_id": id,
            "message": {
                "message_id": id * 10,
                "date": 0,
                "chat": {"id": chat, "type": "private"},
                "from": {"id": chat, "is_bot": false, "first_name": "x", "username": username},
                "text": text
            }
        })
    }

    async fn mount_idle_updates(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path(method_path("getUpdates")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "result": []}))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn commands_become_signals() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(method_path("getUpdates")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    update(1, 42, "alice", "/start"),
                    update(2, 7, "bob", "/help"),
                    update(3, 42, "alice", "/stop@atm_bot")
                ]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_idle_updates(&server).await;

        Mock::given(method("POST"))
            .and(path(method_path("sendMessage")))
            .respond_with(ok_message())
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (tx, mut rx) = mpsc::channel(8);
        tokio::spawn(async move { client.run_updates(tx).await });

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.subscriber, SubscriberId::new(42));
        assert_eq!(first.kind, SignalKind::Subscribe);
        assert_eq!(first.username.as_deref(), Some("alice"));

        let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.subscriber, SubscriberId::new(42));
        assert_eq!(second.kind, SignalKind::Unsubscribe);

        let replies: Vec<serde_json::Value> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path().ends_with("/sendMessage"))
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect();

        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["text"], "Added to the mailing list");
        assert_eq!(replies[0]["reply_to_message_id"], 10);
        assert_eq!(replies[1]["chat_id"], 7);
        assert_eq!(replies[1]["text"], "Unresolved command");
        assert_eq!(replies[2]["text"], "Removed from the mailing list");
    }

    #[tokio::test]
    async fn offset_advances_past_handled_updates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(method_path("getUpdates")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [update(41, 5, "carol", "/start")]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(method_path("getUpdates")))
            .and(body_partial_json(json!({"offset": 42})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [update(42, 6, "dave", "/start")]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_idle_updates(&server).await;

        Mock::given(method("POST"))
            .and(path(method_path("sendMessage")))
            .respond_with(ok_message())
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (tx, mut rx) = mpsc::channel(8);
        tokio::spawn(async move { client.run_updates(tx).await });

        let mut chats = Vec::new();
        for _ in 0..2 {
            let signal = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
            chats.push(signal.subscriber.value());
        }
        assert_eq!(chats, [5, 6]);
    }

    #[tokio::test]
    async fn polling_errors_are_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(method_path("getUpdates")))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .up_to_n_times(2)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(method_path("getUpdates")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [update(1, 9, "erin", "/start")]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_idle_updates(&server).await;

        Mock::given(method("POST"))
            .and(path(method_path("sendMessage")))
            .respond_with(ok_message())
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (tx, mut rx) = mpsc::channel(8);
        tokio::spawn(async move { client.run_updates(tx).await });

        let signal = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(signal.subscriber, SubscriberId::new(9));
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped_while_idle() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(method_path("getUpdates")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "result": []}))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move { client.run_updates(tx).await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(rx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("update loop kept polling after the receiver was dropped")
            .unwrap();
    }

    #[tokio::test]
    async fn end_command_unsubscribes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(method_path("getUpdates")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [update(1, 11, "frank", "/end")]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_idle_updates(&server).await;

        Mock::given(method("POST"))
            .and(path(method_path("sendMessage")))
            .and(body_partial_json(json!({"chat_id": 11, "text": "Removed from the mailing list"})))
            .respond_with(ok_message())
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (tx, mut rx) = mpsc::channel(8);
        tokio::spawn(async move { client.run_updates(tx).await });

        let signal = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(signal.subscriber, SubscriberId::new(11));
        assert_eq!(signal.kind, SignalKind::Unsubscribe);
    }
}
