//! End-to-end tests for token issuance and the realtime connection lifecycle.

mod helpers;

use dispatch_core::types::{ActorKey, ActorRole};
use dispatch_realtime::{OutboundMessage, SocketResponse};
use tokio::sync::mpsc;

fn connect_reply(rx: &mut mpsc::Receiver<OutboundMessage>) -> SocketResponse {
    match rx.try_recv() {
        Ok(OutboundMessage::RecvConnect(response)) => response,
        other => panic!("expected connect reply, got {other:?}"),
    }
}

fn user(id: &str) -> ActorKey {
    ActorKey::new(ActorRole::User, id)
}

#[tokio::test]
async fn test_relogin_supersedes_token_and_connection() {
    let app = helpers::TestApp::new(true);
    let registry = app.gateway.registry();

    // First login and connect.
    let t1 = app.login("42").await;
    let (c1, mut rx1) = app.connect(&t1, "customer").await;
    let c1 = c1.expect("first connection accepted");
    assert!(connect_reply(&mut rx1).is_success());
    assert_eq!(registry.lookup(&user("42")).unwrap().id, c1);

    // Re-login elsewhere rotates the secret: the old token no longer connects.
    let t2 = app.login("42").await;
    let (rejected, mut rx_old) = app.connect(&t1, "customer").await;
    assert!(rejected.is_none());
    let reply = connect_reply(&mut rx_old);
    assert_eq!(reply.code, "401");
    assert_eq!(reply.msg.as_deref(), Some("token invalid signature error"));

    // The new token connects and displaces the first connection.
    let (c2, mut rx2) = app.connect(&t2, "customer").await;
    let c2 = c2.expect("second connection accepted");
    assert!(connect_reply(&mut rx2).is_success());
    assert!(matches!(rx1.try_recv(), Ok(OutboundMessage::Close { .. })));
    assert_eq!(registry.lookup(&user("42")).unwrap().id, c2);

    // The displaced transport reports its disconnect after the swap.
    app.gateway.on_disconnect(&c1, "transport close");
    assert_eq!(registry.lookup(&user("42")).unwrap().id, c2);
    assert_eq!(registry.connection_count(), 1);

    app.gateway.on_disconnect(&c2, "transport close");
    assert!(registry.lookup(&user("42")).is_none());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_stable_secret_keeps_tokens_but_not_connections() {
    let app = helpers::TestApp::new(false);
    app.credentials.insert("42", b"stored-password-hash".to_vec());

    let t1 = app.login("42").await;
    let t2 = app.login("42").await;

    // Both tokens stay valid.
    let (c1, mut rx1) = app.connect(&t1, "user").await;
    assert!(connect_reply(&mut rx1).is_success());
    let (c2, mut rx2) = app.connect(&t2, "user").await;
    assert!(connect_reply(&mut rx2).is_success());

    // Only one connection per actor is live.
    assert!(matches!(rx1.try_recv(), Ok(OutboundMessage::Close { .. })));
    let live = app.gateway.registry().lookup(&user("42")).unwrap();
    assert_eq!(Some(live.id), c2);
    assert_ne!(c1, c2);
}

#[tokio::test]
async fn test_notify_reaches_connected_actors_only() {
    let app = helpers::TestApp::new(true);

    let mut receivers = Vec::new();
    for id in ["1", "2"] {
        let token = app.login_as(ActorRole::Driver, id).await;
        let (_, mut rx) = app.connect(&token, "driver").await;
        connect_reply(&mut rx);
        receivers.push(rx);
    }

    let targets = [
        ActorKey::new(ActorRole::Driver, "1"),
        ActorKey::new(ActorRole::Driver, "2"),
        ActorKey::new(ActorRole::Driver, "3"),
        // Same id under another role is a different actor.
        ActorKey::new(ActorRole::Merchant, "1"),
    ];
    let message = OutboundMessage::notification("order_assigned", None);
    assert_eq!(app.gateway.notify(&targets, &message), 2);

    for mut rx in receivers {
        assert_eq!(rx.try_recv().unwrap(), message);
    }
}

#[tokio::test]
async fn test_missing_cache_rejects_with_internal_code() {
    let issuer = helpers::TestApp::new(true);
    let token = issuer.login("42").await;

    let app = helpers::TestApp::without_cache(true);
    let (conn, mut rx) = app.connect(&token, "user").await;
    assert!(conn.is_none());
    assert_eq!(connect_reply(&mut rx).code, "500");
    assert!(app.gateway.registry().is_empty());
}

#[tokio::test]
async fn test_token_cannot_connect_as_another_role() {
    let app = helpers::TestApp::new(true);
    let merchant_token = app.login_as(ActorRole::Merchant, "7").await;

    let (original, mut rx) = app.connect(&merchant_token, "merchant").await;
    let original = original.expect("merchant connection accepted");
    assert!(connect_reply(&mut rx).is_success());

    let (driver, mut rx_driver) = app.connect(&merchant_token, "driver").await;
    assert!(driver.is_none());
    let reply = connect_reply(&mut rx_driver);
    assert_eq!(reply.code, "401");
    assert_eq!(reply.msg.as_deref(), Some("invalid role"));

    let merchant = ActorKey::new(ActorRole::Merchant, "7");
    assert_eq!(app.gateway.registry().lookup(&merchant).unwrap().id, original);
    assert!(app.gateway.registry().lookup(&ActorKey::new(ActorRole::Driver, "7")).is_none());
    assert!(rx.try_recv().is_err());
}
