mod common;

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use services::{AuthError, AuthGate, FirebaseAuthGate, FirebaseConfig};

use common::stub;
use common::user;

fn session_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join(format!("reflect-firebase-{}", std::process::id()))
        .join(format!("{name}.json"));
    let _ = std::fs::remove_file(&path);
    path
}

fn gate(base_url: &str, session: &Path) -> FirebaseAuthGate {
    let config = FirebaseConfig {
        identity_url: base_url.to_string(),
        token_url: base_url.to_string(),
        ..FirebaseConfig::new("test-key").with_session_file(session)
    };
    FirebaseAuthGate::with_client(stub::client(), config)
}

fn write_session(path: &Path, refresh_token: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let stored = json!({
        "uid": "u1",
        "email": "me@example.com",
        "refresh_token": refresh_token,
    });
    std::fs::write(path, stored.to_string()).unwrap();
}

fn read_session(path: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn sign_in_saves_the_refresh_token() {
    let path = session_path("sign-in");
    let (base, server) = stub::serve_once(
        200,
        r#"{"localId": "u1", "email": "me@example.com", "idToken": "id", "refreshToken": "r1"}"#,
    )
    .await;
    let gate = gate(&base, &path);

    let signed_in = gate.sign_in("me@example.com", "secret").await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(signed_in.uid, user("u1"));
    assert!(
        captured
            .request_line
            .starts_with("POST /accounts:signInWithPassword?key=test-key ")
    );
    let saved = read_session(&path);
    assert_eq!(saved["uid"], "u1");
    assert_eq!(saved["email"], "me@example.com");
    assert_eq!(saved["refresh_token"], "r1");
}

#[tokio::test]
async fn restore_renews_the_saved_sign_in() {
    let path = session_path("restore");
    write_session(&path, "r1");
    let (base, server) = stub::serve_once(
        200,
        r#"{"user_id": "u1", "refresh_token": "r2", "id_token": "id", "expires_in": "3600"}"#,
    )
    .await;
    let gate = gate(&base, &path);
    let rx = gate.subscribe();

    let restored = gate.restore().await.unwrap().unwrap();
    let captured = server.await.unwrap();

    assert_eq!(restored.uid, user("u1"));
    assert_eq!(restored.email, "me@example.com");
    assert_eq!(rx.borrow().as_ref(), Some(&restored));
    assert!(captured.request_line.starts_with("POST /token?key=test-key "));
    assert!(
        captured
            .header("content-type")
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
    );
    assert!(captured.body.contains("grant_type=refresh_token"));
    assert!(captured.body.contains("refresh_token=r1"));
    assert_eq!(read_session(&path)["refresh_token"], "r2");
}

#[tokio::test]
async fn rejected_token_clears_the_saved_sign_in() {
    let path = session_path("revoked");
    write_session(&path, "stale");
    let (base, server) =
        stub::serve_once(400, r#"{"error": {"code": 400, "message": "TOKEN_EXPIRED"}}"#).await;
    let gate = gate(&base, &path);

    let err = gate.restore().await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, AuthError::Provider { .. }));
    assert_eq!(err.to_string(), "TOKEN_EXPIRED");
    assert!(!path.exists());
    assert!(gate.current_user().is_none());
}

#[tokio::test]
async fn token_for_another_user_is_refused() {
    let path = session_path("mismatch");
    write_session(&path, "r1");
    let (base, server) =
        stub::serve_once(200, r#"{"user_id": "someone-else", "refresh_token": "r2"}"#).await;
    let gate = gate(&base, &path);

    let err = gate.restore().await.unwrap_err();
    server.await.unwrap();

    assert_eq!(err.to_string(), "USER_MISMATCH");
    assert!(!path.exists());
    assert!(gate.current_user().is_none());
}

#[tokio::test]
async fn sign_out_forgets_the_saved_sign_in() {
    let path = session_path("sign-out");
    write_session(&path, "r1");
    let gate = gate("http://127.0.0.1:9", &path);

    gate.sign_out().await.unwrap();

    assert!(!path.exists());
    assert!(gate.current_user().is_none());
}

#[tokio::test]
async fn nothing_saved_restores_nobody() {
    let path = session_path("empty");
    let gate = gate("http://127.0.0.1:9", &path);

    assert!(gate.restore().await.unwrap().is_none());
    assert!(gate.current_user().is_none());
}

#[tokio::test]
async fn unreadable_session_is_discarded() {
    let path = session_path("garbage");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{not json").unwrap();
    let gate = gate("http://127.0.0.1:9", &path);

    let err = gate.restore().await.unwrap_err();

    assert!(matches!(err, AuthError::SessionDecode(_)));
    assert!(!path.exists());
}
