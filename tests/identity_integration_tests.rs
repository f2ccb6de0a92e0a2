use himasif::identity::{
    GoogleDeviceIdentity, GoogleEndpoints, IdentityError, IdentityProvider, SignInPrompt,
};
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn identity_for(server: &MockServer) -> GoogleDeviceIdentity {
    GoogleDeviceIdentity::new(
        "client-123".to_string(),
        Some("secret-456".to_string()),
        GoogleEndpoints {
            oauth_base: server.uri(),
            userinfo_url: format!("{}/userinfo", server.uri()),
        },
    )
}

async fn mount_device_code(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/device/code"))
        .and(body_string_contains("client_id=client-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "dev-1",
            "user_code": "ABCD-EFGH",
            "verification_url": "https://www.google.com/device",
            "expires_in": 60,
            "interval": 0
        })))
        .mount(server)
        .await;
}

async fn mount_token_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("device_code=dev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-789",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

async fn mount_userinfo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("authorization", "Bearer tok-789"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Rina Putri",
            "picture": "https://example.com/rina.png",
            "email": "rina@example.com"
        })))
        .mount(server)
        .await;
}

fn oauth_error(code: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({ "error": code }))
}

// ============================================================================
// Device flow
// ============================================================================

#[tokio::test]
async fn test_sign_in_after_pending_poll() {
    let mock_server = MockServer::start().await;
    mount_device_code(&mock_server).await;

    // First poll is still pending, the next one succeeds
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(oauth_error("authorization_pending"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_token_success(&mock_server).await;
    mount_userinfo(&mock_server).await;

    let identity = identity_for(&mock_server);
    let (tx, mut rx) = mpsc::channel::<SignInPrompt>(4);
    let profile = identity.sign_in(tx).await.unwrap();

    assert_eq!(profile.display_name, "Rina Putri");
    assert_eq!(profile.email.as_deref(), Some("rina@example.com"));

    let prompt = rx.recv().await.expect("prompt sent before polling");
    assert_eq!(prompt.user_code, "ABCD-EFGH");
    assert_eq!(prompt.verification_url, "https://www.google.com/device");
}

#[tokio::test]
async fn test_access_denied_ends_sign_in() {
    let mock_server = MockServer::start().await;
    mount_device_code(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(oauth_error("access_denied"))
        .mount(&mock_server)
        .await;

    let identity = identity_for(&mock_server);
    let (tx, _rx) = mpsc::channel::<SignInPrompt>(4);
    let err = identity.sign_in(tx).await.unwrap_err();

    assert!(matches!(err, IdentityError::Denied(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_expired_token_ends_sign_in() {
    let mock_server = MockServer::start().await;
    mount_device_code(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(oauth_error("expired_token"))
        .mount(&mock_server)
        .await;

    let identity = identity_for(&mock_server);
    let (tx, _rx) = mpsc::channel::<SignInPrompt>(4);
    let err = identity.sign_in(tx).await.unwrap_err();

    assert!(matches!(err, IdentityError::Expired), "got {:?}", err);
}

#[tokio::test]
async fn test_device_code_rejection_maps_to_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/device/code"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&mock_server)
        .await;

    let identity = identity_for(&mock_server);
    let (tx, _rx) = mpsc::channel::<SignInPrompt>(4);
    let err = identity.sign_in(tx).await.unwrap_err();

    match err {
        IdentityError::Api { status, .. } => assert_eq!(status, 401),
        other => panic!("Expected Api error, got {:?}", other),
    }
}

// ============================================================================
// Sign-out
// ============================================================================

#[tokio::test]
async fn test_sign_out_revokes_token() {
    let mock_server = MockServer::start().await;
    mount_device_code(&mock_server).await;
    mount_token_success(&mock_server).await;
    mount_userinfo(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/revoke"))
        .and(body_string_contains("token=tok-789"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let identity = identity_for(&mock_server);
    let (tx, _rx) = mpsc::channel::<SignInPrompt>(4);
    identity.sign_in(tx).await.unwrap();

    identity.sign_out().await.unwrap();
    // The token is gone, a second sign-out has nothing to revoke
    identity.sign_out().await.unwrap();
}

#[tokio::test]
async fn test_sign_out_without_session_skips_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/revoke"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let identity = identity_for(&mock_server);
    identity.sign_out().await.unwrap();
}
