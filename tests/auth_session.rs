use fleet_client::auth::{
    AuthState, ChangePasswordRequest, Credentials, MemoryStorage, RegisterRequest,
    ResetPasswordRequest, Route, RouteState, Session, SessionContext, SessionStorage, User,
    TOKEN_KEY, USER_KEY,
};
use fleet_client::config::ClientOptions;
use fleet_client::FleetClient;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    fleet: FleetClient,
    storage: Arc<MemoryStorage>,
    route: Arc<RouteState>,
}

fn fixture(base_url: &str, demo_accounts: bool) -> Fixture {
    let storage = Arc::new(MemoryStorage::new());
    let route = Arc::new(RouteState::new(Route::Dashboard));
    let session = SessionContext::new(storage.clone(), route.clone());
    let options = ClientOptions::default()
        .with_base_url(base_url)
        .with_request_timeout(Duration::from_secs(2))
        .with_demo_accounts(demo_accounts);
    let fleet = FleetClient::with_session(options, Arc::new(session)).unwrap();
    Fixture { fleet, storage, route }
}

fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

fn seed_session(storage: &MemoryStorage, token: &str) {
    storage.set(TOKEN_KEY, token).unwrap();
    storage
        .set(
            USER_KEY,
            &json!({"_id": "u-7", "email": "dispatch@fleet.com", "role": "user"}).to_string(),
        )
        .unwrap();
}

#[tokio::test]
async fn test_unauthorized_response_expires_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Token expired"
        })))
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    seed_session(&fx.storage, "stale-token");

    let result = fx.fleet.vehicles().get_all(&Default::default()).await;

    let err = result.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(fx.storage.get(USER_KEY).unwrap(), None);
    assert_eq!(fx.route.current(), Route::Login);
    assert_eq!(fx.fleet.auth().state(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_unauthorized_on_write_endpoint_expires_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/alerts/alt-9/acknowledge"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    seed_session(&fx.storage, "stale-token");

    let err = fx.fleet.alerts().acknowledge("alt-9").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(fx.route.current(), Route::Login);
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/drivers/drv-1"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": "drv-1", "firstName": "Maria"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    fx.storage.set(TOKEN_KEY, "abc123").unwrap();

    let response = fx.fleet.drivers().get_by_id("drv-1").await.unwrap();
    assert_eq!(response.data.unwrap()["firstName"], "Maria");
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles/stats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {}})),
        )
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    fx.fleet.vehicles().stats().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0]
        .headers
        .iter()
        .any(|(name, _)| name.as_str().eq_ignore_ascii_case("authorization")));
}

#[cfg(feature = "demo-accounts")]
#[tokio::test]
async fn test_demo_login_makes_no_request() {
    let mock_server = MockServer::start().await;
    let fx = fixture(&api_url(&mock_server), true);

    let result = fx
        .fleet
        .auth()
        .login(&Credentials::new("warehouse@fleet.com", "warehouse123"))
        .await;

    assert!(result.success);
    assert_eq!(result.user.unwrap().role, "warehouse");
    let token = fx.storage.get(TOKEN_KEY).unwrap().unwrap();
    assert!(token.starts_with("demo_token_warehouse_"));
    assert!(fx.storage.get(USER_KEY).unwrap().is_some());
    assert!(fx.fleet.auth().permissions().has_permission("approve_fuel"));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[cfg(feature = "demo-accounts")]
#[tokio::test]
async fn test_demo_email_with_wrong_password_fails_locally() {
    let mock_server = MockServer::start().await;
    let fx = fixture(&api_url(&mock_server), true);

    let result = fx
        .fleet
        .auth()
        .login(&Credentials::new("admin@fleet.com", "nope"))
        .await;

    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some("Invalid email or password"));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_demo_login_hits_server() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "token": "jwt-token",
                "user": {"_id": "u-1", "email": "ops@acme.com", "role": "admin", "firstName": "Ada"}
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), true);
    let result = fx
        .fleet
        .auth()
        .login(&Credentials::new("ops@acme.com", "hunter22"))
        .await;

    assert!(result.success);
    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("jwt-token"));
    let state = fx.fleet.auth().state();
    assert_eq!(state.user().and_then(|u| u.identifier()), Some("u-1"));

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"email": "ops@acme.com", "password": "hunter22"}));
}

#[tokio::test]
async fn test_failed_login_surfaces_server_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "Invalid credentials"
        })))
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    let result = fx
        .fleet
        .auth()
        .login(&Credentials::new("ops@acme.com", "wrong"))
        .await;

    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_logout_clears_state_when_server_fails() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    seed_session(&fx.storage, "live-token");

    fx.fleet.auth().logout().await;

    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(fx.storage.get(USER_KEY).unwrap(), None);
    assert_eq!(fx.fleet.auth().state(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_logout_clears_state_when_server_unreachable() {
    let fx = fixture("http://127.0.0.1:9/api", false);
    seed_session(&fx.storage, "live-token");

    fx.fleet.auth().logout().await;

    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(fx.fleet.auth().state(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_initialize_restores_valid_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("Authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"user": {"_id": "u-7", "email": "dispatch@fleet.com", "role": "user"}}
        })))
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    seed_session(&fx.storage, "live-token");
    assert_eq!(fx.fleet.auth().state(), AuthState::Unknown);

    let state = fx.fleet.auth().initialize().await;

    assert!(
        matches!(state, AuthState::Authenticated(ref user) if user.email == "dispatch@fleet.com")
    );
    assert!(fx.fleet.auth().is_authenticated());
    assert!(fx.fleet.auth().permissions().has_permission("log_fuel"));
}

#[tokio::test]
async fn test_initialize_clears_rejected_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    seed_session(&fx.storage, "live-token");

    let state = fx.fleet.auth().initialize().await;

    assert_eq!(state, AuthState::Anonymous);
    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(fx.storage.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_initialize_without_token_skips_network() {
    let mock_server = MockServer::start().await;
    let fx = fixture(&api_url(&mock_server), false);

    assert_eq!(fx.fleet.auth().initialize().await, AuthState::Anonymous);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "User registered",
            "data": {"user": {"_id": "u-9", "email": "new@acme.com", "role": "user"}}
        })))
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    let request: RegisterRequest = serde_json::from_value(json!({
        "firstName": "New",
        "lastName": "Hire",
        "email": "new@acme.com",
        "password": "secret123"
    }))
    .unwrap();
    let result = fx.fleet.auth().register(&request).await;

    assert!(result.success);
    assert_eq!(result.user.unwrap().email, "new@acme.com");
    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap(), None);
    assert!(!fx.fleet.auth().is_authenticated());
}

#[tokio::test]
async fn test_initialize_with_unauthorized_profile_check() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Token expired"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    seed_session(&fx.storage, "expired-token");

    let state = fx.fleet.auth().initialize().await;

    assert_eq!(state, AuthState::Anonymous);
    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(fx.storage.get(USER_KEY).unwrap(), None);
    assert_eq!(fx.route.current(), Route::Login);
}

#[cfg(feature = "demo-accounts")]
#[tokio::test]
async fn test_initialize_restores_demo_session_offline() {
    let mock_server = MockServer::start().await;
    let fx = fixture(&api_url(&mock_server), true);
    seed_session(&fx.storage, "demo_token_user_1700000000000");

    let state = fx.fleet.auth().initialize().await;

    assert!(
        matches!(state, AuthState::Authenticated(ref user) if user.email == "dispatch@fleet.com")
    );
    assert_eq!(
        fx.storage.get(TOKEN_KEY).unwrap().as_deref(),
        Some("demo_token_user_1700000000000")
    );
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_profile_replaces_user() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/profile"))
        .and(body_json(json!({"firstName": "Dana", "phone": "+1 555 0199"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Profile updated",
            "data": {"user": {"_id": "u-7", "email": "dispatch@fleet.com", "role": "user",
                              "firstName": "Dana", "phone": "+1 555 0199"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    let user: User = serde_json::from_value(
        json!({"_id": "u-7", "email": "dispatch@fleet.com", "role": "user", "firstName": "Dan"}),
    )
    .unwrap();
    fx.fleet
        .session()
        .establish(Session::new("live-token", user))
        .unwrap();

    let result = fx
        .fleet
        .auth()
        .update_profile(&json!({"firstName": "Dana", "phone": "+1 555 0199"}))
        .await;

    assert!(result.success);
    assert_eq!(result.message.as_deref(), Some("Profile updated"));
    let current = fx.fleet.auth().current_user().unwrap();
    assert_eq!(current.first_name.as_deref(), Some("Dana"));
    let persisted: Value =
        serde_json::from_str(&fx.storage.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted["firstName"], "Dana");
    assert_eq!(persisted["phone"], "+1 555 0199");
    assert_eq!(fx.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("live-token"));
}

#[tokio::test]
async fn test_password_endpoints_pass_payloads_through() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/change-password"))
        .and(body_json(json!({"currentPassword": "old-secret", "newPassword": "new-secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Password changed"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password"))
        .and(body_json(json!({"email": "ops@acme.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password"))
        .and(body_json(json!({"token": "reset-42", "password": "fresh-secret"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "Reset token expired"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fx = fixture(&api_url(&mock_server), false);
    let auth = fx.fleet.auth();

    let changed = auth
        .change_password(&ChangePasswordRequest {
            current_password: "old-secret".to_string(),
            new_password: "new-secret".to_string(),
        })
        .await;
    assert!(changed.success);
    assert_eq!(changed.message.as_deref(), Some("Password changed"));

    assert!(auth.forgot_password("ops@acme.com").await.success);

    let reset = auth
        .reset_password(&ResetPasswordRequest {
            token: "reset-42".to_string(),
            password: "fresh-secret".to_string(),
        })
        .await;
    assert!(!reset.success);
    assert_eq!(reset.message.as_deref(), Some("Reset token expired"));
}
