//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use sharelink_auth::JwtEncoder;
use sharelink_core::config::AppConfig;
use sharelink_database::{DatabasePool, UserRepository};
use sharelink_entity::user::CreateUser;

/// Contents of `docs/report.pdf` in the test tree.
pub const REPORT_BYTES: &[u8] = b"%PDF-1.4 quarterly report";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Storage root, removed on drop
    pub dir: TempDir,
    /// Bearer token for `alice`
    pub alice: String,
    /// Bearer token for `bob`
    pub bob: String,
    /// Bearer token for a deactivated user
    pub inactive: String,
}

impl TestApp {
    /// Create a new test application over a fresh storage tree and database.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("docs/sub")).unwrap();
        std::fs::create_dir_all(dir.path().join(".avatars")).unwrap();
        std::fs::write(dir.path().join("docs/report.pdf"), REPORT_BYTES).unwrap();
        std::fs::write(dir.path().join("docs/notes.txt"), b"notes").unwrap();
        std::fs::write(dir.path().join(".avatars/me.png"), b"png").unwrap();

        let mut config = AppConfig::default();
        config.storage.root_path = dir.path().to_string_lossy().to_string();
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let db = DatabasePool::in_memory()
            .await
            .expect("Failed to open test database");

        let users = UserRepository::new(db.pool().clone());
        let encoder = JwtEncoder::new(&config.auth);
        let mut tokens = Vec::new();
        for name in ["alice", "bob", "carol"] {
            let user = users
                .create(&CreateUser {
                    username: name.to_string(),
                    display_name: None,
                })
                .await
                .expect("Failed to create test user");
            let (token, _) = encoder
                .generate_access_token(user.id, &user.username)
                .expect("Failed to mint token");
            if name == "carol" {
                users.set_active(user.id, false).await.unwrap();
            }
            tokens.push(token);
        }
        let inactive = tokens.pop().unwrap();
        let bob = tokens.pop().unwrap();
        let alice = tokens.pop().unwrap();

        let state = sharelink_api::build_state(config, db)
            .await
            .expect("Failed to build app state");

        Self {
            router: sharelink_api::build_app(state),
            dir,
            alice,
            bob,
            inactive,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
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

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();

        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            bytes,
        }
    }

    /// Create a share as `alice` and return the response `data`.
    pub async fn create_share(&self, body: Value) -> Value {
        let response = self
            .request("POST", "/api/shares", Some(body), Some(&self.alice))
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Share creation failed: {:?}",
            response.body
        );
        response.body["data"].clone()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body (`Null` when not JSON)
    pub body: Value,
    /// Raw body bytes
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Machine-readable error code of an error response.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// A response header as a string.
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}
