//! Router-level test harness backed by [`MemoryStore`]

pub mod memory;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::auth::{generate_jwt, Claims, Role};
use crate::config::AppConfig;
use crate::database::models::{Alumni, User};
use crate::routes::app;
use crate::state::{AppState, Repositories};

pub use memory::MemoryStore;

pub const TEST_JWT_SECRET: &str = "test-secret-for-router-tests";
pub const TEST_PASSWORD: &str = "rahasia123";

/// Cheapest cost bcrypt accepts; keeps seeding fast
const TEST_BCRYPT_COST: u32 = 4;

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
    router: Router,
    _upload_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let upload_dir = tempfile::tempdir().unwrap();

        let mut config = AppConfig::development();
        config.security.jwt_secret = TEST_JWT_SECRET.to_string();
        config.api.upload_dir = upload_dir.path().to_path_buf();
        config.api.max_page_limit = 100;
        adjust(&mut config);

        let store = Arc::new(MemoryStore::new());
        let repos = Repositories {
            users: store.clone(),
            alumni: store.clone(),
            pekerjaan: store.clone(),
            pekerjaan_doc: store.clone(),
            files: store.clone(),
            health: store.clone(),
        };
        let router = app(AppState::new(config.clone(), repos));

        Self {
            store,
            config,
            router,
            _upload_dir: upload_dir,
        }
    }

    pub fn upload_root(&self) -> &std::path::Path {
        &self.config.api.upload_dir
    }

    /// Seed an account whose password is [`TEST_PASSWORD`]
    pub fn user(&self, username: &str, role: Role) -> User {
        let hash = bcrypt::hash(TEST_PASSWORD, TEST_BCRYPT_COST).unwrap();
        self.store
            .seed_user(username, &format!("{}@example.com", username), &hash, role)
    }

    /// Seed an ordinary user together with the alumni row it owns
    pub fn alumni_user(&self, username: &str, nim: &str) -> (User, Alumni) {
        let user = self.user(username, Role::User);
        let alumni = self.store.seed_alumni(user.id, nim, username);
        (user, alumni)
    }

    pub fn token_for(&self, user: &User) -> String {
        let role = user.role().unwrap();
        let claims = Claims::new(user.id, user.username.clone(), role, 1);
        generate_jwt(&claims, TEST_JWT_SECRET).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        self.send(request(Method::PUT, uri, token, body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::DELETE, uri, token, None)).await
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Hand-rolled multipart body; each part is `(name, Some((filename, content_type)), bytes)`
pub fn multipart_request(
    uri: &str,
    token: &str,
    parts: &[(&str, Option<(&str, &str)>, &[u8])],
) -> Request<Body> {
    const BOUNDARY: &str = "alumni-test-boundary";

    let mut body = Vec::new();
    for (name, file, bytes) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file {
            Some((filename, content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
            }
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}
