//! Shared setup for the API tests: an app wired to a fresh in-memory
//! database and a throwaway upload directory, plus request helpers.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;
use tower::util::ServiceExt;

use quill::app::build_app;
use quill::config::{AppConfig, JwtConfig};
use quill::db;
use quill::state::AppState;
use quill::storage::{ImageStore, LocalImageStore};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    // Held so the upload directory lives as long as the test.
    pub uploads: TempDir,
}

pub async fn spawn_app() -> TestApp {
    // One connection only, so every query sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    db::init_schema(&pool).await.expect("create schema");

    let uploads = TempDir::new().expect("create upload dir");
    let config = Arc::new(AppConfig {
        database_url: "sqlite::memory:".into(),
        upload_dir: uploads.path().display().to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.into(),
            ttl_minutes: 60,
        },
    });
    let images: Arc<dyn ImageStore> = Arc::new(
        LocalImageStore::new(uploads.path())
            .await
            .expect("open image store"),
    );

    let state = AppState::from_parts(pool, config, images);
    let app = build_app(state.clone());
    TestApp {
        app,
        state,
        uploads,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("request should not fail at the transport level")
    }

    pub async fn register(&self, username: &str, password: &str) -> Response<Body> {
        let body = json!({ "username": username, "password": password });
        self.send(json_request(Method::POST, "/register", &body))
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Response<Body> {
        let body = json!({ "username": username, "password": password });
        self.send(json_request(Method::POST, "/login", &body)).await
    }

    /// Register a user and return a bearer token for them.
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let res = self.register(username, password).await;
        assert_eq!(res.status(), StatusCode::OK, "registration failed");
        let res = self.login(username, password).await;
        assert_eq!(res.status(), StatusCode::OK, "login failed");
        body_json(res).await["token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }

    /// Create a blog over the API and return its id.
    pub async fn create_blog(
        &self,
        token: &str,
        title: &str,
        description: &str,
        image: Option<(&str, &[u8])>,
    ) -> i64 {
        let mut form = MultipartForm::new()
            .text("title", title)
            .text("description", description);
        if let Some((filename, bytes)) = image {
            form = form.file("image", filename, "image/png", bytes);
        }
        let request = form.into_request(Method::POST, "/blog", Some(token));
        let res = self.send(request).await;
        assert_eq!(res.status(), StatusCode::OK, "blog creation failed");
        body_json(res).await["blogId"]
            .as_i64()
            .expect("creation response carries blogId")
    }

    /// All blogs as the unauthenticated list endpoint returns them.
    pub async fn list_blogs(&self) -> Vec<Value> {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/blogs")
            .body(Body::empty())
            .expect("request");
        let res = self.send(request).await;
        assert_eq!(res.status(), StatusCode::OK);
        body_json(res)
            .await
            .as_array()
            .expect("list endpoint returns an array")
            .clone()
    }
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn body_json(res: Response<Body>) -> Value {
    let bytes = res
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is json")
}

/// Hand-rolled multipart/form-data encoder; the boundary is fixed because
/// tests never embed it in field values.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "test-form-boundary-9f1c".into(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        self.body
            .extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        let mut builder = Request::builder().method(method).uri(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", self.boundary),
        );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(self.body)).expect("request")
    }
}
