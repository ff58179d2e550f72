//! Shared fixtures for the router-level tests.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::{AppConfig, DatabaseConfig, ServerConfig, UploadConfig};
use crate::routes;
use crate::state::AppState;
use crate::store::{CharacterStore, MemoryCharacterStore, SqliteCharacterStore};
use crate::types::{CharacterFields, CharacterStatus};

pub const TEN_MIB: u64 = 10 * 1024 * 1024;
pub const BOUNDARY: &str = "heroes-test-boundary";

pub fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 8080, cors_permissive: true },
        database: DatabaseConfig {
            url: "memory:".to_string(),
            max_connections: 1,
            seed_on_empty: false,
        },
        uploads: UploadConfig { dir: upload_dir.to_path_buf(), max_file_bytes: TEN_MIB },
        security: None,
    }
}

/// A fully layered router over the in-memory store.
///
/// The returned `TempDir` owns the upload directory and must outlive the test.
pub fn memory_app() -> (Router, AppState, TempDir) {
    let store: Arc<dyn CharacterStore> = Arc::new(MemoryCharacterStore::new());
    app_with_store(store)
}

pub fn app_with_store(store: Arc<dyn CharacterStore>) -> (Router, AppState, TempDir) {
    let uploads = tempfile::tempdir().unwrap();
    let state = AppState::new(store, test_config(uploads.path()));
    (routes::router(state.clone()), state, uploads)
}

/// A SQLite-backed store on a fresh database file.
pub async fn sqlite_store() -> (Arc<SqliteCharacterStore>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("heroes.db").display());
    let pool = crate::db::connect(&url, 1).await.unwrap();
    crate::db::init_db(&pool).await.unwrap();
    (Arc::new(SqliteCharacterStore::new(pool)), dir)
}

pub fn fields(name: &str, affiliation: Option<&str>, status: CharacterStatus) -> CharacterFields {
    CharacterFields {
        name: name.to_string(),
        real_name: None,
        origin: None,
        universe: None,
        powers: None,
        affiliation: affiliation.map(str::to_string),
        first_appearance: None,
        status,
        description: None,
        image_url: None,
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body)
}

pub async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app, req).await;
    let value = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, value)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a `multipart/form-data` body with a single file part.
pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    multipart_parts(&[(field, filename, content_type, data)])
}

/// Builds a `multipart/form-data` body from `(field, filename, content type, data)` parts.
pub fn multipart_parts(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/uploads/image")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}
