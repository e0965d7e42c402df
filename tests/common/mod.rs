#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chirpy::{
    ServerConfig, auth::TokenLifetimes, cli::Platform, create_app, db::Database,
    jwt::JwtConfig, metrics::HitCounter,
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const JWT_SECRET: &[u8] = b"test-jwt-secret-that-is-long-enough";

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub jwt: JwtConfig,
    pub hits: HitCounter,
}

/// Create a test app on the prod platform, serving the current directory.
pub async fn setup() -> TestApp {
    setup_with(Platform::Prod, PathBuf::from(".")).await
}

pub async fn setup_with(platform: Platform, filepath_root: PathBuf) -> TestApp {
    setup_with_lifetimes(platform, filepath_root, TokenLifetimes::default()).await
}

pub async fn setup_with_lifetimes(
    platform: Platform,
    filepath_root: PathBuf,
    lifetimes: TokenLifetimes,
) -> TestApp {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let hits = HitCounter::new();
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: JWT_SECRET.to_vec(),
        platform,
        filepath_root,
        lifetimes,
        hits: hits.clone(),
    };
    TestApp {
        app: create_app(&config),
        db,
        jwt: JwtConfig::new(JWT_SECRET),
        hits,
    }
}

/// Response status plus the body decoded as JSON (`Null` when empty or not JSON).
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub text: String,
    pub json: Value,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).into_owned();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        TestResponse {
            status,
            content_type,
            text,
            json,
        }
    }

    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> TestResponse {
        self.send(request("GET", uri, bearer, None)).await
    }

    pub async fn post(&self, uri: &str, bearer: Option<&str>, body: Option<Value>) -> TestResponse {
        self.send(request("POST", uri, bearer, body)).await
    }

    pub async fn put(&self, uri: &str, bearer: Option<&str>, body: Option<Value>) -> TestResponse {
        self.send(request("PUT", uri, bearer, body)).await
    }

    pub async fn delete(&self, uri: &str, bearer: Option<&str>) -> TestResponse {
        self.send(request("DELETE", uri, bearer, None)).await
    }

    /// Register a user and return the response JSON.
    pub async fn create_user(&self, email: &str, password: &str) -> Value {
        let response = self
            .post(
                "/api/users",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json
    }

    /// Log in and return the response JSON with `token` and `refresh_token`.
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self
            .post(
                "/api/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        response.json
    }

    /// Register and log in, returning (user_id, session token, refresh token).
    pub async fn signed_in_user(&self, email: &str, password: &str) -> (String, String, String) {
        self.create_user(email, password).await;
        let login = self.login(email, password).await;
        (
            login["id"].as_str().unwrap().to_string(),
            login["token"].as_str().unwrap().to_string(),
            login["refresh_token"].as_str().unwrap().to_string(),
        )
    }
}

pub fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
