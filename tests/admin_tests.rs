mod common;

use axum::http::StatusCode;
use chirpy::cli::Platform;

#[tokio::test]
async fn test_healthz() {
    let ctx = common::setup().await;
    let response = ctx.get("/api/healthz", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "OK");
    assert!(response.content_type.unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_metrics_count_app_hits() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "<h1>Welcome to Chirpy</h1>").unwrap();
    let ctx = common::setup_with(Platform::Prod, root.path().to_path_buf()).await;

    let response = ctx.get("/admin/metrics", None).await;
    assert!(response.text.contains("Chirpy has been visited 0 times!"));

    let response = ctx.get("/app/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("Welcome to Chirpy"));

    // Misses are still visits
    let response = ctx.get("/app/missing.png", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // Nothing outside /app is counted
    ctx.get("/api/healthz", None).await;

    let response = ctx.get("/admin/metrics", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.unwrap().starts_with("text/html"));
    assert!(response.text.contains("Welcome, Chirpy Admin"));
    assert!(response.text.contains("Chirpy has been visited 2 times!"));
    assert_eq!(ctx.hits.get(), 2);
}

#[tokio::test]
async fn test_reset_forbidden_outside_dev() {
    let ctx = common::setup().await;
    ctx.create_user("alice@example.com", "banana123").await;
    ctx.hits.increment();

    let response = ctx.post("/admin/reset", None, None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    assert_eq!(ctx.hits.get(), 1);
    assert!(
        ctx.db
            .users()
            .get_by_email("alice@example.com")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_reset_in_dev_deletes_users_and_their_tokens() {
    let ctx = common::setup_with(Platform::Dev, ".".into()).await;
    let (_, token, refresh_token) = ctx.signed_in_user("alice@example.com", "banana123").await;
    let chirp = ctx
        .post(
            "/api/chirps",
            Some(&token),
            Some(serde_json::json!({ "body": "soon gone" })),
        )
        .await;
    ctx.hits.increment();

    let response = ctx.post("/admin/reset", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(ctx.hits.get(), 0);

    assert!(
        ctx.db
            .users()
            .get_by_email("alice@example.com")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        ctx.db
            .refresh_tokens()
            .get(&refresh_token)
            .await
            .unwrap()
            .is_none()
    );

    let uri = format!("/api/chirps/{}", chirp.json["id"].as_str().unwrap());
    assert_eq!(ctx.get(&uri, None).await.status, StatusCode::NOT_FOUND);

    // The old refresh token is now unknown
    let response = ctx.post("/api/refresh", Some(&refresh_token), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // The email can be registered again
    ctx.create_user("alice@example.com", "banana123").await;
}
