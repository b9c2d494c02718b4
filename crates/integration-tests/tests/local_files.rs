//! Local image library, static image serving and the SMTP test endpoint.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use marom_integration_tests::TestContext;

#[tokio::test]
async fn test_images_lists_only_image_files() {
    let ctx = TestContext::new();
    let dir = ctx.images_dir();
    ctx.write_file(&dir.join("b.png"), b"png");
    ctx.write_file(&dir.join("a.JPG"), b"jpg");
    ctx.write_file(&dir.join("notes.txt"), b"text");
    std::fs::create_dir_all(dir.join("nested.png")).unwrap();

    let (status, body) = ctx.get_json("/api/images").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "filename": "a.JPG", "path": "/images/products/a.JPG" },
            { "filename": "b.png", "path": "/images/products/b.png" }
        ])
    );
}

#[tokio::test]
async fn test_images_without_directory_is_empty() {
    let ctx = TestContext::new();
    let (status, body) = ctx.get_json("/api/images").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_product_images_are_served() {
    let ctx = TestContext::new();
    ctx.write_file(&ctx.images_dir().join("serum.png"), b"not really a png");

    let request = Request::get("/images/products/serum.png")
        .body(Body::empty())
        .unwrap();
    let (status, _) = ctx.send(request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_smtp_test_requires_fields() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send_json("POST", "/api/test-smtp", &json!({ "host": "smtp.example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required SMTP configuration fields.");
}

#[tokio::test]
async fn test_smtp_test_reports_unreachable_server() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send_json(
            "POST",
            "/api/test-smtp",
            &json!({
                "host": "127.0.0.1",
                "port": "1",
                "user": "mailer",
                "pass": "secret",
                "fromEmail": "shop@example.com",
                "toEmail": "owner@example.com"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
