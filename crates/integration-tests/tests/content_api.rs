//! File-backed CMS over the JSON API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use marom_integration_tests::TestContext;

fn post(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "excerpt": "Short summary",
        "content": "<p>Hello <strong>world</strong></p>",
        "image": "/images/blog/a.jpg",
        "date": "2026-01-15",
        "author": "Marom Team",
        "tags": ["skin", "care"]
    })
}

#[tokio::test]
async fn test_blog_put_then_get_returns_same_collection() {
    let ctx = TestContext::new();
    let posts = json!([post("1", "First Post"), post("2", "Second Post")]);

    let (status, body) = ctx.send_json("PUT", "/api/blog", &posts).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = ctx.get_json("/api/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, posts);

    let text = std::fs::read_to_string(ctx.data_dir().join("blog.ts")).unwrap();
    assert!(text.starts_with("export interface BlogPost {"));
    assert!(text.contains("export const blogPosts: BlogPost[] = ["));
    assert!(text.ends_with("];\n"));
}

#[tokio::test]
async fn test_missing_files_read_as_empty() {
    let ctx = TestContext::new();

    for uri in ["/api/blog", "/api/legal", "/api/ingredients"] {
        let (status, body) = ctx.get_json(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }

    let (status, body) = ctx.get_json("/api/socials").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["socialLinks"]["facebook"], "");
    assert_eq!(body["trustindexWidgetCode"], "");
}

#[tokio::test]
async fn test_write_empty_collection_then_read() {
    let ctx = TestContext::new();

    let (status, _) = ctx.send_json("PUT", "/api/legal", &json!([])).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx.get_json("/api/legal").await;
    assert_eq!(body, json!([]));
    assert!(ctx.data_dir().join("legal.ts").exists());
}

#[tokio::test]
async fn test_file_without_declaration_reads_as_empty() {
    let ctx = TestContext::new();
    ctx.write_file(
        &ctx.data_dir().join("blog.ts"),
        b"export interface BlogPost { id: string; }\n",
    );

    let (status, body) = ctx.get_json("/api/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_legal_uses_camel_case_last_updated() {
    let ctx = TestContext::new();
    let docs = json!([{
        "id": "privacy",
        "title": "Privacy Policy",
        "slug": "privacy-policy",
        "content": "<p>We respect your privacy.</p>",
        "lastUpdated": "2026-03-01"
    }]);

    let (status, _) = ctx.send_json("PUT", "/api/legal", &docs).await;
    assert_eq!(status, StatusCode::OK);

    let text = std::fs::read_to_string(ctx.data_dir().join("legal.ts")).unwrap();
    assert!(text.contains("\"lastUpdated\": \"2026-03-01\""));
    let (_, body) = ctx.get_json("/api/legal").await;
    assert_eq!(body, docs);
}

#[tokio::test]
async fn test_socials_round_trip() {
    let ctx = TestContext::new();
    let settings = json!({
        "socialLinks": {
            "facebook": "https://facebook.com/marom",
            "instagram": "https://instagram.com/marom",
            "tiktok": "",
            "youtube": "",
            "whatsapp": "+66 80 000 0000"
        },
        "trustindexWidgetCode": "<script src=\"https://cdn.trustindex.io/loader.js\"></script>"
    });

    let (status, _) = ctx.send_json("PUT", "/api/socials", &settings).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx.get_json("/api/socials").await;
    assert_eq!(body, settings);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send_json("PUT", "/api/blog", &json!({ "not": "an array" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(!ctx.data_dir().join("blog.ts").exists());
}

#[tokio::test]
async fn test_single_post_into_empty_blog_file() {
    let ctx = TestContext::new();
    ctx.write_file(
        &ctx.data_dir().join("blog.ts"),
        b"export const blogPosts: BlogPost[] = [];\n",
    );
    let posts = json!([{
        "id": "1",
        "title": "T",
        "slug": "t",
        "excerpt": "e",
        "content": "<p>c</p>",
        "image": "",
        "date": "2025-01-01",
        "author": "A",
        "tags": ["x"]
    }]);

    let (status, _) = ctx.send_json("PUT", "/api/blog", &posts).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx.get_json("/api/blog").await;
    assert_eq!(body, posts);
}
