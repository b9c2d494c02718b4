//! Writes against the hosted catalog: product API, editor forms and image buckets.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;

use marom_admin::db::storage::{self, IMAGES_BUCKET, UPLOADS_BUCKET};
use marom_admin::store::StoreError;
use marom_integration_tests::{MemoryStore, TestContext};

const BOUNDARY: &str = "marom-test-boundary";

/// One multipart part: `(name, file name, contents)`.
type Part<'a> = (&'a str, Option<&'a str>, &'a str);

fn multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file_name, contents) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(contents.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn form(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn raw(ctx: &TestContext, request: Request<Body>) -> Response {
    ctx.router().oneshot(request).await.unwrap()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION].to_str().unwrap().to_string()
}

fn seed_product(ctx: &TestContext) {
    ctx.store.seed(
        "products",
        vec![json!({
            "id": "p1",
            "name": "Moringa Oil",
            "slug": "moringa-oil",
            "price": 590,
            "category": "Skin",
            "description": "Keep me",
            "image": "/img.png",
            "benefits": ["Shine"],
            "ingredients": ["Moringa"],
            "ingredient_ids": ["i1"]
        })],
    );
}

fn seed_ingredient(ctx: &TestContext) {
    ctx.store.seed(
        "ingredients",
        vec![json!({
            "id": "i1",
            "name": "Moringa",
            "slug": "moringa",
            "description": "Cold pressed",
            "image": "/old.png",
            "benefits": ["Shine"]
        })],
    );
}

fn price(row: &Value) -> f64 {
    row["price"].as_f64().unwrap()
}

#[tokio::test]
async fn test_put_product_keeps_columns_not_sent() {
    let ctx = TestContext::new();
    seed_product(&ctx);

    let (status, body) = ctx
        .send_json("PUT", "/api/products", &json!({ "id": "p1", "name": "Oil", "price": 650 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["product"]["name"], "Oil");

    let row = &ctx.store.rows("products")[0];
    assert_eq!(row["name"], "Oil");
    assert!((price(row) - 650.0).abs() < f64::EPSILON);
    assert_eq!(row["category"], "Skin");
    assert_eq!(row["description"], "Keep me");
    assert_eq!(row["image"], "/img.png");
    assert_eq!(row["benefits"], json!(["Shine"]));
    assert_eq!(row["ingredient_ids"], json!(["i1"]));
}

#[tokio::test]
async fn test_put_product_requires_id() {
    let ctx = TestContext::new();
    seed_product(&ctx);

    for body in [json!({ "name": "Oil" }), json!({ "id": "", "name": "Oil" })] {
        let (status, response) = ctx.send_json("PUT", "/api/products", &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["error"], "Product ID is required");
    }
    assert_eq!(ctx.store.rows("products")[0]["name"], "Moringa Oil");
}

#[tokio::test]
async fn test_put_unknown_product_is_not_found() {
    let ctx = TestContext::new();
    seed_product(&ctx);

    let (status, _) = ctx
        .send_json("PUT", "/api/products", &json!({ "id": "p9", "name": "Oil" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ingredient_image_falls_back_to_images_bucket() {
    let store = MemoryStore::default();
    store.reject_uploads(UPLOADS_BUCKET);

    let url = storage::upload_ingredient_image(&store, "ingredients/moringa-1.png", vec![1, 2], "image/png")
        .await
        .unwrap();
    assert_eq!(
        url,
        "https://store.test/storage/v1/object/public/images/ingredients/moringa-1.png"
    );
    assert!(store.object_keys(UPLOADS_BUCKET).is_empty());
    assert_eq!(store.object_keys(IMAGES_BUCKET), vec!["ingredients/moringa-1.png"]);
}

#[tokio::test]
async fn test_ingredient_image_reports_uploads_error_when_both_fail() {
    let store = MemoryStore::default();
    store.reject_uploads(UPLOADS_BUCKET);
    store.reject_uploads(IMAGES_BUCKET);

    let err = storage::upload_ingredient_image(&store, "ingredients/moringa-1.png", vec![1], "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Api { .. }));
    assert_eq!(err.to_string(), "Bucket not found: uploads");
}

#[tokio::test]
async fn test_ingredient_form_saves_row_and_image() {
    let ctx = TestContext::new();
    seed_ingredient(&ctx);

    let request = multipart(
        "/ingredients/i1",
        &[
            ("name", None, "Moringa Leaf"),
            ("description", None, "Sun dried"),
            ("benefits", None, "Shine, Growth"),
            ("image", Some("leaf.PNG"), "fake-png"),
        ],
    );
    let response = raw(&ctx, request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/ingredients?success="));

    let keys = ctx.store.object_keys(UPLOADS_BUCKET);
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("ingredients/moringa-"));
    assert!(keys[0].ends_with(".png"));

    let row = &ctx.store.rows("ingredients")[0];
    assert_eq!(row["name"], "Moringa Leaf");
    assert_eq!(row["description"], "Sun dried");
    assert_eq!(row["benefits"], json!(["Shine", "Growth"]));
    assert_eq!(
        row["image"],
        format!("https://store.test/storage/v1/object/public/uploads/{}", keys[0])
    );
}

#[tokio::test]
async fn test_ingredient_form_without_image_keeps_current() {
    let ctx = TestContext::new();
    seed_ingredient(&ctx);

    let request = multipart(
        "/ingredients/i1",
        &[("name", None, "Moringa"), ("image", Some(""), "")],
    );
    let response = raw(&ctx, request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(ctx.store.rows("ingredients")[0]["image"], "/old.png");
    assert!(ctx.store.object_keys(UPLOADS_BUCKET).is_empty());
}

#[tokio::test]
async fn test_ingredient_form_with_blank_name_uploads_nothing() {
    let ctx = TestContext::new();
    seed_ingredient(&ctx);

    let request = multipart(
        "/ingredients/i1",
        &[("name", None, "  "), ("image", Some("leaf.png"), "fake-png")],
    );
    let response = raw(&ctx, request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/ingredients?error="));

    assert!(ctx.store.object_keys(UPLOADS_BUCKET).is_empty());
    assert!(ctx.store.object_keys(IMAGES_BUCKET).is_empty());
    assert_eq!(ctx.store.rows("ingredients")[0]["name"], "Moringa");
}

#[tokio::test]
async fn test_ingredient_form_reports_upload_failure() {
    let ctx = TestContext::new();
    seed_ingredient(&ctx);
    ctx.store.reject_uploads(UPLOADS_BUCKET);
    ctx.store.reject_uploads(IMAGES_BUCKET);

    let request = multipart(
        "/ingredients/i1",
        &[("name", None, "Moringa Leaf"), ("image", Some("leaf.png"), "fake-png")],
    );
    let response = raw(&ctx, request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = location(&response);
    assert!(location.starts_with("/ingredients?error=Upload+failed"), "{location}");
    assert_eq!(ctx.store.rows("ingredients")[0]["name"], "Moringa");
}

#[tokio::test]
async fn test_product_form_saves_linked_ingredients() {
    let ctx = TestContext::new();
    seed_product(&ctx);

    let request = form(
        "/products/p1",
        "name=Moringa+Oil&price=650.50&description=Cold+pressed&image=%2Fnew.png\
         &ingredients=Moringa%2C+Argan&benefits=Shine%2C+Strength\
         &ingredient_ids=i1&ingredient_ids=i2",
    );
    let response = raw(&ctx, request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/products?success="));

    let row = &ctx.store.rows("products")[0];
    assert_eq!(row["ingredient_ids"], json!(["i1", "i2"]));
    assert!((price(row) - 650.5).abs() < f64::EPSILON);
    assert_eq!(row["description"], "Cold pressed");
    assert_eq!(row["image"], "/new.png");
    assert_eq!(row["benefits"], json!(["Shine", "Strength"]));
    assert_eq!(row["category"], "Skin");
}

#[tokio::test]
async fn test_product_form_rejects_bad_price() {
    let ctx = TestContext::new();
    seed_product(&ctx);

    let response = raw(&ctx, form("/products/p1", "name=Moringa+Oil&price=abc")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/products/p1?error="));
    assert!((price(&ctx.store.rows("products")[0]) - 590.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_product_image_upload() {
    let ctx = TestContext::new();

    let request = multipart(
        "/api/storage/products",
        &[("file", Some("Rose Oil.PNG"), "fake-png")],
    );
    let (status, body) = ctx.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let name = body["name"].as_str().unwrap();
    assert!(name.ends_with("-rose-oil.png"), "{name}");
    assert_eq!(
        body["url"],
        format!("https://store.test/storage/v1/object/public/products/{name}")
    );
    assert_eq!(ctx.store.object_keys("products"), vec![name.to_string()]);

    let (_, listed) = ctx.get_json("/api/storage/products").await;
    assert_eq!(listed[0]["name"], name);
}

#[tokio::test]
async fn test_product_image_upload_errors() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(multipart("/api/storage/products", &[("other", None, "x")]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");

    ctx.store.reject_uploads("products");
    let (status, body) = ctx
        .send(multipart("/api/storage/products", &[("file", Some("a.png"), "x")]))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Upload failed: Bucket not found: products");
}

#[tokio::test]
async fn test_new_legal_documents_get_unique_ids() {
    let ctx = TestContext::new();

    for _ in 0..2 {
        let response = raw(&ctx, form("/legal/new", "title=Terms&slug=&content=%3Cp%3EText%3C%2Fp%3E")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let (_, documents) = ctx.get_json("/api/legal").await;
    let ids: Vec<&str> = documents
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["terms", "terms-2"]);
}
