//! REST API integration tests for the catalog endpoints.

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use base64::Engine;
use magcat::config::AppConfig;
use magcat::database::connection::setup_database;
use magcat::server::app::create_app;
use sea_orm::Database;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Create a test server backed by a scratch sqlite database. The
/// returned TempDir owns the database file and upload scratch space and
/// must stay alive for the duration of the test.
async fn setup_test_server() -> Result<(TestServer, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("magcat-test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let config = AppConfig {
        port: 0,
        database_path: db_path.display().to_string(),
        upload_dir: temp_dir.path().join("uploads"),
        cors_origin: None,
    };

    let app = create_app(db, config).await?;
    let server = TestServer::new(app)?;

    Ok((server, temp_dir))
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _guard) = setup_test_server().await?;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "magcat");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_users_create_and_list() -> Result<()> {
    let (server, _guard) = setup_test_server().await?;

    let response = server
        .post("/api/users")
        .json(&json!({"username": "ada", "password": "hunter2"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let user: Value = response.json();
    assert!(user["id"].is_i64());
    assert_eq!(user["username"], "ada");
    // Password never appears in responses.
    assert!(user.get("password").is_none());

    let response = server.get("/api/users").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let users: Vec<Value> = response.json();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "ada");

    Ok(())
}

#[tokio::test]
async fn test_user_create_missing_field_persists_nothing() -> Result<()> {
    let (server, _guard) = setup_test_server().await?;

    let response = server
        .post("/api/users")
        .json(&json!({"username": "ada"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].is_string());

    let users: Vec<Value> = server.get("/api/users").await.json();
    assert!(users.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_coating_category_and_coating_crud() -> Result<()> {
    let (server, _guard) = setup_test_server().await?;

    let response = server
        .post("/api/coatings/categories")
        .json(&json!({"name": "Nickel"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let category: Value = response.json();
    let category_id = category["id"].as_i64().unwrap();
    assert_eq!(category["name"], "Nickel");
    assert_eq!(category["coatings"], json!([]));
    assert_eq!(category["images"], json!([]));

    let response = server
        .post("/api/coatings")
        .json(&json!({
            "sub_category": "Ni-Cu-Ni",
            "thickness": "15-21 um",
            "color": "silver",
            "category_id": category_id,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let coating: Value = response.json();
    let coating_id = coating["id"].as_i64().unwrap();
    // The parent name is resolved at serialization time.
    assert_eq!(coating["main_category"], "Nickel");
    assert_eq!(coating["sub_category"], "Ni-Cu-Ni");

    let fetched: Value = server
        .get(&format!("/api/coatings/{}", coating_id))
        .await
        .json();
    assert_eq!(fetched["main_category"], "Nickel");
    assert_eq!(fetched["thickness"], "15-21 um");

    // Full category serialization includes one level of children.
    let fetched: Value = server
        .get(&format!("/api/coatings/categories/{}", category_id))
        .await
        .json();
    assert_eq!(fetched["coatings"].as_array().unwrap().len(), 1);
    assert_eq!(fetched["coatings"][0]["sub_category"], "Ni-Cu-Ni");

    // Category listing uses the simple projection.
    let listed: Vec<Value> = server.get("/api/coatings/categories").await.json();
    assert_eq!(listed, vec![json!({"id": category_id, "name": "Nickel"})]);

    Ok(())
}

#[tokio::test]
async fn test_coating_create_rejects_unknown_category() -> Result<()> {
    let (server, _guard) = setup_test_server().await?;

    let response = server
        .post("/api/coatings")
        .json(&json!({
            "sub_category": "Zn",
            "thickness": "8 um",
            "color": "blue",
            "category_id": 42,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let coatings: Vec<Value> = server.get("/api/coatings").await.json();
    assert!(coatings.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_get_by_id_misses_return_not_found() -> Result<()> {
    let (server, _guard) = setup_test_server().await?;

    for path in [
        "/api/coatings/999",
        "/api/coatings/categories/999",
        "/api/shapes/999",
        "/api/materials/999",
        "/api/materials/categories/999",
    ] {
        let response = server.get(path).await;
        assert_eq!(
            response.status_code(),
            StatusCode::NOT_FOUND,
            "expected 404 for {}",
            path
        );
        let body: Value = response.json();
        assert!(body["error"].is_string(), "expected error body for {}", path);
    }

    Ok(())
}

#[tokio::test]
async fn test_shape_images_roundtrip() -> Result<()> {
    let (server, _guard) = setup_test_server().await?;

    let shape: Value = server
        .post("/api/shapes")
        .json(&json!({"name": "Ring"}))
        .await
        .json();
    let shape_id = shape["id"].as_i64().unwrap();

    let original = b"fake image bytes \x00\x01\x02";
    let encoded = base64::engine::general_purpose::STANDARD.encode(original);

    let response = server
        .post(&format!("/api/shapes/{}/images", shape_id))
        .json(&json!({"name": "ring.png", "base64_data": encoded}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let fetched: Value = server
        .get(&format!("/api/shapes/{}", shape_id))
        .await
        .json();
    let images = fetched["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);

    let stored = images[0]["base64_data"].as_str().unwrap();
    let decoded = base64::engine::general_purpose::STANDARD.decode(stored)?;
    assert_eq!(decoded, original);

    // Images under a missing shape are rejected before any insert.
    let response = server
        .post("/api/shapes/999/images")
        .json(&json!({"name": "x.png", "base64_data": encoded}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // Whitespace-only payload data counts as missing.
    let response = server
        .post(&format!("/api/shapes/{}/images", shape_id))
        .json(&json!({"name": "blank.png", "base64_data": "   "}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_material_categories_and_materials() -> Result<()> {
    let (server, _guard) = setup_test_server().await?;

    let category: Value = server
        .post("/api/materials/categories")
        .json(&json!({"name": "NdFeB", "is_rare_earth": true}))
        .await
        .json();
    let category_id = category["id"].as_i64().unwrap();
    assert_eq!(category["is_rare_earth"], true);

    let response = server
        .post("/api/materials")
        .json(&json!({
            "grade": "N35",
            "br_t": 1,
            "hcb_ka_m": 868,
            "bh_max_kj_m3": 263,
            "category_id": category_id,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let material: Value = response.json();
    assert_eq!(material["grade"], "N35");
    assert_eq!(material["hcb_ka_m"], 868);

    // Missing numeric field is a validation error, not a silent default.
    let response = server
        .post("/api/materials")
        .json(&json!({
            "grade": "N42",
            "br_t": 1,
            "hcb_ka_m": 868,
            "category_id": category_id,
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let materials: Vec<Value> = server.get("/api/materials").await.json();
    assert_eq!(materials.len(), 1);

    let listed: Vec<Value> = server.get("/api/materials/categories").await.json();
    assert_eq!(
        listed,
        vec![json!({"id": category_id, "name": "NdFeB", "is_rare_earth": true})]
    );

    let full: Value = server
        .get(&format!("/api/materials/categories/{}", category_id))
        .await
        .json();
    assert_eq!(full["materials"].as_array().unwrap().len(), 1);
    assert_eq!(full["materials"][0]["grade"], "N35");

    Ok(())
}
