use anyhow::{anyhow, Result};
use axum::routing::{get, post};
use axum::Router;
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;

use super::handlers::{coatings, health, materials, shapes, users};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
}

pub async fn create_app(db: DatabaseConnection, config: AppConfig) -> Result<Router> {
    let cors = match config.cors_origin.as_deref() {
        Some("*") | None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let state = AppState { db, config };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // User routes
        .route("/users", get(users::list_users).post(users::create_user))
        // Coating routes
        .route(
            "/coatings/categories",
            get(coatings::list_categories).post(coatings::create_category),
        )
        .route("/coatings/categories/:id", get(coatings::get_category))
        .route(
            "/coatings/categories/upload_zip",
            post(coatings::upload_categories_zip),
        )
        .route(
            "/coatings",
            get(coatings::list_coatings).post(coatings::create_coating),
        )
        .route("/coatings/:id", get(coatings::get_coating))
        .route("/coatings/upload_excel", post(coatings::upload_excel))
        // Shape routes
        .route("/shapes", get(shapes::list_shapes).post(shapes::create_shape))
        .route("/shapes/:id", get(shapes::get_shape))
        .route("/shapes/:id/images", post(shapes::create_shape_image))
        .route("/shapes/upload_zip", post(shapes::upload_zip))
        // Material routes
        .route(
            "/materials/categories",
            get(materials::list_categories).post(materials::create_category),
        )
        .route("/materials/categories/:id", get(materials::get_category))
        .route(
            "/materials",
            get(materials::list_materials).post(materials::create_material),
        )
        .route("/materials/:id", get(materials::get_material))
        .route("/materials/upload_zip", post(materials::upload_zip))
}
