use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::entities::{images, shapes, shapes::Entity as Shapes};
use crate::errors::ApiError;
use crate::server::app::AppState;
use crate::server::handlers::{read_upload, require_extension};
use crate::server::payloads::{shape_full, ImageResponse, ShapeResponse, ShapeSimple};
use crate::services::ArchiveImportService;

#[derive(Deserialize)]
pub struct CreateShapeRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateImageRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base64_data: String,
}

pub async fn list_shapes(State(state): State<AppState>) -> Result<Json<Vec<ShapeSimple>>, ApiError> {
    let shapes = Shapes::find()
        .order_by_asc(shapes::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(shapes.into_iter().map(ShapeSimple::from).collect()))
}

pub async fn create_shape(
    State(state): State<AppState>,
    Json(payload): Json<CreateShapeRequest>,
) -> Result<(StatusCode, Json<ShapeResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Missing shape name"));
    }

    let shape = shapes::ActiveModel {
        name: Set(payload.name),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let response = shape_full(&state.db, shape).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_shape(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ShapeResponse>, ApiError> {
    let shape = Shapes::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("shape", id))?;

    Ok(Json(shape_full(&state.db, shape).await?))
}

pub async fn create_shape_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateImageRequest>,
) -> Result<(StatusCode, Json<ImageResponse>), ApiError> {
    if payload.name.trim().is_empty() || payload.base64_data.trim().is_empty() {
        return Err(ApiError::validation("Missing image name or base64_data"));
    }

    Shapes::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("shape", id))?;

    let image = images::ActiveModel {
        name: Set(payload.name),
        base64_data: Set(payload.base64_data),
        shape_id: Set(Some(id)),
        category_id: Set(None),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ImageResponse::from(image))))
}

pub async fn upload_zip(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let upload = read_upload(multipart).await?;
    require_extension(&upload.name, &["zip"])?;

    let service = ArchiveImportService::new(state.db.clone(), state.config.upload_dir.clone());
    let summary = service.import_shape_images(&upload.bytes).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "shapes_created": summary.taxonomies_created,
            "images_created": summary.images_created,
            "files_skipped": summary.files_skipped,
        })),
    ))
}
