use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::entities::{
    coating_categories, coating_categories::Entity as CoatingCategories, coatings,
    coatings::Entity as Coatings,
};
use crate::errors::ApiError;
use crate::server::app::AppState;
use crate::server::handlers::{read_upload, require_extension};
use crate::server::payloads::{
    coating_category_full, coating_full, CoatingCategoryResponse, CoatingCategorySimple,
    CoatingResponse,
};
use crate::services::{ArchiveImportService, CoatingImportService};

#[derive(Deserialize)]
pub struct CreateCoatingCategoryRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateCoatingRequest {
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub thickness: String,
    #[serde(default)]
    pub color: String,
    pub category_id: Option<i32>,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CoatingCategorySimple>>, ApiError> {
    let categories = CoatingCategories::find()
        .order_by_asc(coating_categories::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(
        categories
            .into_iter()
            .map(CoatingCategorySimple::from)
            .collect(),
    ))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCoatingCategoryRequest>,
) -> Result<(StatusCode, Json<CoatingCategoryResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Missing category name"));
    }

    let category = coating_categories::ActiveModel {
        name: Set(payload.name),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let response = coating_category_full(&state.db, category).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CoatingCategoryResponse>, ApiError> {
    let category = CoatingCategories::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("coating category", id))?;

    Ok(Json(coating_category_full(&state.db, category).await?))
}

pub async fn list_coatings(
    State(state): State<AppState>,
) -> Result<Json<Vec<CoatingResponse>>, ApiError> {
    let coatings = Coatings::find()
        .order_by_asc(coatings::Column::Id)
        .all(&state.db)
        .await?;

    let mut serialized = Vec::with_capacity(coatings.len());
    for coating in coatings {
        serialized.push(coating_full(&state.db, coating).await?);
    }
    Ok(Json(serialized))
}

pub async fn create_coating(
    State(state): State<AppState>,
    Json(payload): Json<CreateCoatingRequest>,
) -> Result<(StatusCode, Json<CoatingResponse>), ApiError> {
    if payload.sub_category.trim().is_empty()
        || payload.thickness.trim().is_empty()
        || payload.color.trim().is_empty()
    {
        return Err(ApiError::validation(
            "Missing sub_category, thickness or color",
        ));
    }
    let category_id = payload
        .category_id
        .ok_or_else(|| ApiError::validation("Missing category_id"))?;

    // Reject unknown categories up front instead of surfacing a raw
    // foreign key violation.
    if CoatingCategories::find_by_id(category_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(ApiError::validation(format!(
            "coating category {} does not exist",
            category_id
        )));
    }

    let coating = coatings::ActiveModel {
        sub_category: Set(payload.sub_category),
        thickness: Set(payload.thickness),
        color: Set(payload.color),
        category_id: Set(category_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let response = coating_full(&state.db, coating).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_coating(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CoatingResponse>, ApiError> {
    let coating = Coatings::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("coating", id))?;

    Ok(Json(coating_full(&state.db, coating).await?))
}

pub async fn upload_excel(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let upload = read_upload(multipart).await?;
    require_extension(&upload.name, &["xlsx", "xls"])?;

    let service = CoatingImportService::new(state.db.clone());
    let summary = service.import_workbook(&upload.bytes).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "categories_created": summary.categories_created,
            "coatings_created": summary.coatings_created,
            "rows_skipped": summary.rows_skipped,
        })),
    ))
}

pub async fn upload_categories_zip(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let upload = read_upload(multipart).await?;
    require_extension(&upload.name, &["zip"])?;

    let service = ArchiveImportService::new(state.db.clone(), state.config.upload_dir.clone());
    let summary = service.import_coating_category_images(&upload.bytes).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "categories_created": summary.taxonomies_created,
            "images_created": summary.images_created,
            "files_skipped": summary.files_skipped,
        })),
    ))
}
