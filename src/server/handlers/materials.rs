use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::entities::{
    material_categories, material_categories::Entity as MaterialCategories, materials,
    materials::Entity as Materials,
};
use crate::errors::ApiError;
use crate::server::app::AppState;
use crate::server::handlers::{read_upload, require_extension};
use crate::server::payloads::{
    material_category_full, MaterialCategoryResponse, MaterialCategorySimple, MaterialResponse,
};
use crate::services::ArchiveImportService;

#[derive(Deserialize)]
pub struct CreateMaterialCategoryRequest {
    #[serde(default)]
    pub name: String,
    pub is_rare_earth: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateMaterialRequest {
    #[serde(default)]
    pub grade: String,
    pub br_t: Option<i32>,
    pub hcb_ka_m: Option<i32>,
    pub bh_max_kj_m3: Option<i32>,
    pub category_id: Option<i32>,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<MaterialCategorySimple>>, ApiError> {
    let categories = MaterialCategories::find()
        .order_by_asc(material_categories::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(
        categories
            .into_iter()
            .map(MaterialCategorySimple::from)
            .collect(),
    ))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateMaterialCategoryRequest>,
) -> Result<(StatusCode, Json<MaterialCategoryResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Missing category name"));
    }
    let is_rare_earth = payload
        .is_rare_earth
        .ok_or_else(|| ApiError::validation("Missing is_rare_earth"))?;

    let category = material_categories::ActiveModel {
        name: Set(payload.name),
        is_rare_earth: Set(is_rare_earth),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let response = material_category_full(&state.db, category).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MaterialCategoryResponse>, ApiError> {
    let category = MaterialCategories::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("material category", id))?;

    Ok(Json(material_category_full(&state.db, category).await?))
}

pub async fn list_materials(
    State(state): State<AppState>,
) -> Result<Json<Vec<MaterialResponse>>, ApiError> {
    let materials = Materials::find()
        .order_by_asc(materials::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(
        materials.into_iter().map(MaterialResponse::from).collect(),
    ))
}

pub async fn create_material(
    State(state): State<AppState>,
    Json(payload): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<MaterialResponse>), ApiError> {
    if payload.grade.trim().is_empty() {
        return Err(ApiError::validation("Missing grade"));
    }
    let br_t = payload
        .br_t
        .ok_or_else(|| ApiError::validation("Missing br_t"))?;
    let hcb_ka_m = payload
        .hcb_ka_m
        .ok_or_else(|| ApiError::validation("Missing hcb_ka_m"))?;
    let bh_max_kj_m3 = payload
        .bh_max_kj_m3
        .ok_or_else(|| ApiError::validation("Missing bh_max_kj_m3"))?;
    let category_id = payload
        .category_id
        .ok_or_else(|| ApiError::validation("Missing category_id"))?;

    if MaterialCategories::find_by_id(category_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(ApiError::validation(format!(
            "material category {} does not exist",
            category_id
        )));
    }

    let material = materials::ActiveModel {
        grade: Set(payload.grade),
        br_t: Set(br_t),
        hcb_ka_m: Set(hcb_ka_m),
        bh_max_kj_m3: Set(bh_max_kj_m3),
        category_id: Set(category_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(MaterialResponse::from(material))))
}

pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MaterialResponse>, ApiError> {
    let material = Materials::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("material", id))?;

    Ok(Json(MaterialResponse::from(material)))
}

pub async fn upload_zip(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let upload = read_upload(multipart).await?;
    require_extension(&upload.name, &["zip"])?;

    let service = ArchiveImportService::new(state.db.clone(), state.config.upload_dir.clone());
    let summary = service.import_material_folders(&upload.bytes).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "categories_created": summary.categories_created,
            "materials_created": summary.materials_created,
            "rows_skipped": summary.rows_skipped,
            "files_skipped": summary.files_skipped,
        })),
    ))
}
