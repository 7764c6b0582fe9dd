use sea_orm::{ConnectionTrait, EntityTrait, ModelTrait, QueryOrder};
use serde::Serialize;

use crate::database::entities::{
    coating_categories, coatings, images, material_categories, materials, shapes, users,
};
use crate::errors::ApiError;

// Fixed response projections. Each entity has a "full" shape (all scalar
// fields plus one level of serialized children) and, for taxonomy
// entities, a "simple" shape with identifying fields only.

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: i32,
    pub base64_data: String,
}

impl From<images::Model> for ImageResponse {
    fn from(image: images::Model) -> Self {
        Self {
            id: image.id,
            base64_data: image.base64_data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CoatingCategorySimple {
    pub id: i32,
    pub name: String,
}

impl From<coating_categories::Model> for CoatingCategorySimple {
    fn from(category: coating_categories::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShapeSimple {
    pub id: i32,
    pub name: String,
}

impl From<shapes::Model> for ShapeSimple {
    fn from(shape: shapes::Model) -> Self {
        Self {
            id: shape.id,
            name: shape.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MaterialCategorySimple {
    pub id: i32,
    pub name: String,
    pub is_rare_earth: bool,
}

impl From<material_categories::Model> for MaterialCategorySimple {
    fn from(category: material_categories::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
            is_rare_earth: category.is_rare_earth,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MaterialResponse {
    pub id: i32,
    pub grade: String,
    pub br_t: i32,
    pub hcb_ka_m: i32,
    pub bh_max_kj_m3: i32,
}

impl From<materials::Model> for MaterialResponse {
    fn from(material: materials::Model) -> Self {
        Self {
            id: material.id,
            grade: material.grade,
            br_t: material.br_t,
            hcb_ka_m: material.hcb_ka_m,
            bh_max_kj_m3: material.bh_max_kj_m3,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CoatingResponse {
    pub id: i32,
    pub main_category: String,
    pub sub_category: String,
    pub thickness: String,
    pub color: String,
}

/// The parent category name is resolved with a fresh lookup on every
/// serialization rather than cached on the row.
pub async fn coating_full<C: ConnectionTrait>(
    db: &C,
    coating: coatings::Model,
) -> Result<CoatingResponse, ApiError> {
    let category = coating_categories::Entity::find_by_id(coating.category_id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("coating category", coating.category_id))?;

    Ok(CoatingResponse {
        id: coating.id,
        main_category: category.name,
        sub_category: coating.sub_category,
        thickness: coating.thickness,
        color: coating.color,
    })
}

#[derive(Debug, Serialize)]
pub struct CoatingCategoryResponse {
    pub id: i32,
    pub name: String,
    pub coatings: Vec<CoatingResponse>,
    pub images: Vec<ImageResponse>,
}

pub async fn coating_category_full<C: ConnectionTrait>(
    db: &C,
    category: coating_categories::Model,
) -> Result<CoatingCategoryResponse, ApiError> {
    let owned = category
        .find_related(coatings::Entity)
        .order_by_asc(coatings::Column::Id)
        .all(db)
        .await?;
    let mut serialized = Vec::with_capacity(owned.len());
    for coating in owned {
        serialized.push(coating_full(db, coating).await?);
    }

    let images = category
        .find_related(images::Entity)
        .order_by_asc(images::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(ImageResponse::from)
        .collect();

    Ok(CoatingCategoryResponse {
        id: category.id,
        name: category.name,
        coatings: serialized,
        images,
    })
}

#[derive(Debug, Serialize)]
pub struct ShapeResponse {
    pub id: i32,
    pub name: String,
    pub images: Vec<ImageResponse>,
}

pub async fn shape_full<C: ConnectionTrait>(
    db: &C,
    shape: shapes::Model,
) -> Result<ShapeResponse, ApiError> {
    let images = shape
        .find_related(images::Entity)
        .order_by_asc(images::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(ImageResponse::from)
        .collect();

    Ok(ShapeResponse {
        id: shape.id,
        name: shape.name,
        images,
    })
}

#[derive(Debug, Serialize)]
pub struct MaterialCategoryResponse {
    pub id: i32,
    pub name: String,
    pub is_rare_earth: bool,
    pub materials: Vec<MaterialResponse>,
}

pub async fn material_category_full<C: ConnectionTrait>(
    db: &C,
    category: material_categories::Model,
) -> Result<MaterialCategoryResponse, ApiError> {
    let materials = category
        .find_related(materials::Entity)
        .order_by_asc(materials::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(MaterialResponse::from)
        .collect();

    Ok(MaterialCategoryResponse {
        id: category.id,
        name: category.name,
        is_rare_earth: category.is_rare_earth,
        materials,
    })
}
