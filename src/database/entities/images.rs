use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Image bytes are persisted as base64 text; there is no external blob
/// storage. An image belongs to either a shape or a coating category,
/// so both foreign keys are nullable and exactly one is set in practice.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub base64_data: String,
    pub shape_id: Option<i32>,
    pub category_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shapes::Entity",
        from = "Column::ShapeId",
        to = "super::shapes::Column::Id"
    )]
    Shape,
    #[sea_orm(
        belongs_to = "super::coating_categories::Entity",
        from = "Column::CategoryId",
        to = "super::coating_categories::Column::Id"
    )]
    CoatingCategory,
}

impl Related<super::shapes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shape.def()
    }
}

impl Related<super::coating_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoatingCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
