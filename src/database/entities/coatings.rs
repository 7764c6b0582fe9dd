use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coatings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sub_category: String,
    pub thickness: String,
    pub color: String,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::coating_categories::Entity",
        from = "Column::CategoryId",
        to = "super::coating_categories::Column::Id"
    )]
    CoatingCategory,
}

impl Related<super::coating_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoatingCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
