use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Magnetic grade attributes: remanence (Br), coercivity (HcB) and
/// maximum energy product (BH)max, in the units the column names carry.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub grade: String,
    pub br_t: i32,
    pub hcb_ka_m: i32,
    pub bh_max_kj_m3: i32,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material_categories::Entity",
        from = "Column::CategoryId",
        to = "super::material_categories::Column::Id"
    )]
    MaterialCategory,
}

impl Related<super::material_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
