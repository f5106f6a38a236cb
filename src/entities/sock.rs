use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// A sock stock-keeping unit. At most one row exists per
/// (color, cotton_percentage) pair; the unique index enforces it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "socks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub color: String,
    pub cotton_percentage: i32,
    pub amount: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
