use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PathStatus {
    #[sea_orm(string_value = "Open")]
    Open,
    #[sea_orm(string_value = "Closed")]
    Closed,
}

impl PathStatus {
    pub const ALLOWED: &'static str = "Open, Closed";
}

/// An evacuation route segment on a floor. `path_length` is in meters.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exit_path")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub path_id: i32,
    pub floor_id: i32,
    pub start_point: String,
    pub end_point: String,
    pub path_status: PathStatus,
    #[sea_orm(column_type = "Double")]
    pub path_length: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::floor::Entity",
        from = "Column::FloorId",
        to = "super::floor::Column::FloorId"
    )]
    Floor,
    #[sea_orm(has_many = "super::linked_qr_path::Entity")]
    QrLinks,
}

impl Related<super::floor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floor.def()
    }
}

impl Related<super::linked_qr_path::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
