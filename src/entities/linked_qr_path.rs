use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join row between a QR code and an exit path. The pair is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "linked_qr_path")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub link_id: i32,
    pub qr_code_id: i32,
    pub path_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::qr_code::Entity",
        from = "Column::QrCodeId",
        to = "super::qr_code::Column::QrCodeId"
    )]
    QrCode,
    #[sea_orm(
        belongs_to = "super::exit_path::Entity",
        from = "Column::PathId",
        to = "super::exit_path::Column::PathId"
    )]
    ExitPath,
}

impl Related<super::qr_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrCode.def()
    }
}

impl Related<super::exit_path::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExitPath.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
