use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "qr_code")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub qr_code_id: i32,
    pub floor_id: i32,
    pub qr_code_number: String,
    pub installed_location: Option<String>,
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
    PathLinks,
}

impl Related<super::floor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floor.def()
    }
}

impl Related<super::linked_qr_path::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PathLinks.def()
    }
}

impl Related<super::exit_path::Entity> for Entity {
    fn to() -> RelationDef {
        super::linked_qr_path::Relation::ExitPath.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::linked_qr_path::Relation::QrCode.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
