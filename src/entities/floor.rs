use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A storey of a building. `num_sensors` is the planned sensor count, not a
/// live tally of `physical_sensor` rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "floor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub floor_id: i32,
    pub building_id: i32,
    pub floor_number: i32,
    pub description: Option<String>,
    pub num_sensors: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::building::Entity",
        from = "Column::BuildingId",
        to = "super::building::Column::BuildingId"
    )]
    Building,
    #[sea_orm(has_many = "super::physical_sensor::Entity")]
    PhysicalSensors,
    #[sea_orm(has_many = "super::virtual_sensor::Entity")]
    VirtualSensors,
    #[sea_orm(has_many = "super::exit_path::Entity")]
    ExitPaths,
    #[sea_orm(has_many = "super::qr_code::Entity")]
    QrCodes,
}

impl Related<super::building::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

impl Related<super::physical_sensor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhysicalSensors.def()
    }
}

impl Related<super::virtual_sensor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VirtualSensors.def()
    }
}

impl Related<super::exit_path::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExitPaths.def()
    }
}

impl Related<super::qr_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrCodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
