use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ANIMATION_STATUS: &str = "Normal";

/// On-screen representation of a physical sensor. `floor_id` duplicates the
/// physical sensor's floor and is checked against it on every write.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "virtual_sensor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub virtual_sensor_id: i32,
    pub sensor_id: i32,
    pub floor_id: i32,
    pub virtual_sensor_number: String,
    pub animation_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::physical_sensor::Entity",
        from = "Column::SensorId",
        to = "super::physical_sensor::Column::SensorId"
    )]
    PhysicalSensor,
    #[sea_orm(
        belongs_to = "super::floor::Entity",
        from = "Column::FloorId",
        to = "super::floor::Column::FloorId"
    )]
    Floor,
}

impl Related<super::physical_sensor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhysicalSensor.def()
    }
}

impl Related<super::floor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
