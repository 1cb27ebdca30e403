use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of hazard a physical sensor detects.
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
pub enum SensorType {
    #[sea_orm(string_value = "Fire")]
    Fire,
    #[sea_orm(string_value = "Smoke")]
    Smoke,
    #[sea_orm(string_value = "Temperature")]
    Temperature,
}

impl SensorType {
    pub const ALLOWED: &'static str = "Fire, Smoke, Temperature";
}

/// Operational state of a physical sensor.
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
pub enum SensorStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Inactive")]
    Inactive,
    #[sea_orm(string_value = "Maintenance")]
    Maintenance,
}

impl SensorStatus {
    pub const ALLOWED: &'static str = "Active, Inactive, Maintenance";
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "physical_sensor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub sensor_id: i32,
    pub floor_id: i32,
    pub sensor_number: String,
    pub location: Option<String>,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub sensor_status: SensorStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::floor::Entity",
        from = "Column::FloorId",
        to = "super::floor::Column::FloorId"
    )]
    Floor,
    #[sea_orm(has_many = "super::virtual_sensor::Entity")]
    VirtualSensors,
}

impl Related<super::floor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floor.def()
    }
}

impl Related<super::virtual_sensor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VirtualSensors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sensor_enums_parse_their_wire_names_only() {
        assert_eq!(SensorType::from_str("Smoke").unwrap(), SensorType::Smoke);
        assert!(SensorType::from_str("Flood").is_err());
        assert_eq!(
            SensorStatus::from_str("Maintenance").unwrap(),
            SensorStatus::Maintenance
        );
        assert!(SensorStatus::from_str("Broken").is_err());
        assert_eq!(SensorType::Temperature.to_string(), "Temperature");
    }
}
