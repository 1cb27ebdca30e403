//! Fail-fast rules for sensor registration. Unlike exit paths, a single bad
//! sensor rejects the whole request.

use std::str::FromStr;

use serde::Deserialize;

use super::{ConsistencyError, Numeric, Text};
use crate::entities::{virtual_sensor::DEFAULT_ANIMATION_STATUS, SensorStatus, SensorType};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhysicalSensorInput {
    #[serde(rename = "floorId", alias = "floor_id")]
    pub floor_id: Numeric,
    pub sensor_number: Text,
    pub location: Text,
    #[serde(rename = "type", alias = "sensor_type")]
    pub sensor_type: Text,
    #[serde(rename = "sensorStatus", alias = "sensor_status")]
    pub sensor_status: Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhysicalSensor {
    pub floor_id: i32,
    pub sensor_number: String,
    pub location: Option<String>,
    pub sensor_type: SensorType,
    pub sensor_status: SensorStatus,
}

/// A validated bulk request: the envelope floor and the sensors placed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorBatch {
    pub floor_id: i32,
    pub sensors: Vec<NewPhysicalSensor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VirtualSensorInput {
    pub sensor_id: Numeric,
    pub floor_id: Numeric,
    pub virtual_sensor_number: Text,
    pub animation_status: Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVirtualSensor {
    pub sensor_id: i32,
    pub floor_id: i32,
    pub virtual_sensor_number: String,
    pub animation_status: String,
}

fn floor_id_of(value: &Numeric) -> Result<i32, ConsistencyError> {
    if !value.is_present() {
        return Err(ConsistencyError::MissingField("floorId"));
    }
    value
        .positive_id()
        .ok_or(ConsistencyError::NonPositiveNumber("floorId"))
}

fn check_physical(floor_id: i32, item: PhysicalSensorInput) -> Result<NewPhysicalSensor, Vec<String>> {
    let mut errors = Vec::new();

    if !item.sensor_number.is_present() {
        errors.push("sensor_number is required".to_string());
    }

    let sensor_type = match item.sensor_type.as_deref() {
        None => {
            errors.push("type is required".to_string());
            None
        }
        Some(raw) => SensorType::from_str(raw)
            .map_err(|_| errors.push(format!("type must be one of {}", SensorType::ALLOWED)))
            .ok(),
    };

    let sensor_status = match item.sensor_status.as_deref() {
        None => {
            errors.push("sensorStatus is required".to_string());
            None
        }
        Some(raw) => SensorStatus::from_str(raw)
            .map_err(|_| {
                errors.push(format!("sensorStatus must be one of {}", SensorStatus::ALLOWED))
            })
            .ok(),
    };

    match (item.sensor_number.into_inner(), sensor_type, sensor_status) {
        (Some(sensor_number), Some(sensor_type), Some(sensor_status)) if errors.is_empty() => {
            Ok(NewPhysicalSensor {
                floor_id,
                sensor_number,
                location: item.location.into_inner(),
                sensor_type,
                sensor_status,
            })
        }
        _ => Err(errors),
    }
}

/// Single-sensor registration: the floor comes from the sensor body itself.
pub fn validate_physical_sensor(item: PhysicalSensorInput) -> Result<NewPhysicalSensor, ConsistencyError> {
    let floor_id = floor_id_of(&item.floor_id)?;
    check_physical(floor_id, item).map_err(|errors| ConsistencyError::InvalidBatch {
        message: "Invalid sensor data",
        errors,
    })
}

/// Bulk registration: every item lands on the envelope's floor, whatever the
/// item itself says.
pub fn validate_sensor_batch(
    floor_id: &Numeric,
    items: Vec<PhysicalSensorInput>,
) -> Result<SensorBatch, ConsistencyError> {
    let floor_id = floor_id_of(floor_id)?;
    if items.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "Sensors array is required",
            errors: vec!["At least one sensor is required".to_string()],
        });
    }

    let mut accepted = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (idx, item) in items.into_iter().enumerate() {
        match check_physical(floor_id, item) {
            Ok(sensor) => accepted.push(sensor),
            Err(reasons) => errors.extend(
                reasons
                    .into_iter()
                    .map(|reason| format!("Sensor {}: {}", idx + 1, reason)),
            ),
        }
    }

    if !errors.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "Each sensor must have sensor_number, type, and sensorStatus",
            errors,
        });
    }
    Ok(SensorBatch {
        floor_id,
        sensors: accepted,
    })
}

fn check_virtual(item: VirtualSensorInput) -> Result<NewVirtualSensor, Vec<String>> {
    let mut errors = Vec::new();

    let sensor_id = item.sensor_id.positive_id();
    if sensor_id.is_none() {
        errors.push("sensor_id is required and must be a positive integer".to_string());
    }
    let floor_id = item.floor_id.positive_id();
    if floor_id.is_none() {
        errors.push("floor_id is required and must be a positive integer".to_string());
    }
    if !item.virtual_sensor_number.is_present() {
        errors.push("virtual_sensor_number is required".to_string());
    }

    match (sensor_id, floor_id, item.virtual_sensor_number.into_inner()) {
        (Some(sensor_id), Some(floor_id), Some(virtual_sensor_number)) => Ok(NewVirtualSensor {
            sensor_id,
            floor_id,
            virtual_sensor_number,
            animation_status: item
                .animation_status
                .into_inner()
                .unwrap_or_else(|| DEFAULT_ANIMATION_STATUS.to_string()),
        }),
        _ => Err(errors),
    }
}

pub fn validate_virtual_sensor(item: VirtualSensorInput) -> Result<NewVirtualSensor, ConsistencyError> {
    check_virtual(item).map_err(|errors| ConsistencyError::InvalidBatch {
        message: "sensor_id, floor_id, and virtual_sensor_number are required",
        errors,
    })
}

pub fn validate_virtual_sensor_batch(
    items: Vec<VirtualSensorInput>,
) -> Result<Vec<NewVirtualSensor>, ConsistencyError> {
    if items.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "Sensors array is required",
            errors: vec!["At least one virtual sensor is required".to_string()],
        });
    }

    let mut accepted = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (idx, item) in items.into_iter().enumerate() {
        match check_virtual(item) {
            Ok(sensor) => accepted.push(sensor),
            Err(reasons) => errors.extend(
                reasons
                    .into_iter()
                    .map(|reason| format!("Sensor {}: {}", idx + 1, reason)),
            ),
        }
    }

    if !errors.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "Invalid virtual sensor data",
            errors,
        });
    }
    Ok(accepted)
}
