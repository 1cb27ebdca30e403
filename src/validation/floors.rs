//! Floor rules. A batch is all-or-nothing: one bad floor rejects the request.

use serde::Deserialize;

use super::{ConsistencyError, Numeric, Text};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FloorInput {
    pub building_id: Numeric,
    pub floor_number: Numeric,
    pub description: Text,
    pub num_sensors: Numeric,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFloor {
    pub building_id: i32,
    pub floor_number: i32,
    pub description: Option<String>,
    pub num_sensors: i32,
}

fn check_floor(item: FloorInput) -> Result<NewFloor, Vec<String>> {
    let mut errors = Vec::new();

    let building_id = item.building_id.positive_id();
    if building_id.is_none() {
        errors.push("building_id is required and must be a positive integer".to_string());
    }
    let floor_number = item.floor_number.whole();
    if floor_number.is_none() {
        errors.push("floor_number is required and must be an integer".to_string());
    }
    let num_sensors = if item.num_sensors.is_present() {
        item.num_sensors.non_negative()
    } else {
        Some(0)
    };
    if num_sensors.is_none() {
        errors.push("num_sensors must be a non-negative integer".to_string());
    }

    match (building_id, floor_number, num_sensors) {
        (Some(building_id), Some(floor_number), Some(num_sensors)) => Ok(NewFloor {
            building_id,
            floor_number,
            description: item.description.into_inner(),
            num_sensors,
        }),
        _ => Err(errors),
    }
}

pub fn validate_floor(item: FloorInput) -> Result<NewFloor, ConsistencyError> {
    check_floor(item).map_err(|errors| ConsistencyError::InvalidBatch {
        message: "Invalid floor data",
        errors,
    })
}

pub fn validate_floor_batch(items: Vec<FloorInput>) -> Result<Vec<NewFloor>, ConsistencyError> {
    if items.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "Floors array is required",
            errors: vec!["At least one floor is required".to_string()],
        });
    }

    let mut accepted = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (idx, item) in items.into_iter().enumerate() {
        match check_floor(item) {
            Ok(floor) => accepted.push(floor),
            Err(reasons) => errors.extend(
                reasons
                    .into_iter()
                    .map(|reason| format!("Floor {}: {}", idx + 1, reason)),
            ),
        }
    }

    if !errors.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "Invalid floor data",
            errors,
        });
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Vec<FloorInput> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn num_sensors_defaults_to_zero() {
        let floors = validate_floor_batch(parse(json!([
            {"building_id": "3", "floor_number": 0, "description": " Lobby "}
        ])))
        .unwrap();
        assert_eq!(
            floors,
            vec![NewFloor {
                building_id: 3,
                floor_number: 0,
                description: Some("Lobby".into()),
                num_sensors: 0,
            }]
        );
    }

    #[test]
    fn basement_floors_are_allowed() {
        let floors = validate_floor_batch(parse(json!([
            {"building_id": 1, "floor_number": -2}
        ])))
        .unwrap();
        assert_eq!(floors[0].floor_number, -2);
    }

    #[test]
    fn one_bad_floor_rejects_the_batch() {
        let err = validate_floor_batch(parse(json!([
            {"building_id": 1, "floor_number": 1},
            {"building_id": 1, "num_sensors": -4}
        ])))
        .unwrap_err();
        assert_matches!(err, ConsistencyError::InvalidBatch { ref errors, .. } if errors.len() == 2
            && errors[0] == "Floor 2: floor_number is required and must be an integer");
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_matches!(
            validate_floor_batch(vec![]),
            Err(ConsistencyError::InvalidBatch { .. })
        );
    }
}
