use std::str::FromStr;

use serde::Deserialize;

use super::{ConsistencyError, Numeric, Text};
use crate::entities::PathStatus;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExitPathInput {
    pub floor_id: Numeric,
    pub start_point: Text,
    pub end_point: Text,
    pub path_status: Text,
    pub path_length: Numeric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExitPath {
    pub floor_id: i32,
    pub start_point: String,
    pub end_point: String,
    pub path_status: PathStatus,
    pub path_length: f64,
}

/// Outcome of validating a batch: the insertable items keyed by their
/// 1-based position, plus the messages for the rejected ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExitPathBatch {
    pub valid: Vec<(usize, NewExitPath)>,
    pub errors: Vec<String>,
}

impl ExitPathBatch {
    /// Moves the item at `position` to the error list. Used once the floor
    /// lookup shows a referenced floor is missing.
    pub fn reject(&mut self, position: usize, reason: impl std::fmt::Display) {
        self.valid.retain(|(index, _)| *index != position);
        self.errors.push(format!("Path {}: {}", position, reason));
    }
}

fn check_item(position: usize, item: ExitPathInput, errors: &mut Vec<String>) -> Option<NewExitPath> {
    let before = errors.len();
    let mut reject = |reason: String| errors.push(format!("Path {}: {}", position, reason));

    let floor_id = match (item.floor_id.is_present(), item.floor_id.positive_id()) {
        (false, _) => {
            reject("floor_id is required and must be a number".into());
            None
        }
        (true, None) => {
            reject("floor_id must be a positive integer".into());
            None
        }
        (true, Some(id)) => Some(id),
    };

    if !item.start_point.is_present() {
        reject("start_point is required".into());
    }
    if !item.end_point.is_present() {
        reject("end_point is required".into());
    }

    let path_status = match item.path_status.as_deref() {
        None => {
            reject("path_status is required".into());
            None
        }
        Some(raw) => match PathStatus::from_str(raw) {
            Ok(status) => Some(status),
            Err(_) => {
                reject(format!("path_status must be one of {}", PathStatus::ALLOWED));
                None
            }
        },
    };

    let path_length = item.path_length.value().filter(|len| *len > 0.0);
    if path_length.is_none() {
        reject("path_length must be a positive number".into());
    }

    if errors.len() != before {
        return None;
    }

    Some(NewExitPath {
        floor_id: floor_id?,
        start_point: item.start_point.into_inner()?,
        end_point: item.end_point.into_inner()?,
        path_status: path_status?,
        path_length: path_length?,
    })
}

/// Validates each item independently. Fails only when nothing is insertable.
pub fn validate_exit_paths(items: Vec<ExitPathInput>) -> Result<ExitPathBatch, ConsistencyError> {
    if items.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "No exit paths provided",
            errors: vec!["At least one exit path is required".to_string()],
        });
    }

    let mut batch = ExitPathBatch::default();
    for (idx, item) in items.into_iter().enumerate() {
        let position = idx + 1;
        if let Some(path) = check_item(position, item, &mut batch.errors) {
            batch.valid.push((position, path));
        }
    }

    if batch.valid.is_empty() {
        return Err(ConsistencyError::NoValidExitPaths {
            errors: batch.errors,
        });
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Vec<ExitPathInput> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_batch_is_rejected_with_message() {
        let err = validate_exit_paths(vec![]).unwrap_err();
        assert_eq!(err.to_string(), "No exit paths provided");
        assert_matches!(err, ConsistencyError::InvalidBatch { ref errors, .. } if !errors.is_empty());
    }

    #[test]
    fn item_with_no_fields_reports_every_missing_field() {
        let err = validate_exit_paths(parse(json!([{}]))).unwrap_err();
        let errors = err.item_errors().unwrap();
        assert_eq!(
            errors,
            &[
                "Path 1: floor_id is required and must be a number".to_string(),
                "Path 1: start_point is required".to_string(),
                "Path 1: end_point is required".to_string(),
                "Path 1: path_status is required".to_string(),
                "Path 1: path_length must be a positive number".to_string(),
            ]
        );
    }

    #[test]
    fn mixed_batch_keeps_valid_items() {
        let batch = validate_exit_paths(parse(json!([
            {"floor_id": 1, "start_point": " A ", "end_point": "B", "path_status": "Open", "path_length": 12.5},
            {"floor_id": "1", "start_point": "C", "end_point": "D", "path_status": "Blocked", "path_length": 4}
        ])))
        .unwrap();

        assert_eq!(batch.valid.len(), 1);
        let (position, path) = &batch.valid[0];
        assert_eq!(*position, 1);
        assert_eq!(path.start_point, "A");
        assert_eq!(path.path_status, PathStatus::Open);
        assert_eq!(batch.errors, vec!["Path 2: path_status must be one of Open, Closed".to_string()]);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let batch = validate_exit_paths(parse(json!([
            {"floor_id": "3", "start_point": "Stair", "end_point": "Exit", "path_status": "Closed", "path_length": "7.25"}
        ])))
        .unwrap();
        assert_eq!(batch.valid[0].1.floor_id, 3);
        assert_eq!(batch.valid[0].1.path_length, 7.25);
    }

    #[test]
    fn non_positive_length_is_rejected() {
        let err = validate_exit_paths(parse(json!([
            {"floor_id": 1, "start_point": "A", "end_point": "B", "path_status": "Open", "path_length": 0}
        ])))
        .unwrap_err();
        assert_eq!(
            err.item_errors().unwrap(),
            &["Path 1: path_length must be a positive number".to_string()]
        );
    }

    #[test]
    fn reject_moves_item_to_errors() {
        let mut batch = validate_exit_paths(parse(json!([
            {"floor_id": 9, "start_point": "A", "end_point": "B", "path_status": "Open", "path_length": 1},
            {"floor_id": 1, "start_point": "A", "end_point": "B", "path_status": "Open", "path_length": 1}
        ])))
        .unwrap();
        batch.reject(1, "floor 9 does not exist");
        assert_eq!(batch.valid.len(), 1);
        assert_eq!(batch.valid[0].0, 2);
        assert_eq!(batch.errors, vec!["Path 1: floor 9 does not exist".to_string()]);
    }
}
