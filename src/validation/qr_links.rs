use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::{ConsistencyError, Numeric};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinkRequest {
    pub qr_code_id: Numeric,
    pub path_ids: Option<Value>,
}

/// A link request reduced to distinct, positive ids in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTargets {
    pub qr_code_id: i32,
    pub path_ids: Vec<i32>,
}

pub fn normalize_link_request(request: &LinkRequest) -> Result<LinkTargets, ConsistencyError> {
    if !request.qr_code_id.is_present() {
        return Err(ConsistencyError::MissingField("qr_code_id"));
    }
    let qr_code_id = request
        .qr_code_id
        .positive_id()
        .ok_or(ConsistencyError::NonPositiveNumber("qr_code_id"))?;

    let raw_ids = match &request.path_ids {
        Some(Value::Array(values)) => values,
        _ => return Err(ConsistencyError::MissingField("path_ids")),
    };

    let mut seen = HashSet::new();
    let path_ids: Vec<i32> = raw_ids
        .iter()
        .cloned()
        .filter_map(|value| Numeric::from(value).positive_id())
        .filter(|id| seen.insert(*id))
        .collect();

    if path_ids.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "path_ids must contain at least one valid id",
            errors: vec![format!(
                "none of the {} submitted path ids is a positive integer",
                raw_ids.len()
            )],
        });
    }

    Ok(LinkTargets {
        qr_code_id,
        path_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn request(value: serde_json::Value) -> LinkRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn invalid_entries_are_dropped_and_duplicates_collapsed() {
        let targets = normalize_link_request(&request(json!({
            "qr_code_id": "5",
            "path_ids": [3, "abc", -1, 0, 3, "7", null, 2.5, 7]
        })))
        .unwrap();
        assert_eq!(targets.qr_code_id, 5);
        assert_eq!(targets.path_ids, vec![3, 7]);
    }

    #[test]
    fn all_invalid_ids_fail_the_count_check() {
        let err = normalize_link_request(&request(json!({
            "qr_code_id": 1,
            "path_ids": ["x", -4]
        })))
        .unwrap_err();
        assert_matches!(err, ConsistencyError::InvalidBatch { .. });
    }

    #[test]
    fn path_ids_must_be_an_array() {
        let err = normalize_link_request(&request(json!({"qr_code_id": 1, "path_ids": 4}))).unwrap_err();
        assert_eq!(err, ConsistencyError::MissingField("path_ids"));
    }

    #[test]
    fn qr_code_id_must_be_positive() {
        let err = normalize_link_request(&request(json!({"qr_code_id": 0, "path_ids": [1]}))).unwrap_err();
        assert_eq!(err, ConsistencyError::NonPositiveNumber("qr_code_id"));
    }
}
