use crate::{
    db::DbPool,
    entities::{floor, qr_code},
    errors::ServiceError,
    validation::{ConsistencyError, Numeric, Text},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::missing_ids;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QrCodeInput {
    pub floor_id: Numeric,
    pub qr_code_number: Text,
    pub installed_location: Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQrCode {
    pub floor_id: i32,
    pub qr_code_number: String,
    pub installed_location: Option<String>,
}

fn check_qr_code(item: QrCodeInput) -> Result<NewQrCode, Vec<String>> {
    let mut errors = Vec::new();

    let floor_id = item.floor_id.positive_id();
    if floor_id.is_none() {
        errors.push("floor_id is required and must be a positive integer".to_string());
    }
    if !item.qr_code_number.is_present() {
        errors.push("qr_code_number is required".to_string());
    }

    match (floor_id, item.qr_code_number.into_inner()) {
        (Some(floor_id), Some(qr_code_number)) => Ok(NewQrCode {
            floor_id,
            qr_code_number,
            installed_location: item.installed_location.into_inner(),
        }),
        _ => Err(errors),
    }
}

pub fn validate_qr_codes(items: Vec<QrCodeInput>) -> Result<Vec<NewQrCode>, ConsistencyError> {
    if items.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "QR codes array is required",
            errors: vec!["At least one QR code is required".to_string()],
        });
    }

    let mut accepted = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (idx, item) in items.into_iter().enumerate() {
        match check_qr_code(item) {
            Ok(qr) => accepted.push(qr),
            Err(reasons) => errors.extend(
                reasons
                    .into_iter()
                    .map(|reason| format!("QR code {}: {}", idx + 1, reason)),
            ),
        }
    }

    if !errors.is_empty() {
        return Err(ConsistencyError::InvalidBatch {
            message: "Invalid QR code data",
            errors,
        });
    }
    Ok(accepted)
}

#[derive(Clone)]
pub struct QrCodeService {
    db_pool: Arc<DbPool>,
}

impl QrCodeService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn register(&self, input: QrCodeInput) -> Result<qr_code::Model, ServiceError> {
        let qr = check_qr_code(input).map_err(|errors| ConsistencyError::InvalidBatch {
            message: "Invalid QR code data",
            errors,
        })?;
        let mut created = self.insert_all(vec![qr]).await?;
        created
            .pop()
            .ok_or_else(|| ServiceError::InternalError("QR code insert returned no row".into()))
    }

    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn register_many(
        &self,
        inputs: Vec<QrCodeInput>,
    ) -> Result<Vec<qr_code::Model>, ServiceError> {
        let codes = validate_qr_codes(inputs)?;
        self.insert_all(codes).await
    }

    async fn insert_all(&self, codes: Vec<NewQrCode>) -> Result<Vec<qr_code::Model>, ServiceError> {
        let floor_ids: Vec<i32> = codes.iter().map(|c| c.floor_id).collect();

        let txn = self.db_pool.begin().await?;

        let missing = missing_ids::<floor::Entity, _>(&txn, floor::Column::FloorId, &floor_ids).await?;
        if let Some(&id) = missing.first() {
            return Err(ConsistencyError::UnknownReference { entity: "Floor", id }.into());
        }

        let mut created = Vec::with_capacity(codes.len());
        for code in codes {
            let model = qr_code::ActiveModel {
                floor_id: Set(code.floor_id),
                qr_code_number: Set(code.qr_code_number),
                installed_location: Set(code.installed_location),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            created.push(model);
        }
        txn.commit().await?;

        info!(count = created.len(), "QR codes registered");
        Ok(created)
    }

    /// All QR codes, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<qr_code::Model>, ServiceError> {
        let codes = qr_code::Entity::find()
            .order_by_desc(qr_code::Column::QrCodeId)
            .all(&*self.db_pool)
            .await?;
        Ok(codes)
    }

    #[instrument(skip(self))]
    pub async fn list_by_floor(&self, floor_id: i32) -> Result<Vec<qr_code::Model>, ServiceError> {
        let codes = qr_code::Entity::find()
            .filter(qr_code::Column::FloorId.eq(floor_id))
            .order_by_desc(qr_code::Column::QrCodeId)
            .all(&*self.db_pool)
            .await?;
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn number_and_location_are_trimmed() {
        let items: Vec<QrCodeInput> = serde_json::from_value(json!([
            {"floor_id": "2", "qr_code_number": " QR-001 ", "installed_location": "   "},
            {"floor_id": 2, "qr_code_number": 1002, "installed_location": " Stairwell B "}
        ]))
        .unwrap();

        let codes = validate_qr_codes(items).unwrap();
        assert_eq!(codes[0].qr_code_number, "QR-001");
        assert_eq!(codes[0].installed_location, None);
        assert_eq!(codes[1].qr_code_number, "1002");
        assert_eq!(codes[1].installed_location.as_deref(), Some("Stairwell B"));
    }

    #[test]
    fn missing_number_rejects_batch() {
        let items: Vec<QrCodeInput> =
            serde_json::from_value(json!([{"floor_id": 1, "qr_code_number": "A"}, {"floor_id": 1}]))
                .unwrap();
        assert_matches!(
            validate_qr_codes(items),
            Err(ConsistencyError::InvalidBatch { ref errors, .. })
                if errors == &vec!["QR code 2: qr_code_number is required".to_string()]
        );
    }
}
