use crate::{
    db::DbPool,
    entities::building,
    errors::ServiceError,
    validation::{ConsistencyError, Numeric, Text},
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterBuildingRequest {
    pub building_name: Text,
    pub num_floors: Numeric,
    pub building_address: Text,
    pub building_city: Text,
    pub building_state: Text,
    pub building_country: Text,
}

fn validate_building(
    request: RegisterBuildingRequest,
) -> Result<building::ActiveModel, ServiceError> {
    let building_name = request
        .building_name
        .into_inner()
        .ok_or(ConsistencyError::MissingField("building_name"))?;

    let num_floors = match (request.num_floors.is_present(), request.num_floors.non_negative()) {
        (false, _) => None,
        (true, Some(n)) => Some(n),
        (true, None) => {
            return Err(ServiceError::ValidationError(
                "num_floors must be a non-negative integer".to_string(),
            ))
        }
    };

    Ok(building::ActiveModel {
        building_name: Set(building_name),
        num_floors: Set(num_floors),
        building_address: Set(request.building_address.into_inner()),
        building_city: Set(request.building_city.into_inner()),
        building_state: Set(request.building_state.into_inner()),
        building_country: Set(request.building_country.into_inner()),
        ..Default::default()
    })
}

#[derive(Clone)]
pub struct BuildingService {
    db_pool: Arc<DbPool>,
}

impl BuildingService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request))]
    pub async fn register(
        &self,
        request: RegisterBuildingRequest,
    ) -> Result<building::Model, ServiceError> {
        let created = validate_building(request)?
            .insert(&*self.db_pool)
            .await?;
        info!(building_id = created.building_id, "Building registered");
        Ok(created)
    }

    /// Lists all buildings, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<building::Model>, ServiceError> {
        let buildings = building::Entity::find()
            .order_by_desc(building::Column::BuildingId)
            .all(&*self.db_pool)
            .await?;
        Ok(buildings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> RegisterBuildingRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn name_is_required() {
        let err = validate_building(parse(json!({"num_floors": 3}))).unwrap_err();
        assert_matches!(
            err,
            ServiceError::Consistency(ConsistencyError::MissingField("building_name"))
        );
    }

    #[test]
    fn negative_floor_count_is_rejected() {
        let err = validate_building(parse(json!({"building_name": "A", "num_floors": -1})))
            .unwrap_err();
        assert_matches!(err, ServiceError::ValidationError(_));
    }

    #[test]
    fn floor_count_accepts_numeric_strings() {
        let model = validate_building(parse(json!({"building_name": "A", "num_floors": "2"})))
            .unwrap();
        assert_eq!(model.num_floors, Set(Some(2)));
    }
}
