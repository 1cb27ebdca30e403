use crate::{
    db::DbPool,
    entities::{building, exit_path, floor, physical_sensor, qr_code, virtual_sensor},
    errors::ServiceError,
    validation::{validate_floor, validate_floor_batch, ConsistencyError, FloorInput, NewFloor},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::missing_ids;

fn active_model(new_floor: NewFloor) -> floor::ActiveModel {
    floor::ActiveModel {
        building_id: Set(new_floor.building_id),
        floor_number: Set(new_floor.floor_number),
        description: Set(new_floor.description),
        num_sensors: Set(new_floor.num_sensors),
        ..Default::default()
    }
}

#[derive(Clone)]
pub struct FloorService {
    db_pool: Arc<DbPool>,
}

impl FloorService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn register(&self, input: FloorInput) -> Result<floor::Model, ServiceError> {
        let mut created = self.register_many_validated(vec![validate_floor(input)?]).await?;
        created
            .pop()
            .ok_or_else(|| ServiceError::InternalError("floor insert returned no row".into()))
    }

    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn register_many(
        &self,
        inputs: Vec<FloorInput>,
    ) -> Result<Vec<floor::Model>, ServiceError> {
        let floors = validate_floor_batch(inputs)?;
        self.register_many_validated(floors).await
    }

    async fn register_many_validated(
        &self,
        floors: Vec<NewFloor>,
    ) -> Result<Vec<floor::Model>, ServiceError> {
        let building_ids: Vec<i32> = floors.iter().map(|f| f.building_id).collect();

        let txn = self.db_pool.begin().await?;

        let missing =
            missing_ids::<building::Entity, _>(&txn, building::Column::BuildingId, &building_ids)
                .await?;
        if let Some(&id) = missing.first() {
            warn!(building_id = id, "Floor registration references unknown building");
            return Err(ConsistencyError::UnknownReference {
                entity: "Building",
                id,
            }
            .into());
        }

        let mut created = Vec::with_capacity(floors.len());
        for new_floor in floors {
            created.push(active_model(new_floor).insert(&txn).await?);
        }

        txn.commit().await?;

        info!(count = created.len(), "Floors registered");
        Ok(created)
    }

    /// Lists all floors, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<floor::Model>, ServiceError> {
        let floors = floor::Entity::find()
            .order_by_desc(floor::Column::FloorId)
            .all(&*self.db_pool)
            .await?;
        Ok(floors)
    }

    /// Floors of one building in display order
    #[instrument(skip(self))]
    pub async fn list_by_building(&self, building_id: i32) -> Result<Vec<floor::Model>, ServiceError> {
        let floors = floor::Entity::find()
            .filter(floor::Column::BuildingId.eq(building_id))
            .order_by_asc(floor::Column::FloorNumber)
            .all(&*self.db_pool)
            .await?;
        Ok(floors)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, floor_id: i32) -> Result<floor::Model, ServiceError> {
        floor::Entity::find_by_id(floor_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("floor", floor_id))
    }

    /// Deletes a floor that nothing else hangs off.
    #[instrument(skip(self))]
    pub async fn delete(&self, floor_id: i32) -> Result<floor::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let existing = floor::Entity::find_by_id(floor_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("floor", floor_id))?;

        let dependents = existing
            .find_related(physical_sensor::Entity)
            .count(&txn)
            .await?
            + existing.find_related(virtual_sensor::Entity).count(&txn).await?
            + existing.find_related(exit_path::Entity).count(&txn).await?
            + existing.find_related(qr_code::Entity).count(&txn).await?;
        if dependents > 0 {
            return Err(ServiceError::Conflict(format!(
                "Floor {} has {} dependent records and cannot be deleted",
                floor_id, dependents
            )));
        }

        floor::Entity::delete_by_id(floor_id).exec(&txn).await?;
        txn.commit().await?;

        info!(floor_id, "Floor deleted");
        Ok(existing)
    }
}
