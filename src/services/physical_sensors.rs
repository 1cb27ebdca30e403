use crate::{
    db::DbPool,
    entities::{floor, physical_sensor, virtual_sensor},
    errors::ServiceError,
    validation::{
        validate_physical_sensor, validate_sensor_batch, NewPhysicalSensor, Numeric,
        PhysicalSensorInput, SensorBatch,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::require_reference;

fn active_model(sensor: NewPhysicalSensor) -> physical_sensor::ActiveModel {
    physical_sensor::ActiveModel {
        floor_id: Set(sensor.floor_id),
        sensor_number: Set(sensor.sensor_number),
        location: Set(sensor.location),
        sensor_type: Set(sensor.sensor_type),
        sensor_status: Set(sensor.sensor_status),
        ..Default::default()
    }
}

async fn insert_all<C: ConnectionTrait>(
    conn: &C,
    sensors: Vec<NewPhysicalSensor>,
) -> Result<Vec<physical_sensor::Model>, ServiceError> {
    let mut created = Vec::with_capacity(sensors.len());
    for sensor in sensors {
        created.push(active_model(sensor).insert(conn).await?);
    }
    Ok(created)
}

#[derive(Clone)]
pub struct PhysicalSensorService {
    db_pool: Arc<DbPool>,
}

impl PhysicalSensorService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        input: PhysicalSensorInput,
    ) -> Result<physical_sensor::Model, ServiceError> {
        let sensor = validate_physical_sensor(input)?;
        require_reference::<floor::Entity, _>(&*self.db_pool, "Floor", sensor.floor_id).await?;

        let created = active_model(sensor).insert(&*self.db_pool).await?;
        info!(sensor_id = created.sensor_id, "Sensor registered");
        Ok(created)
    }

    /// Registers every sensor on the envelope floor, or none of them.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn register_bulk(
        &self,
        floor_id: Numeric,
        items: Vec<PhysicalSensorInput>,
    ) -> Result<Vec<physical_sensor::Model>, ServiceError> {
        let SensorBatch { floor_id, sensors } =
            validate_sensor_batch(&floor_id, items).map_err(|err| {
                warn!(error = %err, "Sensor batch rejected");
                err
            })?;

        let txn = self.db_pool.begin().await?;
        require_reference::<floor::Entity, _>(&txn, "Floor", floor_id).await?;
        let created = insert_all(&txn, sensors).await?;
        txn.commit().await?;

        info!(floor_id, count = created.len(), "Sensors registered");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<physical_sensor::Model>, ServiceError> {
        let sensors = physical_sensor::Entity::find()
            .order_by_asc(physical_sensor::Column::SensorId)
            .all(&*self.db_pool)
            .await?;
        Ok(sensors)
    }

    #[instrument(skip(self))]
    pub async fn list_by_floor(
        &self,
        floor_id: i32,
    ) -> Result<Vec<physical_sensor::Model>, ServiceError> {
        let sensors = physical_sensor::Entity::find()
            .filter(physical_sensor::Column::FloorId.eq(floor_id))
            .order_by_asc(physical_sensor::Column::SensorId)
            .all(&*self.db_pool)
            .await?;
        Ok(sensors)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, sensor_id: i32) -> Result<physical_sensor::Model, ServiceError> {
        physical_sensor::Entity::find_by_id(sensor_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("sensor", sensor_id))
    }

    /// Deletes a sensor unless virtual sensors still point at it
    #[instrument(skip(self))]
    pub async fn delete(&self, sensor_id: i32) -> Result<physical_sensor::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let existing = physical_sensor::Entity::find_by_id(sensor_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("sensor", sensor_id))?;

        let linked = existing
            .find_related(virtual_sensor::Entity)
            .count(&txn)
            .await?;
        if linked > 0 {
            return Err(ServiceError::Conflict(format!(
                "Sensor {} has {} virtual sensors and cannot be deleted",
                sensor_id, linked
            )));
        }

        physical_sensor::Entity::delete_by_id(sensor_id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(sensor_id, "Sensor deleted");
        Ok(existing)
    }
}
