use crate::{
    db::DbPool,
    entities::{physical_sensor, virtual_sensor},
    errors::ServiceError,
    validation::{
        validate_virtual_sensor, validate_virtual_sensor_batch, ConsistencyError,
        NewVirtualSensor, VirtualSensorInput,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::require_reference;

/// Checks that the physical sensor exists and sits on the claimed floor.
/// `known` caches floors of sensors already looked up in this request.
async fn check_physical_floor<C: ConnectionTrait>(
    conn: &C,
    sensor: &NewVirtualSensor,
    known: &mut HashMap<i32, i32>,
) -> Result<(), ServiceError> {
    let expected = match known.get(&sensor.sensor_id) {
        Some(floor_id) => *floor_id,
        None => {
            let physical = require_reference::<physical_sensor::Entity, _>(
                conn,
                "Physical sensor",
                sensor.sensor_id,
            )
            .await?;
            known.insert(physical.sensor_id, physical.floor_id);
            physical.floor_id
        }
    };

    if expected != sensor.floor_id {
        return Err(ConsistencyError::FloorMismatch {
            sensor_id: sensor.sensor_id,
            expected,
            provided: sensor.floor_id,
        }
        .into());
    }
    Ok(())
}

fn active_model(sensor: NewVirtualSensor) -> virtual_sensor::ActiveModel {
    virtual_sensor::ActiveModel {
        sensor_id: Set(sensor.sensor_id),
        floor_id: Set(sensor.floor_id),
        virtual_sensor_number: Set(sensor.virtual_sensor_number),
        animation_status: Set(sensor.animation_status),
        ..Default::default()
    }
}

#[derive(Clone)]
pub struct VirtualSensorService {
    db_pool: Arc<DbPool>,
}

impl VirtualSensorService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        input: VirtualSensorInput,
    ) -> Result<virtual_sensor::Model, ServiceError> {
        let sensor = validate_virtual_sensor(input)?;
        check_physical_floor(&*self.db_pool, &sensor, &mut HashMap::new()).await?;

        let created = active_model(sensor).insert(&*self.db_pool).await?;
        info!(
            virtual_sensor_id = created.virtual_sensor_id,
            "Virtual sensor registered"
        );
        Ok(created)
    }

    /// All-or-nothing bulk registration
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn register_bulk(
        &self,
        items: Vec<VirtualSensorInput>,
    ) -> Result<Vec<virtual_sensor::Model>, ServiceError> {
        let sensors = validate_virtual_sensor_batch(items)?;

        let txn = self.db_pool.begin().await?;
        let mut known = HashMap::new();
        for sensor in &sensors {
            check_physical_floor(&txn, sensor, &mut known).await?;
        }

        let mut created = Vec::with_capacity(sensors.len());
        for sensor in sensors {
            created.push(active_model(sensor).insert(&txn).await?);
        }
        txn.commit().await?;

        info!(count = created.len(), "Virtual sensors registered");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<virtual_sensor::Model>, ServiceError> {
        let sensors = virtual_sensor::Entity::find()
            .order_by_asc(virtual_sensor::Column::VirtualSensorId)
            .all(&*self.db_pool)
            .await?;
        Ok(sensors)
    }

    #[instrument(skip(self))]
    pub async fn list_by_floor(
        &self,
        floor_id: i32,
    ) -> Result<Vec<virtual_sensor::Model>, ServiceError> {
        let sensors = virtual_sensor::Entity::find()
            .filter(virtual_sensor::Column::FloorId.eq(floor_id))
            .order_by_asc(virtual_sensor::Column::VirtualSensorId)
            .all(&*self.db_pool)
            .await?;
        Ok(sensors)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<virtual_sensor::Model, ServiceError> {
        virtual_sensor::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("virtual sensor", id))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<virtual_sensor::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;
        let existing = virtual_sensor::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("virtual sensor", id))?;
        virtual_sensor::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(virtual_sensor_id = id, "Virtual sensor deleted");
        Ok(existing)
    }
}
