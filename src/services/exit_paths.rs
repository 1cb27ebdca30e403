use crate::{
    db::DbPool,
    entities::{exit_path, floor, linked_qr_path},
    errors::ServiceError,
    validation::{validate_exit_paths, ConsistencyError, ExitPathInput, NewExitPath},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::missing_ids;

/// Result of a bulk registration: what was stored and what was skipped.
#[derive(Debug, Clone)]
pub struct ExitPathRegistration {
    pub exit_paths: Vec<exit_path::Model>,
    pub errors: Vec<String>,
}

fn active_model(path: NewExitPath) -> exit_path::ActiveModel {
    exit_path::ActiveModel {
        floor_id: Set(path.floor_id),
        start_point: Set(path.start_point),
        end_point: Set(path.end_point),
        path_status: Set(path.path_status),
        path_length: Set(path.path_length),
        ..Default::default()
    }
}

#[derive(Clone)]
pub struct ExitPathService {
    db_pool: Arc<DbPool>,
}

impl ExitPathService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Stores the valid subset of `items` in one transaction. Invalid items,
    /// including those on unknown floors, come back as messages; the call
    /// only fails when nothing is left to insert.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn register(
        &self,
        items: Vec<ExitPathInput>,
    ) -> Result<ExitPathRegistration, ServiceError> {
        let mut batch = validate_exit_paths(items).map_err(|err| {
            warn!(error = %err, "Exit path batch rejected");
            err
        })?;

        let floor_ids: Vec<i32> = batch.valid.iter().map(|(_, p)| p.floor_id).collect();
        let missing =
            missing_ids::<floor::Entity, _>(&*self.db_pool, floor::Column::FloorId, &floor_ids)
                .await?;
        if !missing.is_empty() {
            let orphaned: Vec<(usize, i32)> = batch
                .valid
                .iter()
                .filter(|(_, p)| missing.contains(&p.floor_id))
                .map(|(position, p)| (*position, p.floor_id))
                .collect();
            for (position, id) in orphaned {
                batch.reject(
                    position,
                    ConsistencyError::UnknownReference { entity: "Floor", id },
                );
            }
        }
        if batch.valid.is_empty() {
            warn!(errors = batch.errors.len(), "No exit path references a known floor");
            return Err(ConsistencyError::NoValidExitPaths {
                errors: batch.errors,
            }
            .into());
        }

        let txn = self.db_pool.begin().await?;
        let mut exit_paths = Vec::with_capacity(batch.valid.len());
        for (_, path) in batch.valid {
            exit_paths.push(active_model(path).insert(&txn).await?);
        }
        txn.commit().await?;

        if !batch.errors.is_empty() {
            warn!(
                skipped = batch.errors.len(),
                "Some exit paths were not registered"
            );
        }
        info!(count = exit_paths.len(), "Exit paths registered");

        Ok(ExitPathRegistration {
            exit_paths,
            errors: batch.errors,
        })
    }

    /// All exit paths, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<exit_path::Model>, ServiceError> {
        let paths = exit_path::Entity::find()
            .order_by_desc(exit_path::Column::PathId)
            .all(&*self.db_pool)
            .await?;
        Ok(paths)
    }

    #[instrument(skip(self))]
    pub async fn list_by_floor(&self, floor_id: i32) -> Result<Vec<exit_path::Model>, ServiceError> {
        let paths = exit_path::Entity::find()
            .filter(exit_path::Column::FloorId.eq(floor_id))
            .order_by_desc(exit_path::Column::PathId)
            .all(&*self.db_pool)
            .await?;
        Ok(paths)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, path_id: i32) -> Result<exit_path::Model, ServiceError> {
        exit_path::Entity::find_by_id(path_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("exit path", path_id))
    }

    /// Deletes the path together with its QR links
    #[instrument(skip(self))]
    pub async fn delete(&self, path_id: i32) -> Result<exit_path::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let existing = exit_path::Entity::find_by_id(path_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("exit path", path_id))?;

        let unlinked = linked_qr_path::Entity::delete_many()
            .filter(linked_qr_path::Column::PathId.eq(path_id))
            .exec(&txn)
            .await?
            .rows_affected;
        exit_path::Entity::delete_by_id(path_id).exec(&txn).await?;
        txn.commit().await?;

        info!(path_id, unlinked, "Exit path deleted");
        Ok(existing)
    }
}
