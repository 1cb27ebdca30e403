pub mod buildings;
pub mod customers;
pub mod exit_paths;
pub mod floors;
pub mod linked_qr_paths;
pub mod physical_sensors;
pub mod qr_codes;
pub mod subscriptions;
pub mod virtual_sensors;

use std::collections::HashSet;

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PrimaryKeyTrait, QueryFilter, QuerySelect,
};

use crate::{errors::ServiceError, validation::ConsistencyError};

/// Loads a row that a write is about to reference. A missing row is a
/// validation failure, not a 404: the caller's payload is what is wrong.
pub(crate) async fn require_reference<E, C>(
    conn: &C,
    entity: &'static str,
    id: i32,
) -> Result<E::Model, ServiceError>
where
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ConsistencyError::UnknownReference { entity, id }.into())
}

/// Returns which of `ids` have no row in `E`, preserving input order.
pub(crate) async fn missing_ids<E, C>(
    conn: &C,
    id_column: E::Column,
    ids: &[i32],
) -> Result<Vec<i32>, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let mut distinct: Vec<i32> = Vec::with_capacity(ids.len());
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if seen.insert(*id) {
            distinct.push(*id);
        }
    }
    if distinct.is_empty() {
        return Ok(Vec::new());
    }

    let found: HashSet<i32> = E::find()
        .select_only()
        .column(id_column)
        .filter(id_column.is_in(distinct.clone()))
        .into_tuple::<i32>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    Ok(distinct
        .into_iter()
        .filter(|id| !found.contains(id))
        .collect())
}
