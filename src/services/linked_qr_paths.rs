use crate::{
    db::DbPool,
    entities::{exit_path, linked_qr_path, qr_code},
    errors::ServiceError,
    validation::{normalize_link_request, ConsistencyError, LinkRequest},
};
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{missing_ids, require_reference};

/// Links created by one request. Pairs that already existed are not listed.
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub count: usize,
    pub links: Vec<linked_qr_path::Model>,
}

#[derive(Clone)]
pub struct LinkedQrPathService {
    db_pool: Arc<DbPool>,
}

impl LinkedQrPathService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Links a QR code to exit paths. Repeating a request is a no-op: only
    /// pairs not yet stored are inserted and counted.
    #[instrument(skip(self, request))]
    pub async fn link(&self, request: LinkRequest) -> Result<LinkOutcome, ServiceError> {
        let targets = normalize_link_request(&request)?;
        let qr_code_id = targets.qr_code_id;

        let txn = self.db_pool.begin().await?;

        require_reference::<qr_code::Entity, _>(&txn, "QR code", qr_code_id).await?;
        let missing =
            missing_ids::<exit_path::Entity, _>(&txn, exit_path::Column::PathId, &targets.path_ids)
                .await?;
        if let Some(&id) = missing.first() {
            return Err(ConsistencyError::UnknownReference {
                entity: "Exit path",
                id,
            }
            .into());
        }

        let already_linked: HashSet<i32> = linked_qr_path::Entity::find()
            .select_only()
            .column(linked_qr_path::Column::PathId)
            .filter(linked_qr_path::Column::QrCodeId.eq(qr_code_id))
            .filter(linked_qr_path::Column::PathId.is_in(targets.path_ids.clone()))
            .into_tuple::<i32>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        let mut inserted_ids = Vec::new();
        for path_id in targets
            .path_ids
            .iter()
            .copied()
            .filter(|id| !already_linked.contains(id))
        {
            let rows = linked_qr_path::Entity::insert(linked_qr_path::ActiveModel {
                qr_code_id: Set(qr_code_id),
                path_id: Set(path_id),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::columns([
                    linked_qr_path::Column::QrCodeId,
                    linked_qr_path::Column::PathId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
            if rows > 0 {
                inserted_ids.push(path_id);
            } else {
                debug!(qr_code_id, path_id, "Link created concurrently, skipped");
            }
        }

        let links = if inserted_ids.is_empty() {
            Vec::new()
        } else {
            linked_qr_path::Entity::find()
                .filter(linked_qr_path::Column::QrCodeId.eq(qr_code_id))
                .filter(linked_qr_path::Column::PathId.is_in(inserted_ids))
                .order_by_asc(linked_qr_path::Column::LinkId)
                .all(&txn)
                .await?
        };

        txn.commit().await?;

        info!(
            qr_code_id,
            requested = targets.path_ids.len(),
            created = links.len(),
            "QR code linked to exit paths"
        );
        Ok(LinkOutcome {
            count: links.len(),
            links,
        })
    }

    /// Exit paths reachable from a QR code, newest path first
    #[instrument(skip(self))]
    pub async fn paths_for_qr(&self, qr_code_id: i32) -> Result<Vec<exit_path::Model>, ServiceError> {
        let paths = exit_path::Entity::find()
            .join(JoinType::InnerJoin, exit_path::Relation::QrLinks.def())
            .filter(linked_qr_path::Column::QrCodeId.eq(qr_code_id))
            .order_by_desc(exit_path::Column::PathId)
            .all(&*self.db_pool)
            .await?;
        Ok(paths)
    }
}
