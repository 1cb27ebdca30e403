use crate::{
    config::SubscriptionUniqueness,
    db::DbPool,
    entities::{
        building, customer,
        customer_building::{self, RelationView},
        SubscriptionStatus,
    },
    errors::ServiceError,
    validation::{validate_subscription, ConsistencyError, SubscriptionInput, ValidSubscription},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Customer/building subscriptions
#[derive(Clone)]
pub struct SubscriptionService {
    db_pool: Arc<DbPool>,
    uniqueness: SubscriptionUniqueness,
}

/// Relations joined with customer and building names.
fn with_names() -> Select<customer_building::Entity> {
    customer_building::Entity::find()
        .column_as(customer::Column::CustomerName, "customer_name")
        .column_as(building::Column::BuildingName, "building_name")
        .join(
            JoinType::LeftJoin,
            customer_building::Relation::Customer.def(),
        )
        .join(
            JoinType::LeftJoin,
            customer_building::Relation::Building.def(),
        )
}

impl SubscriptionService {
    pub fn new(db_pool: Arc<DbPool>, uniqueness: SubscriptionUniqueness) -> Self {
        Self {
            db_pool,
            uniqueness,
        }
    }

    /// Registers a subscription after the field rules, parent lookups and the
    /// duplicate policy all pass. The duplicate check and the insert share one
    /// transaction with the customer row locked, so two concurrent requests
    /// for the same pair cannot both pass the check.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: SubscriptionInput) -> Result<RelationView, ServiceError> {
        let valid = validate_subscription(&input)?;

        let txn = self.db_pool.begin().await?;

        let mut customer_query = customer::Entity::find_by_id(valid.customer_id);
        if txn.get_database_backend() == DbBackend::Postgres {
            customer_query = customer_query.lock_exclusive();
        }
        let customer = customer_query
            .one(&txn)
            .await?
            .ok_or(ConsistencyError::UnknownReference {
                entity: "Customer",
                id: valid.customer_id,
            })?;
        let building = building::Entity::find_by_id(valid.building_id)
            .one(&txn)
            .await?
            .ok_or(ConsistencyError::UnknownReference {
                entity: "Building",
                id: valid.building_id,
            })?;

        if self.is_duplicate(&txn, &valid).await? {
            warn!(
                customer_id = valid.customer_id,
                building_id = valid.building_id,
                policy = %self.uniqueness,
                "Duplicate subscription rejected"
            );
            return Err(ServiceError::Conflict(format!(
                "Customer {} already has a subscription for building {}",
                valid.customer_id, valid.building_id
            )));
        }

        let created = customer_building::ActiveModel {
            customer_id: Set(valid.customer_id),
            building_id: Set(valid.building_id),
            start_date: Set(valid.start_date),
            end_date: Set(valid.end_date),
            days_of_subscription: Set(valid.days_of_subscription),
            subscription_status: Set(valid.status),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            customer_building_id = created.customer_building_id,
            "Subscription registered"
        );
        Ok(RelationView::with_names(
            created,
            Some(customer.customer_name),
            Some(building.building_name),
        ))
    }

    async fn is_duplicate<C: ConnectionTrait>(
        &self,
        conn: &C,
        valid: &ValidSubscription,
    ) -> Result<bool, ServiceError> {
        let pair = customer_building::Entity::find()
            .filter(customer_building::Column::CustomerId.eq(valid.customer_id))
            .filter(customer_building::Column::BuildingId.eq(valid.building_id));

        let existing = match self.uniqueness {
            SubscriptionUniqueness::Unrestricted => return Ok(false),
            SubscriptionUniqueness::Any => pair.count(conn).await?,
            SubscriptionUniqueness::Active => {
                if valid.status != SubscriptionStatus::Active {
                    return Ok(false);
                }
                pair.filter(
                    customer_building::Column::SubscriptionStatus.eq(SubscriptionStatus::Active),
                )
                .count(conn)
                .await?
            }
        };
        Ok(existing > 0)
    }

    /// Lists all relations, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<RelationView>, ServiceError> {
        let relations = with_names()
            .order_by_desc(customer_building::Column::CustomerBuildingId)
            .into_model::<RelationView>()
            .all(&*self.db_pool)
            .await?;
        Ok(relations)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<RelationView, ServiceError> {
        with_names()
            .filter(customer_building::Column::CustomerBuildingId.eq(id))
            .into_model::<RelationView>()
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("relation", id))
    }

    /// Deletes a relation and returns it as it was
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<RelationView, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let existing = with_names()
            .filter(customer_building::Column::CustomerBuildingId.eq(id))
            .into_model::<RelationView>()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("relation", id))?;

        customer_building::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(customer_building_id = id, "Subscription deleted");
        Ok(existing)
    }
}
