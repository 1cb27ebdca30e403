use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{entity::prelude::*, ActiveValue::Set, FromQueryResult};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SubscriptionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[default]
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl SubscriptionStatus {
    pub const ALLOWED: &'static str = "active, inactive";
}

/// A customer's subscription to a building over an inclusive date range.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_building")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub customer_building_id: i32,
    pub customer_id: i32,
    pub building_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_subscription: i32,
    pub subscription_status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::CustomerId"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::building::Entity",
        from = "Column::BuildingId",
        to = "super::building::Column::BuildingId"
    )]
    Building,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::building::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if insert {
            active_model.created_at = Set(Utc::now());
        }
        Ok(active_model)
    }
}

/// Subscription row joined with the customer and building display names.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct RelationView {
    pub customer_building_id: i32,
    pub customer_id: i32,
    pub building_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_subscription: i32,
    pub subscription_status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub building_name: Option<String>,
}

impl RelationView {
    pub fn with_names(
        model: Model,
        customer_name: Option<String>,
        building_name: Option<String>,
    ) -> Self {
        Self {
            customer_building_id: model.customer_building_id,
            customer_id: model.customer_id,
            building_id: model.building_id,
            start_date: model.start_date,
            end_date: model.end_date,
            days_of_subscription: model.days_of_subscription,
            subscription_status: model.subscription_status,
            created_at: model.created_at,
            customer_name,
            building_name,
        }
    }
}
