use crate::{db::DbPool, entities::customer, errors::ServiceError};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Customer registration payload as sent by the admin UI.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterCustomerRequest {
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub phonenumber: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RegisterCustomerRequest {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phonenumber: blank_to_none(self.phonenumber),
            address: blank_to_none(self.address),
            city: blank_to_none(self.city),
            state: blank_to_none(self.state),
            country: blank_to_none(self.country),
        }
    }
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Registers a customer. Duplicate email or phone surfaces as a conflict
    /// from the unique indexes.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(
        &self,
        request: RegisterCustomerRequest,
    ) -> Result<customer::Model, ServiceError> {
        let request = request.normalized();
        if request.name.is_empty() || request.email.is_empty() {
            return Err(ServiceError::ValidationError(
                "Name and email required".to_string(),
            ));
        }
        request.validate()?;

        let created = customer::ActiveModel {
            customer_name: Set(request.name),
            customer_email: Set(request.email),
            customer_phone: Set(request.phonenumber),
            customer_address: Set(request.address),
            customer_city: Set(request.city),
            customer_state: Set(request.state),
            customer_country: Set(request.country),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        info!(customer_id = created.customer_id, "Customer registered");
        Ok(created)
    }

    /// Lists all customers, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<customer::Model>, ServiceError> {
        let customers = customer::Entity::find()
            .order_by_desc(customer::Column::CustomerId)
            .all(&*self.db_pool)
            .await?;
        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_blank_to_null() {
        let request = RegisterCustomerRequest {
            name: "  Ada ".into(),
            email: " ada@example.com ".into(),
            phonenumber: Some("   ".into()),
            city: Some(" Pune ".into()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(request.name, "Ada");
        assert_eq!(request.email, "ada@example.com");
        assert_eq!(request.phonenumber, None);
        assert_eq!(request.city.as_deref(), Some("Pune"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn malformed_email_fails_validation() {
        let request = RegisterCustomerRequest {
            name: "Ada".into(),
            email: "not-an-email".into(),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
