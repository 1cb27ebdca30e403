pub mod buildings;
pub mod common;
pub mod customers;
pub mod exit_paths;
pub mod floors;
pub mod linked_qr_paths;
pub mod physical_sensors;
pub mod qr_codes;
pub mod subscriptions;
pub mod virtual_sensors;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        buildings::BuildingService, customers::CustomerService, exit_paths::ExitPathService,
        floors::FloorService, linked_qr_paths::LinkedQrPathService,
        physical_sensors::PhysicalSensorService, qr_codes::QrCodeService,
        subscriptions::SubscriptionService, virtual_sensors::VirtualSensorService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<CustomerService>,
    pub buildings: Arc<BuildingService>,
    pub floors: Arc<FloorService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub physical_sensors: Arc<PhysicalSensorService>,
    pub virtual_sensors: Arc<VirtualSensorService>,
    pub exit_paths: Arc<ExitPathService>,
    pub qr_codes: Arc<QrCodeService>,
    pub linked_qr_paths: Arc<LinkedQrPathService>,
}

impl AppServices {
    /// Builds every service over one shared pool.
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            customers: Arc::new(CustomerService::new(db_pool.clone())),
            buildings: Arc::new(BuildingService::new(db_pool.clone())),
            floors: Arc::new(FloorService::new(db_pool.clone())),
            subscriptions: Arc::new(SubscriptionService::new(
                db_pool.clone(),
                config.subscription_uniqueness,
            )),
            physical_sensors: Arc::new(PhysicalSensorService::new(db_pool.clone())),
            virtual_sensors: Arc::new(VirtualSensorService::new(db_pool.clone())),
            exit_paths: Arc::new(ExitPathService::new(db_pool.clone())),
            qr_codes: Arc::new(QrCodeService::new(db_pool.clone())),
            linked_qr_paths: Arc::new(LinkedQrPathService::new(db_pool)),
        }
    }
}
