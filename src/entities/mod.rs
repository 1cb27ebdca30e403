pub mod building;
pub mod customer;
pub mod customer_building;
pub mod exit_path;
pub mod floor;
pub mod linked_qr_path;
pub mod physical_sensor;
pub mod qr_code;
pub mod virtual_sensor;

pub use customer_building::SubscriptionStatus;
pub use exit_path::PathStatus;
pub use physical_sensor::{SensorStatus, SensorType};
