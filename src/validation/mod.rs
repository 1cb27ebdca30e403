//! Consistency rules applied to incoming writes before they reach the database.
//!
//! Request bodies arrive from a loosely typed admin UI: numbers may be sent as
//! strings, optional text as empty strings. The [`Numeric`] and [`Text`]
//! wrappers absorb that looseness at the edge so the rule functions in the
//! submodules only deal with "present and well-formed" versus "absent".

pub mod exit_paths;
pub mod floors;
pub mod qr_links;
pub mod sensors;
pub mod subscription;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use exit_paths::{validate_exit_paths, ExitPathBatch, ExitPathInput, NewExitPath};
pub use floors::{validate_floor, validate_floor_batch, FloorInput, NewFloor};
pub use qr_links::{normalize_link_request, LinkRequest, LinkTargets};
pub use sensors::{
    validate_physical_sensor, validate_sensor_batch, validate_virtual_sensor,
    validate_virtual_sensor_batch, NewPhysicalSensor, NewVirtualSensor, PhysicalSensorInput,
    SensorBatch, VirtualSensorInput,
};
pub use subscription::{
    expected_subscription_days, validate_subscription, SubscriptionInput, ValidSubscription,
};

/// Domain rule violations. Every variant maps to a 400 response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} is not a valid date: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("end_date must not be before start_date")]
    DateRangeInverted,

    #[error("Days of subscription mismatch with dates (expected {expected}, got {provided})")]
    SubscriptionDaysMismatch { expected: i64, provided: f64 },

    #[error("{field} must be one of {allowed}")]
    InvalidEnum {
        field: &'static str,
        allowed: &'static str,
    },

    #[error("{0} must be a positive integer")]
    NonPositiveNumber(&'static str),

    #[error("No valid exit paths provided")]
    NoValidExitPaths { errors: Vec<String> },

    #[error("{message}")]
    InvalidBatch {
        message: &'static str,
        errors: Vec<String>,
    },

    #[error("{entity} {id} does not exist")]
    UnknownReference { entity: &'static str, id: i32 },

    #[error("floor_id {provided} does not match floor {expected} of physical sensor {sensor_id}")]
    FloorMismatch {
        sensor_id: i32,
        expected: i32,
        provided: i32,
    },
}

impl ConsistencyError {
    /// Itemised per-entry errors for batch rejections.
    pub fn item_errors(&self) -> Option<&[String]> {
        match self {
            Self::NoValidExitPaths { errors } | Self::InvalidBatch { errors, .. } => {
                Some(errors.as_slice())
            }
            _ => None,
        }
    }
}

/// A numeric request field that tolerates string-encoded numbers.
///
/// Missing, `null`, empty and non-numeric values all collapse to "absent";
/// callers decide whether absence is an error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Numeric(Option<f64>);

impl Numeric {
    pub fn new(value: f64) -> Self {
        Self(Some(value).filter(|v| v.is_finite()))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn value(&self) -> Option<f64> {
        self.0
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Strictly positive whole number that fits a database id.
    pub fn positive_id(&self) -> Option<i32> {
        self.whole().filter(|v| *v > 0)
    }

    pub fn non_negative(&self) -> Option<i32> {
        self.whole().filter(|v| *v >= 0)
    }

    pub fn whole(&self) -> Option<i32> {
        self.0
            .filter(|v| v.fract() == 0.0 && *v >= i32::MIN as f64 && *v <= i32::MAX as f64)
            .map(|v| v as i32)
    }
}

impl From<Value> for Numeric {
    fn from(value: Value) -> Self {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            _ => None,
        };
        Self(parsed.filter(|v| v.is_finite()))
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Value>::deserialize(deserializer)?
            .map(Numeric::from)
            .unwrap_or_default())
    }
}

/// A text request field, trimmed, where blank means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(Option<String>);

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self(None)
        } else {
            Self(Some(trimmed.to_string()))
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Text::new(s),
            Some(Value::Number(n)) => Text::new(n.to_string()),
            _ => Text::default(),
        };
        Ok(text)
    }
}
