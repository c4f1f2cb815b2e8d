//! Data models and DTOs (Data Transfer Objects)
//!
//! The normalized policy dataset plus the response envelopes used by the API.

pub mod dataset;
pub mod dimension;
pub mod phase;
pub mod policy;

// Re-export commonly used types
pub use dataset::Dataset;
pub use dimension::{Dimension, DimensionId};
pub use phase::Phase;
pub use policy::{Complexity, Connection, ExpertReference, Policy, PolicyId};

use serde::Serialize;

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}
