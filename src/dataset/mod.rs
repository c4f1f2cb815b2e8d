//! Dataset cache and read-side queries

pub mod query;
pub mod service;
pub mod store;

pub use query::{dimension_counts, filter_policies, related_policies, PolicyFilter};
pub use service::DatasetService;
pub use store::{DatasetSnapshot, SnapshotMetadata};
