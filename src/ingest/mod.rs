//! Workbook ingestion
//!
//! Everything between raw xlsx bytes and a normalized [`crate::models::Dataset`].

pub mod experts;
pub mod fallback;
pub mod graph;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod rows;
pub mod source;
pub mod workbook;

#[cfg(test)]
pub mod fixtures;

pub use fallback::fallback_dataset;
pub use pipeline::IngestPipeline;
pub use source::{WorkbookFetcher, WorkbookSource};
