//! Book list pipeline
//!
//! Books are pulled from an external record source and pushed through five
//! ordered stages: sensitive-word masking, keyword filtering, title sorting
//! and display-range slicing. Each stage can be reconfigured and the pipeline
//! re-run from that stage only.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ident;
pub mod logger;
pub mod pipeline;
pub mod purity;

pub use catalog::{BookRecord, RecordSource};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{BookshelfError, BookshelfResult};
pub use pipeline::{Pipeline, UpdateType};
