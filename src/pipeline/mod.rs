//! Five-stage book list pipeline
//!
//! Stages run in a fixed order (data source, word purity, keyword filter,
//! title sort, display range), each holding the items it produced on its last
//! run. After reconfiguring a stage, re-run the pipeline from that stage's
//! [`UpdateType`] and only the stages from there to the end are processed.
//!
//! # Example
//! ```
//! use bookshelf_lib::pipeline::{FilterStage, Pipeline, RangeStage};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> bookshelf_lib::error::BookshelfResult<()> {
//! let mut pipeline = Pipeline::builder("ad-hoc")
//!     .add_stage(FilterStage::new())
//!     .add_stage(RangeStage::new())
//!     .build();
//!
//! pipeline.stage_mut::<RangeStage>(1usize)?.set_range(1, 1)?;
//! pipeline.update_result(0usize).await?;
//! assert!(pipeline.generate_display_item_row().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod executor;
pub mod stages;
pub mod update_type;

// Re-export main types
pub use core::{BookStage, PipelineResult, StageResult};
pub use executor::{Pipeline, PipelineBuilder};
pub use stages::{
    AcquisitionStage, FilterStage, PurityStage, RangeBound, RangeStage, RangeWindow, SortStage,
    SortType,
};
pub use update_type::UpdateType;
