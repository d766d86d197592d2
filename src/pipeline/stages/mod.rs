//! Stages of the book pipeline, in execution order:
//! 1. AcquisitionStage - Fetch the record set from the data source
//! 2. PurityStage - Mask sensitive words in titles (optional)
//! 3. FilterStage - Keep titles containing a keyword
//! 4. SortStage - Order by title
//! 5. RangeStage - Cut the display page

pub mod acquisition;
pub mod filter;
pub mod purity;
pub mod range;
pub mod sort;

// Re-export stages
pub use acquisition::AcquisitionStage;
pub use filter::FilterStage;
pub use purity::PurityStage;
pub use range::{RangeBound, RangeStage, RangeWindow};
pub use sort::{SortStage, SortType};
