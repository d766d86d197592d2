//! Book records and the contract for the external record source
//!
//! The pipeline never talks to storage directly. It consumes a
//! [`RecordSource`], and [`InMemoryRecordSource`] is the in-process
//! implementation used for development and tests.

pub mod fixtures;
pub mod mock;
pub mod types;

pub use fixtures::sample_books;
pub use mock::InMemoryRecordSource;
pub use types::BookRecord;

use crate::error::BookshelfResult;
use async_trait::async_trait;

/// Contract for the authoritative store of book records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Open a session with the source, returning a session token
    async fn connect(&self, address: &str, port: u16) -> BookshelfResult<String>;

    /// Fetch every record currently held by the source
    async fn list_records(&self) -> BookshelfResult<Vec<BookRecord>>;

    /// Insert a new record
    async fn insert_record(&self, record: BookRecord) -> BookshelfResult<()>;

    /// Remove the record with the given ISBN
    async fn remove_record(&self, isbn: &str) -> BookshelfResult<()>;
}
