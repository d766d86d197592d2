use super::{BookRecord, RecordSource};
use crate::error::{BookshelfError, BookshelfResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

/// In-memory record source for development and testing
///
/// Simulates a remote book store without any network calls. Failures can be
/// scripted so that retry and refresh behaviour can be exercised:
/// - the first `n` connect attempts fail ([`failing_connects`](Self::failing_connects))
/// - listing fails while [`set_list_failure`](Self::set_list_failure) is on
/// - inserts and removals are rejected while [`set_reject_writes`](Self::set_reject_writes) is on
///
/// Every call is counted so tests can assert on interaction.
pub struct InMemoryRecordSource {
    records: Mutex<Vec<BookRecord>>,

    /// Simulated network delay in milliseconds
    delay_ms: u64,

    /// Connect attempts still to fail
    pending_connect_failures: AtomicUsize,

    list_fails: AtomicBool,
    reject_writes: AtomicBool,

    session: Mutex<Option<String>>,

    connect_calls: AtomicUsize,
    list_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    remove_calls: AtomicUsize,
}

impl InMemoryRecordSource {
    /// Create an empty source with instant responses
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a source seeded with `records`
    pub fn with_records(records: Vec<BookRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            delay_ms: 0,
            pending_connect_failures: AtomicUsize::new(0),
            list_fails: AtomicBool::new(false),
            reject_writes: AtomicBool::new(false),
            session: Mutex::new(None),
            connect_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            insert_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        }
    }

    /// Delay every call by `delay_ms`
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Fail the next `count` connect attempts
    pub fn failing_connects(self, count: usize) -> Self {
        self.pending_connect_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Fail every connect attempt
    pub fn unreachable(self) -> Self {
        self.failing_connects(usize::MAX)
    }

    pub fn set_list_failure(&self, fail: bool) {
        self.list_fails.store(fail, Ordering::SeqCst);
    }

    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Snapshot of the stored records
    pub fn records(&self) -> BookshelfResult<Vec<BookRecord>> {
        Ok(self.records.lock()?.clone())
    }

    /// Replace the stored records
    pub fn replace_records(&self, records: Vec<BookRecord>) -> BookshelfResult<()> {
        *self.records.lock()? = records;
        Ok(())
    }

    pub fn session(&self) -> BookshelfResult<Option<String>> {
        Ok(self.session.lock()?.clone())
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn check_writable(&self) -> BookshelfResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(BookshelfError::SourceError(
                "source is read-only".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn connect(&self, address: &str, port: u16) -> BookshelfResult<String> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let failed = self
            .pending_connect_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                match remaining {
                    0 => None,
                    usize::MAX => Some(usize::MAX),
                    n => Some(n - 1),
                }
            })
            .is_ok();
        if failed {
            return Err(BookshelfError::SourceError(format!(
                "connection refused: {}:{}",
                address, port
            )));
        }

        let token = Uuid::new_v4().to_string();
        *self.session.lock()? = Some(token.clone());
        Ok(token)
    }

    async fn list_records(&self) -> BookshelfResult<Vec<BookRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.list_fails.load(Ordering::SeqCst) {
            return Err(BookshelfError::SourceError(
                "failed to list records".to_string(),
            ));
        }
        self.records()
    }

    async fn insert_record(&self, record: BookRecord) -> BookshelfResult<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.check_writable()?;

        let mut records = self.records.lock()?;
        if records.iter().any(|r| r.isbn == record.isbn) {
            return Err(BookshelfError::SourceError(format!(
                "duplicate ISBN: {}",
                record.isbn
            )));
        }
        records.push(record);
        Ok(())
    }

    async fn remove_record(&self, isbn: &str) -> BookshelfResult<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.check_writable()?;

        let mut records = self.records.lock()?;
        let before = records.len();
        records.retain(|r| r.isbn != isbn);
        if records.len() == before {
            return Err(BookshelfError::SourceError(format!(
                "no record with ISBN {}",
                isbn
            )));
        }
        Ok(())
    }
}
