use crate::app_log;
use crate::catalog::{BookRecord, RecordSource};
use crate::config::SourceConfig;
use crate::error::{BookshelfError, BookshelfResult};
use crate::ident::{IdGenerator, ISBN_PATTERN};
use crate::logger::LogLevel;
use crate::pipeline::BookStage;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use tokio::time::sleep;

const SOURCE: &str = "pipeline::acquisition";

/// Stage that holds the authoritative record set from the data source
///
/// The input handed to [`process`](BookStage::process) is ignored: the stage
/// always re-reads the source. A failed refresh keeps the previous items so a
/// flaky source leaves a stale list rather than an empty one. The initial
/// [`connect`](Self::connect) is the only place acquisition errors surface.
///
/// # Example
/// ```
/// use bookshelf_lib::catalog::{sample_books, InMemoryRecordSource};
/// use bookshelf_lib::ident::RandomIdGenerator;
/// use bookshelf_lib::pipeline::{AcquisitionStage, BookStage};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = Arc::new(InMemoryRecordSource::with_records(sample_books()));
/// let mut stage = AcquisitionStage::new(source, Arc::new(RandomIdGenerator::new()));
///
/// stage.connect().await.unwrap();
/// assert_eq!(stage.items().len(), 8);
/// # }
/// ```
pub struct AcquisitionStage {
    source: Arc<dyn RecordSource>,
    ids: Arc<dyn IdGenerator>,
    config: SourceConfig,
    isbn_pattern: String,
    session: Option<String>,
    items: Vec<BookRecord>,
}

impl AcquisitionStage {
    /// Create a stage with the default source settings
    pub fn new(source: Arc<dyn RecordSource>, ids: Arc<dyn IdGenerator>) -> Self {
        Self::with_config(source, ids, SourceConfig::default())
    }

    pub fn with_config(
        source: Arc<dyn RecordSource>,
        ids: Arc<dyn IdGenerator>,
        config: SourceConfig,
    ) -> Self {
        Self {
            source,
            ids,
            config,
            isbn_pattern: ISBN_PATTERN.to_string(),
            session: None,
            items: Vec::new(),
        }
    }

    /// Use `pattern` for ISBNs generated by [`add_record`](Self::add_record)
    pub fn with_isbn_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.isbn_pattern = pattern.into();
        self
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Open a session and load the record set
    ///
    /// Tries up to `max_attempts` times, sleeping `retry_delay` between
    /// attempts. An attempt fails if either the connect or the initial fetch
    /// fails.
    ///
    /// # Errors
    /// `BookshelfError::ConnectionFailed` once every attempt has failed
    pub async fn connect(&mut self) -> BookshelfResult<String> {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.try_connect().await {
                Ok(token) => {
                    app_log!(
                        LogLevel::Info,
                        SOURCE,
                        "Connected to {}:{} on attempt {}/{} ({} records)",
                        self.config.address,
                        self.config.port,
                        attempt,
                        max_attempts,
                        self.items.len()
                    );
                    self.session = Some(token.clone());
                    return Ok(token);
                }
                Err(e) => {
                    app_log!(
                        LogLevel::Warn,
                        SOURCE,
                        "Connection attempt {}/{} to {}:{} failed: {}",
                        attempt,
                        max_attempts,
                        self.config.address,
                        self.config.port,
                        e
                    );
                    if attempt < max_attempts {
                        sleep(self.config.retry_delay()).await;
                    }
                }
            }
        }

        app_log!(
            LogLevel::Error,
            SOURCE,
            "Giving up on {}:{} after {} attempts",
            self.config.address,
            self.config.port,
            max_attempts
        );
        Err(BookshelfError::ConnectionFailed)
    }

    async fn try_connect(&mut self) -> BookshelfResult<String> {
        let token = self
            .source
            .connect(&self.config.address, self.config.port)
            .await?;
        self.items = self.source.list_records().await?;
        Ok(token)
    }

    /// Insert a new book with a generated ISBN
    ///
    /// The held items are not refreshed; re-run the pipeline from
    /// [`UpdateType::Data`](crate::pipeline::UpdateType::Data) to see the book.
    ///
    /// # Errors
    /// `BookshelfError::AddBookFailed` if title or author is blank, or the
    /// source rejects the insert
    pub async fn add_record(&self, title: &str, author: &str) -> BookshelfResult<BookRecord> {
        let (title, author) = (title.trim(), author.trim());
        if title.is_empty() || author.is_empty() {
            return Err(BookshelfError::AddBookFailed(
                "title and author are required".to_string(),
            ));
        }

        let isbn = self
            .ids
            .generate_id(&self.isbn_pattern)
            .map_err(|e| BookshelfError::AddBookFailed(e.to_string()))?;
        let record = BookRecord::new(isbn, title, author);

        self.source
            .insert_record(record.clone())
            .await
            .map_err(|e| BookshelfError::AddBookFailed(e.to_string()))?;

        app_log!(LogLevel::Info, SOURCE, "Added book {} ({})", record.isbn, record.title);
        Ok(record)
    }

    /// Remove the book with `isbn` from the source
    ///
    /// # Errors
    /// `BookshelfError::DeleteBookFailed` if `isbn` is blank or the source
    /// rejects the removal
    pub async fn delete_record(&self, isbn: &str) -> BookshelfResult<()> {
        let isbn = isbn.trim();
        if isbn.is_empty() {
            return Err(BookshelfError::DeleteBookFailed(
                "ISBN is required".to_string(),
            ));
        }

        self.source
            .remove_record(isbn)
            .await
            .map_err(|e| BookshelfError::DeleteBookFailed(e.to_string()))?;

        app_log!(LogLevel::Info, SOURCE, "Deleted book {}", isbn);
        Ok(())
    }
}

#[async_trait]
impl BookStage for AcquisitionStage {
    async fn process(&mut self, _input: Vec<BookRecord>) {
        match self.source.list_records().await {
            Ok(records) => self.items = records,
            Err(e) => {
                app_log!(
                    LogLevel::Warn,
                    SOURCE,
                    "Refresh failed, keeping {} previous records: {}",
                    self.items.len(),
                    e
                );
            }
        }
    }

    fn items(&self) -> &[BookRecord] {
        &self.items
    }

    fn update_message(&self) -> &str {
        "Book list refreshed from data source"
    }

    fn name(&self) -> &str {
        "Data Source"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
