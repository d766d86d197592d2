use thiserror::Error;

/// Central error type for the bookshelf pipeline
#[derive(Error, Debug)]
pub enum BookshelfError {
    // ============================================================================
    // Connection Errors
    // ============================================================================
    #[error("Cannot connect to data source")]
    ConnectionFailed,

    #[error("Data source error: {0}")]
    SourceError(String),

    // ============================================================================
    // Catalogue Errors
    // ============================================================================
    #[error("Add book failed: {0}")]
    AddBookFailed(String),

    #[error("Delete book failed: {0}")]
    DeleteBookFailed(String),

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("It must be ASC or DESC, got: {0}")]
    InvalidSortType(String),

    #[error("Invalid Float Input")]
    InvalidFloatInput,

    #[error("Invalid String Input")]
    InvalidStringInput,

    #[error("Cannot be less than 0")]
    RangeStartTooSmall,

    #[error("End Range cannot be less than Start Range")]
    RangeEndBeforeStart,

    #[error("Hash number can't less than 0")]
    InvalidTokenLength,

    // ============================================================================
    // Pipeline Errors
    // ============================================================================
    #[error("No stage at index {index} (pipeline has {count} stages)")]
    InvalidStageIndex { index: usize, count: usize },

    #[error("Stage at index {0} is not of the requested type")]
    StageTypeMismatch(usize),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Builder pattern validation error
    #[error("Builder error: {0}")]
    BuilderError(String),

    // ============================================================================
    // Generic/System Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mutex lock error")]
    LockError,
}

impl BookshelfError {
    /// Whether this error came from rejecting stage configuration
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookshelfError::InvalidSortType(_)
                | BookshelfError::InvalidFloatInput
                | BookshelfError::InvalidStringInput
                | BookshelfError::RangeStartTooSmall
                | BookshelfError::RangeEndBeforeStart
        )
    }
}

// Implement conversion from PoisonError for Mutex locks
impl<T> From<std::sync::PoisonError<T>> for BookshelfError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        BookshelfError::LockError
    }
}

// Implement conversion to String for callers that surface plain messages
impl From<BookshelfError> for String {
    fn from(error: BookshelfError) -> Self {
        error.to_string()
    }
}

// Helper type alias for Results
pub type BookshelfResult<T> = Result<T, BookshelfError>;
