use crate::catalog::BookRecord;
use async_trait::async_trait;
use std::any::Any;
use std::time::Duration;

/// A single stage in the book pipeline
///
/// Each stage holds its own configuration and the list of records it
/// produced on its last run. The pipeline hands every stage the items of the
/// stage before it.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use bookshelf_lib::catalog::BookRecord;
/// use bookshelf_lib::pipeline::BookStage;
/// use std::any::Any;
///
/// struct Uppercase {
///     items: Vec<BookRecord>,
/// }
///
/// #[async_trait]
/// impl BookStage for Uppercase {
///     async fn process(&mut self, input: Vec<BookRecord>) {
///         self.items = input
///             .iter()
///             .map(|b| b.with_title(b.title.to_uppercase()))
///             .collect();
///     }
///
///     fn items(&self) -> &[BookRecord] { &self.items }
///     fn update_message(&self) -> &str { "Titles uppercased" }
///     fn name(&self) -> &str { "Uppercase" }
///     fn as_any(&self) -> &dyn Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// }
/// ```
#[async_trait]
pub trait BookStage: Send + Sync + 'static {
    /// Replace this stage's items with the result of transforming `input`
    ///
    /// Never fails: configuration problems are rejected by the stage's
    /// setters before a run.
    async fn process(&mut self, input: Vec<BookRecord>);

    /// Items produced by the last run (empty before the first run)
    fn items(&self) -> &[BookRecord];

    /// Fixed description of what a run of this stage changes
    fn update_message(&self) -> &str;

    /// Stage name for logging and results
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Result of one stage run
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Position in the pipeline
    pub index: usize,

    pub stage_name: String,

    pub update_message: String,

    /// Number of items the stage held after the run
    pub item_count: usize,

    pub duration: Duration,
}

impl StageResult {
    pub fn new(index: usize, stage: &dyn BookStage, duration: Duration) -> Self {
        Self {
            index,
            stage_name: stage.name().to_string(),
            update_message: stage.update_message().to_string(),
            item_count: stage.items().len(),
            duration,
        }
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub pipeline_name: String,

    /// Index of the first stage that ran
    pub from_index: usize,

    /// Results in execution order
    pub stage_results: Vec<StageResult>,

    pub total_duration: Duration,
}

impl PipelineResult {
    /// Update messages of every stage that ran, in execution order
    pub fn update_messages(&self) -> Vec<String> {
        self.stage_results
            .iter()
            .map(|r| r.update_message.clone())
            .collect()
    }

    /// Indices of the stages that ran
    pub fn executed_indices(&self) -> Vec<usize> {
        self.stage_results.iter().map(|r| r.index).collect()
    }

    pub fn executed_stages(&self) -> usize {
        self.stage_results.len()
    }

    /// Item count of the last stage that ran
    pub fn final_item_count(&self) -> Option<usize> {
        self.stage_results.last().map(|r| r.item_count)
    }
}
