use super::core::{BookStage, PipelineResult, StageResult};
use super::stages::{AcquisitionStage, FilterStage, PurityStage, RangeStage, SortStage};
use super::update_type::UpdateType;
use crate::app_log;
use crate::catalog::{BookRecord, RecordSource};
use crate::config::PipelineConfig;
use crate::error::{BookshelfError, BookshelfResult};
use crate::ident::IdGenerator;
use crate::logger::LogLevel;
use crate::purity::WordPurityService;
use std::sync::Arc;
use std::time::Instant;

const SOURCE: &str = "pipeline";

/// Ordered list of stages with selective re-execution
///
/// A run starts at some stage and continues to the last one, each stage
/// receiving the items of the stage before it. Stages before the starting
/// point are not touched, so changing the sort order only re-runs sort and
/// range.
///
/// # Example
/// ```
/// use bookshelf_lib::catalog::{sample_books, InMemoryRecordSource};
/// use bookshelf_lib::config::PipelineConfigBuilder;
/// use bookshelf_lib::ident::RandomIdGenerator;
/// use bookshelf_lib::pipeline::{Pipeline, SortStage, UpdateType};
/// use bookshelf_lib::purity::MaskingPurifier;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> bookshelf_lib::error::BookshelfResult<()> {
/// let config = PipelineConfigBuilder::new().retry_delay_ms(0).build()?;
/// let mut pipeline = Pipeline::set_up(
///     &config,
///     Arc::new(InMemoryRecordSource::with_records(sample_books())),
///     Arc::new(MaskingPurifier::new()),
///     Arc::new(RandomIdGenerator::new()),
/// )
/// .await?;
///
/// pipeline
///     .stage_mut::<SortStage>(UpdateType::Sort)?
///     .set_sort_type("ASC")?;
/// let result = pipeline.update_result(UpdateType::Sort).await?;
///
/// assert_eq!(result.executed_stages(), 2);
/// assert_eq!(
///     pipeline.generate_display_item_row()[0].title,
///     "Alice Adventures in ***"
/// );
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    name: String,
    stages: Vec<Box<dyn BookStage>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(name)
    }

    /// Build the standard five-stage pipeline and make it display-ready
    ///
    /// Connects the acquisition stage (with retries), applies the initial
    /// stage settings from `config`, then runs every stage once.
    ///
    /// # Errors
    /// - `ConnectionFailed` if the source cannot be reached
    /// - a validation error if `config` carries an invalid sort type or range
    pub async fn set_up(
        config: &PipelineConfig,
        source: Arc<dyn RecordSource>,
        purifier: Arc<dyn WordPurityService>,
        ids: Arc<dyn IdGenerator>,
    ) -> BookshelfResult<Self> {
        config.validate()?;

        let mut acquisition = AcquisitionStage::with_config(source, ids, config.source.clone())
            .with_isbn_pattern(config.isbn_pattern.clone());
        let mut purity = PurityStage::with_words(purifier, &config.purity.sensitive_words);
        let mut filter = FilterStage::new();
        let mut sort = SortStage::new();
        let mut range = RangeStage::new();

        if let Some(disabled) = config.purity.disabled {
            purity.set_disable_purity(disabled);
        }
        let settings = &config.stages;
        if let Some(word) = &settings.filter_word {
            filter.set_filter_word(word.clone());
        }
        filter.set_ignore_case(settings.ignore_case);
        if let Some(sort_type) = &settings.sort_type {
            sort.set_sort_type(sort_type)?;
        }
        if let Some((start, end)) = &settings.range {
            range.set_range(start.clone(), end.clone())?;
        }

        acquisition.connect().await?;

        let mut pipeline = Self::builder("book-list")
            .add_stage(acquisition)
            .add_stage(purity)
            .add_stage(filter)
            .add_stage(sort)
            .add_stage(range)
            .build();

        pipeline.update_result(UpdateType::Data).await?;
        Ok(pipeline)
    }

    /// Get the pipeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Re-run stages from `from` through the last stage
    ///
    /// The first re-run stage receives the items of the stage before it (an
    /// empty list when starting at the first stage).
    ///
    /// # Errors
    /// `InvalidStageIndex` if `from` is past the last stage
    pub async fn update_result(&mut self, from: impl Into<usize>) -> BookshelfResult<PipelineResult> {
        let from = from.into();
        let count = self.stages.len();
        if from >= count {
            return Err(BookshelfError::InvalidStageIndex { index: from, count });
        }

        app_log!(
            LogLevel::Info,
            SOURCE,
            "Updating pipeline '{}' from stage {}/{}",
            self.name,
            from + 1,
            count
        );

        let pipeline_start = Instant::now();
        let mut stage_results = Vec::with_capacity(count - from);
        let mut input: Vec<BookRecord> = match from {
            0 => Vec::new(),
            _ => self.stages[from - 1].items().to_vec(),
        };

        for index in from..count {
            let stage = &mut self.stages[index];
            let stage_start = Instant::now();

            stage.process(input).await;

            let result = StageResult::new(index, &**stage, stage_start.elapsed());
            app_log!(
                LogLevel::Debug,
                SOURCE,
                "Stage {}/{} '{}' produced {} items in {:.2}ms",
                index + 1,
                count,
                result.stage_name,
                result.item_count,
                result.duration.as_secs_f64() * 1000.0
            );
            stage_results.push(result);

            input = stage.items().to_vec();
        }

        let total_duration = pipeline_start.elapsed();
        app_log!(
            LogLevel::Info,
            SOURCE,
            "Pipeline '{}' ran {} stages in {:.2}ms",
            self.name,
            stage_results.len(),
            total_duration.as_secs_f64() * 1000.0
        );

        Ok(PipelineResult {
            pipeline_name: self.name.clone(),
            from_index: from,
            stage_results,
            total_duration,
        })
    }

    /// The stage at `index`, if any
    pub fn processor(&self, index: usize) -> Option<&dyn BookStage> {
        self.stages.get(index).map(|stage| &**stage)
    }

    /// Mutable access to the stage at `index`, if any
    pub fn processor_mut(&mut self, index: usize) -> Option<&mut (dyn BookStage + 'static)> {
        self.stages.get_mut(index).map(|stage| &mut **stage)
    }

    /// Typed access to the stage at `at`
    ///
    /// # Errors
    /// `InvalidStageIndex` or `StageTypeMismatch`
    pub fn stage<T: BookStage>(&self, at: impl Into<usize>) -> BookshelfResult<&T> {
        let index = at.into();
        let count = self.stages.len();
        self.processor(index)
            .ok_or(BookshelfError::InvalidStageIndex { index, count })?
            .as_any()
            .downcast_ref::<T>()
            .ok_or(BookshelfError::StageTypeMismatch(index))
    }

    /// Typed mutable access to the stage at `at`, for reconfiguration
    ///
    /// # Errors
    /// `InvalidStageIndex` or `StageTypeMismatch`
    pub fn stage_mut<T: BookStage>(&mut self, at: impl Into<usize>) -> BookshelfResult<&mut T> {
        let index = at.into();
        let count = self.stages.len();
        self.processor_mut(index)
            .ok_or(BookshelfError::InvalidStageIndex { index, count })?
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(BookshelfError::StageTypeMismatch(index))
    }

    /// Items held by the last stage: the display-ready result
    pub fn generate_display_item_row(&self) -> &[BookRecord] {
        self.stages
            .last()
            .map(|stage| stage.items())
            .unwrap_or(&[])
    }
}

/// Builder for constructing pipelines
pub struct PipelineBuilder {
    name: String,
    stages: Vec<Box<dyn BookStage>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Add a stage to the pipeline
    pub fn add_stage<S: BookStage>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Add a boxed stage to the pipeline
    pub fn add_boxed_stage(mut self, stage: Box<dyn BookStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            name: self.name,
            stages: self.stages,
        }
    }
}
