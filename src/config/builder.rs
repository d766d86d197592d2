use super::{PipelineConfig, PurityConfig, SourceConfig, StageSettings};
use crate::error::{BookshelfError, BookshelfResult};
use crate::ident::ISBN_PATTERN;
use crate::pipeline::stages::RangeBound;

/// Builder for constructing PipelineConfig instances with a fluent API
///
/// # Example
/// ```
/// use bookshelf_lib::config::PipelineConfigBuilder;
///
/// let config = PipelineConfigBuilder::new()
///     .port(4000)
///     .max_attempts(3)
///     .filter_word("Game")
///     .sort_type("ASC")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    source: SourceConfig,
    sensitive_words: Option<Vec<String>>,
    disable_purity: Option<bool>,
    isbn_pattern: Option<String>,
    stages: StageSettings,
}

impl PipelineConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.source.address = address.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.source.port = port;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.source.max_attempts = attempts;
        self
    }

    pub fn retry_delay_ms(mut self, delay_ms: u64) -> Self {
        self.source.retry_delay_ms = delay_ms;
        self
    }

    /// Replace the built-in sensitive word list
    pub fn sensitive_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensitive_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    pub fn disable_purity(mut self, disable: bool) -> Self {
        self.disable_purity = Some(disable);
        self
    }

    pub fn isbn_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.isbn_pattern = Some(pattern.into());
        self
    }

    pub fn filter_word(mut self, word: impl Into<String>) -> Self {
        self.stages.filter_word = Some(word.into());
        self
    }

    pub fn ignore_case(mut self, ignore: bool) -> Self {
        self.stages.ignore_case = ignore;
        self
    }

    pub fn sort_type(mut self, sort_type: impl Into<String>) -> Self {
        self.stages.sort_type = Some(sort_type.into());
        self
    }

    pub fn range(mut self, start: impl Into<RangeBound>, end: impl Into<RangeBound>) -> Self {
        self.stages.range = Some((start.into(), end.into()));
        self
    }

    /// Build the PipelineConfig instance
    ///
    /// # Errors
    /// Returns `BookshelfError::BuilderError` if a field is invalid
    pub fn build(self) -> BookshelfResult<PipelineConfig> {
        if let Some(sort_type) = &self.stages.sort_type {
            if sort_type != "ASC" && sort_type != "DESC" {
                return Err(BookshelfError::BuilderError(format!(
                    "sort_type must be ASC or DESC, got {}",
                    sort_type
                )));
            }
        }

        let defaults = PurityConfig::default();
        let config = PipelineConfig {
            source: self.source,
            purity: PurityConfig {
                sensitive_words: self.sensitive_words.unwrap_or(defaults.sensitive_words),
                disabled: self.disable_purity,
            },
            isbn_pattern: self.isbn_pattern.unwrap_or_else(|| ISBN_PATTERN.to_string()),
            stages: self.stages,
        };

        config.validate().map_err(|e| match e {
            BookshelfError::ConfigError(msg) => BookshelfError::BuilderError(msg),
            other => other,
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_config_defaults() {
        let built = PipelineConfigBuilder::new().build().unwrap();
        let default = PipelineConfig::default();

        assert_eq!(built.source.address, default.source.address);
        assert_eq!(built.source.port, default.source.port);
        assert_eq!(built.purity.sensitive_words, default.purity.sensitive_words);
        assert_eq!(built.isbn_pattern, default.isbn_pattern);
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = PipelineConfigBuilder::new()
            .address("http://books.internal")
            .port(8080)
            .max_attempts(3)
            .retry_delay_ms(10)
            .sensitive_words(["Emma"])
            .disable_purity(true)
            .filter_word("Game")
            .ignore_case(true)
            .sort_type("DESC")
            .range(1, "3")
            .build()
            .unwrap();

        assert_eq!(config.source.address, "http://books.internal");
        assert_eq!(config.source.port, 8080);
        assert_eq!(config.source.max_attempts, 3);
        assert_eq!(config.purity.sensitive_words, vec!["Emma"]);
        assert_eq!(config.purity.disabled, Some(true));
        assert!(config.stages.ignore_case);
        assert_eq!(
            config.stages.range,
            Some((RangeBound::Int(1), RangeBound::Text("3".to_string())))
        );
    }

    #[test]
    fn test_builder_rejects_unknown_sort_type() {
        let result = PipelineConfigBuilder::new().sort_type("RANDOM").build();
        assert!(matches!(result, Err(BookshelfError::BuilderError(_))));
    }

    #[test]
    fn test_builder_rejects_zero_attempts() {
        let result = PipelineConfigBuilder::new().max_attempts(0).build();
        match result {
            Err(BookshelfError::BuilderError(msg)) => assert!(msg.contains("max_attempts")),
            other => panic!("Expected builder error, got {:?}", other),
        }
    }
}
