use crate::app_log;
use crate::catalog::BookRecord;
use crate::logger::LogLevel;
use crate::pipeline::BookStage;
use crate::purity::WordPurityService;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// Words registered with the purity service unless configured otherwise
pub const SENSITIVE_WORDS: [&str; 2] = ["Copperfield", "Wonderland"];

/// Stage that masks sensitive words in titles
///
/// Only titles are rewritten; ISBN and author pass through untouched.
pub struct PurityStage {
    service: Arc<dyn WordPurityService>,
    disabled: Option<bool>,
    items: Vec<BookRecord>,
}

impl PurityStage {
    /// Create the stage and register the built-in sensitive words
    pub fn new(service: Arc<dyn WordPurityService>) -> Self {
        let words: Vec<String> = SENSITIVE_WORDS.iter().map(|w| w.to_string()).collect();
        Self::with_words(service, &words)
    }

    /// Create the stage and register `words` instead of the built-in list
    pub fn with_words(service: Arc<dyn WordPurityService>, words: &[String]) -> Self {
        service.register_words(words);
        app_log!(
            LogLevel::Debug,
            "pipeline::purity",
            "Registered {} sensitive words",
            words.len()
        );
        Self {
            service,
            disabled: None,
            items: Vec::new(),
        }
    }

    /// Bypass masking on subsequent runs
    pub fn set_disable_purity(&mut self, disable: bool) {
        self.disabled = Some(disable);
    }

    /// `None` until [`set_disable_purity`](Self::set_disable_purity) is called
    pub fn is_disable_purity(&self) -> Option<bool> {
        self.disabled
    }

    fn purify_items(&self, items: &[BookRecord]) -> Vec<BookRecord> {
        items
            .iter()
            .map(|book| book.with_title(self.service.purify(&book.title)))
            .collect()
    }
}

#[async_trait]
impl BookStage for PurityStage {
    async fn process(&mut self, input: Vec<BookRecord>) {
        self.items = if self.disabled == Some(true) {
            input
        } else {
            self.purify_items(&input)
        };
    }

    fn items(&self) -> &[BookRecord] {
        &self.items
    }

    fn update_message(&self) -> &str {
        "Sensitive words masked in titles"
    }

    fn name(&self) -> &str {
        "Word Purity"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_books;
    use crate::purity::MaskingPurifier;
    use std::sync::Mutex;

    /// Records registrations and masks "Wonderland" like the real service
    struct RecordingPurifier {
        registrations: Mutex<Vec<Vec<String>>>,
        inner: MaskingPurifier,
    }

    impl RecordingPurifier {
        fn new() -> Self {
            Self {
                registrations: Mutex::new(Vec::new()),
                inner: MaskingPurifier::new(),
            }
        }
    }

    impl WordPurityService for RecordingPurifier {
        fn register_words(&self, words: &[String]) {
            self.registrations.lock().unwrap().push(words.to_vec());
            self.inner.register_words(words);
        }

        fn purify(&self, text: &str) -> String {
            self.inner.purify(text)
        }
    }

    #[tokio::test]
    async fn test_masks_sensitive_titles() {
        let mut stage = PurityStage::new(Arc::new(MaskingPurifier::new()));
        stage.process(sample_books()).await;

        let mut expected = sample_books();
        expected[6].title = "Alice Adventures in ***".to_string();
        assert_eq!(stage.items(), expected.as_slice());
    }

    #[tokio::test]
    async fn test_default_state_is_unset_and_active() {
        let mut stage = PurityStage::new(Arc::new(MaskingPurifier::new()));
        assert_eq!(stage.is_disable_purity(), None);

        stage.process(sample_books()).await;
        assert_eq!(stage.items()[6].title, "Alice Adventures in ***");
    }

    #[tokio::test]
    async fn test_disabled_passes_input_through() {
        let mut stage = PurityStage::new(Arc::new(MaskingPurifier::new()));
        stage.set_disable_purity(true);
        stage.process(sample_books()).await;

        assert_eq!(stage.items(), sample_books().as_slice());
    }

    #[tokio::test]
    async fn test_explicitly_enabled_still_masks() {
        let mut stage = PurityStage::new(Arc::new(MaskingPurifier::new()));
        stage.set_disable_purity(false);
        stage.process(sample_books()).await;

        assert_eq!(stage.is_disable_purity(), Some(false));
        assert_eq!(stage.items()[6].title, "Alice Adventures in ***");
    }

    #[tokio::test]
    async fn test_registers_words_once_at_construction() {
        let service = Arc::new(RecordingPurifier::new());
        let mut stage = PurityStage::new(service.clone());
        stage.process(sample_books()).await;

        let registrations = service.registrations.lock().unwrap();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0], vec!["Copperfield", "Wonderland"]);
    }

    #[tokio::test]
    async fn test_purifies_every_title() {
        let service = Arc::new(MaskingPurifier::new());
        let mut stage = PurityStage::new(service.clone());
        stage.process(sample_books()).await;

        assert_eq!(service.purify_calls(), 8);
    }

    #[tokio::test]
    async fn test_custom_word_list() {
        let words = vec!["Emma".to_string()];
        let mut stage = PurityStage::with_words(Arc::new(MaskingPurifier::new()), &words);
        stage.process(sample_books()).await;

        assert_eq!(stage.items()[5].title, "*** Story");
        assert_eq!(stage.items()[6].title, "Alice Adventures in Wonderland");
    }

    #[test]
    fn test_purify_items_helper() {
        let stage = PurityStage::new(Arc::new(MaskingPurifier::new()));
        let purified = stage.purify_items(&sample_books());

        assert_eq!(purified.len(), 8);
        assert_eq!(purified[6].title, "Alice Adventures in ***");
        assert_eq!(purified[6].isbn, "680-71-48243-17-0");
    }
}
