use crate::catalog::BookRecord;
use crate::pipeline::BookStage;
use async_trait::async_trait;
use std::any::Any;

/// Stage that keeps books whose title contains a keyword
#[derive(Debug, Default)]
pub struct FilterStage {
    word: String,
    ignore_case: bool,
    items: Vec<BookRecord>,
}

impl FilterStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty keyword matches every title
    pub fn set_filter_word(&mut self, word: impl Into<String>) {
        self.word = word.into();
    }

    pub fn filter_word(&self) -> &str {
        &self.word
    }

    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.ignore_case = ignore_case;
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    fn matches(&self, title: &str, lowered_word: &str) -> bool {
        if self.ignore_case {
            title.to_lowercase().contains(lowered_word)
        } else {
            title.contains(self.word.as_str())
        }
    }
}

#[async_trait]
impl BookStage for FilterStage {
    async fn process(&mut self, input: Vec<BookRecord>) {
        let lowered = self.word.to_lowercase();
        let kept: Vec<BookRecord> = input
            .into_iter()
            .filter(|book| self.matches(&book.title, &lowered))
            .collect();
        self.items = kept;
    }

    fn items(&self) -> &[BookRecord] {
        &self.items
    }

    fn update_message(&self) -> &str {
        "Books filtered by keyword"
    }

    fn name(&self) -> &str {
        "Filter"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
