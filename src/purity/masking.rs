use super::WordPurityService;
use crate::app_log;
use crate::logger::LogLevel;
use regex::{NoExpand, Regex, RegexBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Default replacement for a masked word
pub const DEFAULT_MASK: &str = "***";

/// Word-purity service that masks registered words case-insensitively
///
/// The dictionary is compiled into a single alternation regex whenever words
/// are added, longest words first so that overlapping entries mask the
/// longer match.
pub struct MaskingPurifier {
    mask: String,
    state: RwLock<Dictionary>,
    purify_calls: AtomicUsize,
}

#[derive(Default)]
struct Dictionary {
    words: Vec<String>,
    pattern: Option<Regex>,
}

impl Dictionary {
    fn rebuild(&mut self) {
        let mut words: Vec<&String> = self.words.iter().filter(|w| !w.is_empty()).collect();
        if words.is_empty() {
            self.pattern = None;
            return;
        }
        words.sort_by(|a, b| b.len().cmp(&a.len()));

        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");

        self.pattern = match RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                app_log!(
                    LogLevel::Error,
                    "purity",
                    "Failed to compile sensitive word pattern: {}",
                    e
                );
                None
            }
        };
    }
}

impl MaskingPurifier {
    /// Create a purifier with an empty dictionary and the default mask
    pub fn new() -> Self {
        Self::with_mask(DEFAULT_MASK)
    }

    /// Create a purifier that replaces sensitive words with `mask`
    pub fn with_mask(mask: impl Into<String>) -> Self {
        Self {
            mask: mask.into(),
            state: RwLock::new(Dictionary::default()),
            purify_calls: AtomicUsize::new(0),
        }
    }

    /// Registered words in registration order
    pub fn words(&self) -> Vec<String> {
        match self.state.read() {
            Ok(state) => state.words.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Number of `purify` calls served
    pub fn purify_calls(&self) -> usize {
        self.purify_calls.load(Ordering::SeqCst)
    }
}

impl Default for MaskingPurifier {
    fn default() -> Self {
        Self::new()
    }
}

impl WordPurityService for MaskingPurifier {
    fn register_words(&self, words: &[String]) {
        let Ok(mut state) = self.state.write() else {
            app_log!(LogLevel::Error, "purity", "Dictionary lock poisoned, words dropped");
            return;
        };
        for word in words {
            if !state.words.contains(word) {
                state.words.push(word.clone());
            }
        }
        state.rebuild();
    }

    fn purify(&self, text: &str) -> String {
        self.purify_calls.fetch_add(1, Ordering::SeqCst);

        let Ok(state) = self.state.read() else {
            return text.to_string();
        };
        match &state.pattern {
            Some(pattern) => pattern
                .replace_all(text, NoExpand(self.mask.as_str()))
                .into_owned(),
            None => text.to_string(),
        }
    }
}
