//! Sensitive-word dictionary service contract
//!
//! [`PurityStage`](crate::pipeline::stages::PurityStage) registers its word list
//! with a [`WordPurityService`] and runs every title through
//! [`purify`](WordPurityService::purify).

pub mod masking;

pub use masking::MaskingPurifier;

/// Contract for the external word-purity service
pub trait WordPurityService: Send + Sync {
    /// Add words to the sensitive dictionary
    fn register_words(&self, words: &[String]);

    /// Replace every sensitive substring in `text`
    ///
    /// Must be deterministic for a given dictionary.
    fn purify(&self, text: &str) -> String;
}
