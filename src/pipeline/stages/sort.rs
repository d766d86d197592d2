use crate::catalog::BookRecord;
use crate::error::{BookshelfError, BookshelfResult};
use crate::pipeline::BookStage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::str::FromStr;

/// Title ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    Asc,
    Desc,
}

impl SortType {
    pub const ASC: &'static str = "ASC";
    pub const DESC: &'static str = "DESC";

    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Asc => Self::ASC,
            SortType::Desc => Self::DESC,
        }
    }
}

impl FromStr for SortType {
    type Err = BookshelfError;

    /// Only the exact literals `ASC` and `DESC` are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ASC => Ok(SortType::Asc),
            Self::DESC => Ok(SortType::Desc),
            other => Err(BookshelfError::InvalidSortType(other.to_string())),
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage that orders books by title
///
/// Comparison is byte-wise on the title and the sort is stable, so books
/// with equal titles keep their input order. Until a sort type is set the
/// input order is kept as-is.
#[derive(Debug, Default)]
pub struct SortStage {
    sort_type: Option<SortType>,
    items: Vec<BookRecord>,
}

impl SortStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the order from its literal name
    ///
    /// # Errors
    /// `BookshelfError::InvalidSortType` for anything but `ASC` or `DESC`;
    /// the previous order is kept
    pub fn set_sort_type(&mut self, sort_type: &str) -> BookshelfResult<()> {
        self.sort_type = Some(sort_type.parse()?);
        Ok(())
    }

    pub fn set_sort_order(&mut self, sort_type: SortType) {
        self.sort_type = Some(sort_type);
    }

    pub fn sort_type(&self) -> Option<SortType> {
        self.sort_type
    }
}

#[async_trait]
impl BookStage for SortStage {
    async fn process(&mut self, mut input: Vec<BookRecord>) {
        match self.sort_type {
            Some(SortType::Asc) => input.sort_by(|a, b| a.title.cmp(&b.title)),
            Some(SortType::Desc) => input.sort_by(|a, b| b.title.cmp(&a.title)),
            None => {}
        }
        self.items = input;
    }

    fn items(&self) -> &[BookRecord] {
        &self.items
    }

    fn update_message(&self) -> &str {
        "Books sorted by title"
    }

    fn name(&self) -> &str {
        "Sort"
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
    use crate::pipeline::stages::test_support::titles;

    #[tokio::test]
    async fn test_sorts_ascending() {
        let mut stage = SortStage::new();
        stage.set_sort_type(SortType::ASC).unwrap();
        stage.process(sample_books()).await;

        assert_eq!(
            titles(stage.items()),
            vec![
                "Alice Adventures in Wonderland",
                "Bone of fire",
                "Emma Story",
                "Game of Thrones I",
                "Game of Thrones II",
                "One Thousand and One Nights",
                "The Lord of The Rings",
                "To Kill a Mockingbird"
            ]
        );
    }

    #[tokio::test]
    async fn test_sorts_descending() {
        let mut stage = SortStage::new();
        stage.set_sort_type(SortType::DESC).unwrap();
        stage.process(sample_books()).await;

        assert_eq!(
            titles(stage.items()),
            vec![
                "To Kill a Mockingbird",
                "The Lord of The Rings",
                "One Thousand and One Nights",
                "Game of Thrones II",
                "Game of Thrones I",
                "Emma Story",
                "Bone of fire",
                "Alice Adventures in Wonderland"
            ]
        );
    }

    #[test]
    fn test_invalid_sort_type_keeps_previous() {
        let mut stage = SortStage::new();
        let err = stage.set_sort_type("INVALID").unwrap_err();
        assert!(err.to_string().contains("must be ASC or DESC"));
        assert_eq!(stage.sort_type(), None);

        stage.set_sort_type("DESC").unwrap();
        assert!(stage.set_sort_type("asc").is_err());
        assert_eq!(stage.sort_type(), Some(SortType::Desc));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut stage = SortStage::new();
        stage.set_sort_order(SortType::Asc);
        stage.process(Vec::new()).await;

        assert!(stage.items().is_empty());
    }

    #[tokio::test]
    async fn test_unset_keeps_input_order() {
        let mut stage = SortStage::new();
        stage.process(sample_books()).await;

        assert_eq!(stage.items(), sample_books().as_slice());
    }

    #[tokio::test]
    async fn test_equal_titles_keep_input_order() {
        let books = vec![
            BookRecord::new("2", "Same", "Second"),
            BookRecord::new("1", "Same", "First"),
            BookRecord::new("0", "Another", "Zero"),
        ];

        let mut stage = SortStage::new();
        stage.set_sort_order(SortType::Asc);
        stage.process(books.clone()).await;
        let isbns: Vec<&str> = stage.items().iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["0", "2", "1"]);

        stage.set_sort_order(SortType::Desc);
        stage.process(books).await;
        let isbns: Vec<&str> = stage.items().iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["2", "1", "0"]);
    }

    #[tokio::test]
    async fn test_repeated_sort_is_idempotent_and_desc_reverses_asc() {
        let mut stage = SortStage::new();
        stage.set_sort_order(SortType::Asc);
        stage.process(sample_books()).await;
        let ascending = stage.items().to_vec();

        stage.process(ascending.clone()).await;
        assert_eq!(stage.items(), ascending.as_slice());

        stage.set_sort_order(SortType::Desc);
        stage.process(ascending.clone()).await;
        let mut reversed = ascending;
        reversed.reverse();
        assert_eq!(stage.items(), reversed.as_slice());
    }

    #[test]
    fn test_sort_type_display_and_parse() {
        assert_eq!(SortType::Asc.to_string(), "ASC");
        assert_eq!("DESC".parse::<SortType>().unwrap(), SortType::Desc);
        assert_eq!(serde_json::to_string(&SortType::Desc).unwrap(), "\"DESC\"");
    }
}
