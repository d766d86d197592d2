use serde::{Deserialize, Serialize};

/// A single book flowing through the pipeline
///
/// Records are produced by the data source and never have their ISBN
/// rewritten by later stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub title: String,
    pub author: String,
}

impl BookRecord {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
        }
    }

    /// Copy of this record with a different title
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            isbn: self.isbn.clone(),
            title: title.into(),
            author: self.author.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn_serialized_uppercase() {
        let record = BookRecord::new("123-45-67890-12-3", "Emma Story", "Henry James");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["ISBN"], "123-45-67890-12-3");
        assert_eq!(json["title"], "Emma Story");
        assert!(json.get("isbn").is_none());
    }

    #[test]
    fn test_with_title_keeps_isbn_and_author() {
        let record = BookRecord::new("1", "Alice Adventures in Wonderland", "Stephenie Meyer");
        let renamed = record.with_title("Alice Adventures in ***");

        assert_eq!(renamed.isbn, record.isbn);
        assert_eq!(renamed.author, record.author);
        assert_eq!(renamed.title, "Alice Adventures in ***");
    }
}
