use crate::catalog::BookRecord;
use crate::error::{BookshelfError, BookshelfResult};
use crate::pipeline::BookStage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// A range bound as supplied by a caller: a number or its text form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeBound {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A bound after numeric coercion
enum Coerced {
    Whole(i64),
    Fraction,
    Unparsable,
}

impl RangeBound {
    fn coerce(&self) -> Coerced {
        match self {
            RangeBound::Int(value) => Coerced::Whole(*value),
            RangeBound::Float(value) => Self::coerce_float(*value),
            RangeBound::Text(text) => {
                let text = text.trim();
                if let Ok(value) = text.parse::<i64>() {
                    return Coerced::Whole(value);
                }
                match text.parse::<f64>() {
                    Ok(value) if value.is_finite() => Self::coerce_float(value),
                    _ => Coerced::Unparsable,
                }
            }
        }
    }

    fn coerce_float(value: f64) -> Coerced {
        if value.is_finite() && value.fract() == 0.0 {
            Coerced::Whole(value as i64)
        } else {
            Coerced::Fraction
        }
    }
}

impl From<i64> for RangeBound {
    fn from(value: i64) -> Self {
        RangeBound::Int(value)
    }
}

impl From<i32> for RangeBound {
    fn from(value: i32) -> Self {
        RangeBound::Int(i64::from(value))
    }
}

impl From<u32> for RangeBound {
    fn from(value: u32) -> Self {
        RangeBound::Int(i64::from(value))
    }
}

impl From<usize> for RangeBound {
    fn from(value: usize) -> Self {
        RangeBound::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for RangeBound {
    fn from(value: f64) -> Self {
        RangeBound::Float(value)
    }
}

impl From<&str> for RangeBound {
    fn from(value: &str) -> Self {
        RangeBound::Text(value.to_string())
    }
}

impl From<String> for RangeBound {
    fn from(value: String) -> Self {
        RangeBound::Text(value)
    }
}

/// 1-indexed inclusive window, `1 <= start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeWindow {
    start: usize,
    end: usize,
}

impl RangeWindow {
    /// Validate and build a window
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// fractional number, unparsable text, `start < 1`, `end < start`.
    pub fn new(start: impl Into<RangeBound>, end: impl Into<RangeBound>) -> BookshelfResult<Self> {
        let (start, end) = (start.into().coerce(), end.into().coerce());

        if matches!(start, Coerced::Fraction) || matches!(end, Coerced::Fraction) {
            return Err(BookshelfError::InvalidFloatInput);
        }
        let (start, end) = match (start, end) {
            (Coerced::Whole(start), Coerced::Whole(end)) => (start, end),
            _ => return Err(BookshelfError::InvalidStringInput),
        };
        if start < 1 {
            return Err(BookshelfError::RangeStartTooSmall);
        }
        if end < start {
            return Err(BookshelfError::RangeEndBeforeStart);
        }

        let to_usize = |value: i64| usize::try_from(value).unwrap_or(usize::MAX);
        Ok(Self {
            start: to_usize(start),
            end: to_usize(end),
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The part of `items` inside the window
    ///
    /// Empty when `start` is past the end; truncated when `end` is.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.start > items.len() {
            return &[];
        }
        &items[self.start - 1..self.end.min(items.len())]
    }
}

/// Stage that cuts the display page out of its input
///
/// Passes its input through unchanged until a window is set.
#[derive(Debug, Default)]
pub struct RangeStage {
    window: Option<RangeWindow>,
    items: Vec<BookRecord>,
}

impl RangeStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window from integers, floats or numeric strings
    ///
    /// # Errors
    /// - `InvalidFloatInput` if either bound has a fractional part
    /// - `InvalidStringInput` if either bound is text that is not a number
    /// - `RangeStartTooSmall` if start is below 1
    /// - `RangeEndBeforeStart` if end is below start
    ///
    /// The previous window is kept on error.
    pub fn set_range(
        &mut self,
        start: impl Into<RangeBound>,
        end: impl Into<RangeBound>,
    ) -> BookshelfResult<()> {
        self.window = Some(RangeWindow::new(start, end)?);
        Ok(())
    }

    pub fn window(&self) -> Option<RangeWindow> {
        self.window
    }

    pub fn start_range(&self) -> Option<usize> {
        self.window.map(|w| w.start())
    }

    pub fn end_range(&self) -> Option<usize> {
        self.window.map(|w| w.end())
    }
}

#[async_trait]
impl BookStage for RangeStage {
    async fn process(&mut self, input: Vec<BookRecord>) {
        self.items = match self.window {
            Some(window) => window.slice(&input).to_vec(),
            None => input,
        };
    }

    fn items(&self) -> &[BookRecord] {
        &self.items
    }

    fn update_message(&self) -> &str {
        "Display range applied"
    }

    fn name(&self) -> &str {
        "Display Range"
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

    #[test]
    fn test_valid_range() {
        let mut stage = RangeStage::new();
        stage.set_range(2, 5).unwrap();

        assert_eq!(stage.start_range(), Some(2));
        assert_eq!(stage.end_range(), Some(5));
    }

    #[test]
    fn test_string_bounds_are_converted() {
        let mut stage = RangeStage::new();
        stage.set_range("3", "6").unwrap();

        assert_eq!(stage.start_range(), Some(3));
        assert_eq!(stage.end_range(), Some(6));
    }

    #[test]
    fn test_whole_floats_accepted() {
        let mut stage = RangeStage::new();
        stage.set_range(2.0, "4.0").unwrap();
        assert_eq!(stage.window().map(|w| (w.start(), w.end())), Some((2, 4)));
    }

    #[test]
    fn test_start_below_one_rejected() {
        let mut stage = RangeStage::new();
        for start in [-1, 0] {
            let err = stage.set_range(start, 5).unwrap_err();
            assert_eq!(err.to_string(), "Cannot be less than 0");
        }
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut stage = RangeStage::new();
        let err = stage.set_range(5, 2).unwrap_err();
        assert_eq!(err.to_string(), "End Range cannot be less than Start Range");
    }

    #[test]
    fn test_fractional_bounds_rejected() {
        let mut stage = RangeStage::new();
        assert!(matches!(
            stage.set_range(1.5, 5),
            Err(BookshelfError::InvalidFloatInput)
        ));
        assert!(matches!(
            stage.set_range(1, 5.7),
            Err(BookshelfError::InvalidFloatInput)
        ));
        assert!(matches!(
            stage.set_range("2.5", 5),
            Err(BookshelfError::InvalidFloatInput)
        ));
    }

    #[test]
    fn test_unparsable_strings_rejected() {
        let mut stage = RangeStage::new();
        assert!(matches!(
            stage.set_range("abc", 5),
            Err(BookshelfError::InvalidStringInput)
        ));
        assert!(matches!(
            stage.set_range(1, "xyz"),
            Err(BookshelfError::InvalidStringInput)
        ));
        assert!(matches!(
            stage.set_range("", 5),
            Err(BookshelfError::InvalidStringInput)
        ));
    }

    #[test]
    fn test_float_check_runs_before_string_check() {
        let mut stage = RangeStage::new();
        assert!(matches!(
            stage.set_range("abc", 1.5),
            Err(BookshelfError::InvalidFloatInput)
        ));
    }

    #[test]
    fn test_string_check_runs_before_bounds_check() {
        let mut stage = RangeStage::new();
        assert!(matches!(
            stage.set_range(0, "abc"),
            Err(BookshelfError::InvalidStringInput)
        ));
    }

    #[test]
    fn test_failed_set_keeps_previous_window() {
        let mut stage = RangeStage::new();
        stage.set_range(2, 4).unwrap();
        assert!(stage.set_range(4, 2).is_err());

        assert_eq!(stage.start_range(), Some(2));
        assert_eq!(stage.end_range(), Some(4));
    }

    #[tokio::test]
    async fn test_slices_window() {
        let mut stage = RangeStage::new();
        stage.set_range(2, 4).unwrap();
        stage.process(sample_books()).await;

        assert_eq!(
            titles(stage.items()),
            vec!["Game of Thrones I", "Bone of fire", "To Kill a Mockingbird"]
        );
    }

    #[tokio::test]
    async fn test_window_past_end_is_empty() {
        let mut stage = RangeStage::new();
        stage.set_range(20, 30).unwrap();
        stage.process(sample_books()).await;

        assert!(stage.items().is_empty());
    }

    #[tokio::test]
    async fn test_full_window() {
        let mut stage = RangeStage::new();
        stage.set_range(1, 8).unwrap();
        stage.process(sample_books()).await;

        assert_eq!(stage.items().len(), 8);
    }

    #[tokio::test]
    async fn test_unset_window_passes_through() {
        let mut stage = RangeStage::new();
        stage.process(sample_books()).await;

        assert_eq!(stage.items(), sample_books().as_slice());
    }

    #[test]
    fn test_slice_length_for_every_window() {
        let items: Vec<usize> = (1..=6).collect();
        for start in 1..=9usize {
            for end in start..=9usize {
                let window = RangeWindow::new(start, end).unwrap();
                let slice = window.slice(&items);

                let expected = (end.min(items.len()) + 1).saturating_sub(start);
                assert_eq!(slice.len(), expected, "window {}..={}", start, end);
                if let Some(first) = slice.first() {
                    assert_eq!(*first, start);
                }
            }
        }
    }

    #[test]
    fn test_bounds_deserialize_from_json() {
        let bounds: Vec<RangeBound> = serde_json::from_str(r#"[3, 1.5, "7"]"#).unwrap();
        assert_eq!(
            bounds,
            vec![
                RangeBound::Int(3),
                RangeBound::Float(1.5),
                RangeBound::Text("7".to_string())
            ]
        );
    }
}
