use serde::{Deserialize, Serialize};

/// Position of a stage in the standard pipeline
///
/// Used as the re-entry point for [`Pipeline::update_result`](super::Pipeline::update_result):
/// changing the configuration of a stage means re-running from that stage on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateType {
    Data = 0,
    Purity = 1,
    Filter = 2,
    Sort = 3,
    Display = 4,
}

impl UpdateType {
    /// All positions in execution order
    pub const ALL: [UpdateType; 5] = [
        UpdateType::Data,
        UpdateType::Purity,
        UpdateType::Filter,
        UpdateType::Sort,
        UpdateType::Display,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl From<UpdateType> for usize {
    fn from(update: UpdateType) -> Self {
        update.index()
    }
}
