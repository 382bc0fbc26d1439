use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionButtonError {
    #[error("Item source not found")]
    MissingItemSource,
    #[error("Item {index} out of range ({count} items)")]
    ItemOutOfRange { index: usize, count: usize },
}
