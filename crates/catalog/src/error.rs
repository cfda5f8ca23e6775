use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("browser storage unavailable")]
    Unavailable,
    #[error("stored collection is corrupt: {0}")]
    Corrupt(String),
    #[error("storage error: {0}")]
    Io(String),
}

/// A favorite already exists within the proximity threshold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a favorite already exists near this point ({existing_name})")]
pub struct DuplicateError {
    pub existing_id: String,
    pub existing_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
