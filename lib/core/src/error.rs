use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog is empty: no rows survived ingestion")]
    EmptyCatalog,

    #[error("Catalog too small: {items} items cannot form {groups} groups")]
    TooFewItems { items: usize, groups: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate item id: {0}")]
    DuplicateId(u64),

    #[error("Label count mismatch: expected {expected}, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },

    #[error("Group label {label} out of range for {groups} groups")]
    LabelOutOfRange { label: usize, groups: usize },

    #[error("Catalog already carries group labels")]
    AlreadyLabeled,

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
