use std::fmt;

/// Errors originating from the persistence layer.
#[derive(Debug)]
pub enum StoreError {
    Db(String),
    Serde(String),
    Internal,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(msg) => write!(f, "Database error: {msg}"),
            StoreError::Serde(msg) => write!(f, "Serialization error: {msg}"),
            StoreError::Internal => write!(f, "Internal error"),
        }
    }
}

impl std::error::Error for StoreError {}
