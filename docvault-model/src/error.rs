use std::fmt::{self, Display};

/// A catalog row that cannot describe a real document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidRecord(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidRecord(msg) => write!(f, "invalid catalog record: {msg}"),
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
