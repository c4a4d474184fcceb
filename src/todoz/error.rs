use std::fmt;
use thiserror::Error;

/// A single reason a draft or patch was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    TitleTooLong { len: usize, max: usize },
    DescriptionTooLong { len: usize, max: usize },
    CategoryTooLong { len: usize, max: usize },
    InvalidPriority(String),
    NegativeDueDate(i64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "title cannot be empty"),
            ValidationError::TitleTooLong { len, max } => {
                write!(f, "title is {} characters, the limit is {}", len, max)
            }
            ValidationError::DescriptionTooLong { len, max } => {
                write!(f, "description is {} characters, the limit is {}", len, max)
            }
            ValidationError::CategoryTooLong { len, max } => {
                write!(f, "category is {} characters, the limit is {}", len, max)
            }
            ValidationError::InvalidPriority(p) => write!(f, "invalid priority: {}", p),
            ValidationError::NegativeDueDate(ms) => write!(f, "invalid due date: {}", ms),
        }
    }
}

/// Every problem found in one input, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn contains(&self, err: &ValidationError) -> bool {
        self.0.contains(err)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum TodozError {
    #[error("Invalid task: {0}")]
    Validation(ValidationErrors),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl From<ValidationErrors> for TodozError {
    fn from(errors: ValidationErrors) -> Self {
        TodozError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, TodozError>;
