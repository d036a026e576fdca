use thiserror::Error;

/// Main error type for naturaldocs operations
#[derive(Error, Debug)]
pub enum NaturalDocsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Line {line} is out of range (buffer has {total} lines)")]
    LineOutOfRange { line: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, NaturalDocsError>;
