use thiserror::Error;

/// Validation errors raised while building domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("unknown sector label '{value}'")]
    UnknownSector { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
}

/// Top-level error type for operations that escape the snapshot builder.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("snapshot file error: {0}")]
    Io(#[from] std::io::Error),
}
