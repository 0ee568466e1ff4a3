use ibexsnap_core::{CoreError, HttpError, ValidationError};
use thiserror::Error;

/// Failures that end the process with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Transport(#[from] HttpError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl From<ValidationError> for CliError {
    fn from(error: ValidationError) -> Self {
        Self::Core(CoreError::from(error))
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(CoreError::Validation(_)) => 2,
            Self::Transport(_) => 1,
            Self::Core(CoreError::Serialization(_)) => 4,
            Self::Core(CoreError::Io(_)) => 10,
            Self::Logging(_) => 1,
        }
    }
}
