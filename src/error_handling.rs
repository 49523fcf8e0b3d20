use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Please enter the math problem in this format: (number operator number)")]
    malformed_input,

    #[error("Invalid number format '{0}'")]
    invalid_number(String),

    #[error("Can't divide by zero.")]
    division_by_zero,

    #[error("Unknown operator '{0}'")]
    unknown_operator(String),

    #[error("could not update history file '{}': {source}", path.display())]
    storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CalcError {
    pub fn storage_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CalcError::storage {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
