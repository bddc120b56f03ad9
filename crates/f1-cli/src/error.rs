//! Error types for f1tel

use openracing_f1_codec::CodecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Decode failed")]
    Decode(#[source] CodecError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Decode(_) => 2,
            CliError::InvalidConfiguration(_) => 1,
        }
    }
}
