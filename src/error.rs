//! Error taxonomy shared by the engine, the artifact loader and the CLI.
//!
//! Every failure carries a machine-readable kind plus a human-readable message.
//! Hosts map [`ErrorClass`] onto their own status codes; the `mmm` binary uses
//! [`AppError::exit_code`].

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    #[error("model artifact not found at '{}'", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("failed to load model artifact: {0}")]
    ModelLoad(String),

    #[error("posterior parameter '{0}' not found")]
    ParameterNotFound(String),

    #[error("computation failed: {0}")]
    Compute(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("i/o failure: {0}")]
    Io(String),
}

/// Coarse failure class, used by hosts to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    NotFound,
    Unauthorized,
    InvalidInput,
    Internal,
}

/// Structured error payload (`{ "kind": ..., "message": ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl AppError {
    pub fn load(message: impl Into<String>) -> Self {
        Self::ModelLoad(message.into())
    }

    pub fn compute(message: impl Into<String>) -> Self {
        Self::Compute(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelNotFound { .. } => "ModelNotFound",
            Self::ModelLoad(_) => "ModelLoadError",
            Self::ParameterNotFound(_) => "ParameterNotFound",
            Self::Compute(_) => "ComputeError",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ModelNotFound { .. } => ErrorClass::NotFound,
            Self::Unauthorized(_) => ErrorClass::Unauthorized,
            Self::Config(_) => ErrorClass::InvalidInput,
            Self::ModelLoad(_) | Self::ParameterNotFound(_) | Self::Compute(_) | Self::Io(_) => {
                ErrorClass::Internal
            }
        }
    }

    /// Process exit code for the `mmm` binary.
    pub fn exit_code(&self) -> u8 {
        match self.class() {
            ErrorClass::InvalidInput => 2,
            ErrorClass::NotFound => 3,
            ErrorClass::Internal => 4,
            ErrorClass::Unauthorized => 5,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}
