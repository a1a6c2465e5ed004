//! Error types for Marga

use thiserror::Error;

/// Marga error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MargaError {
    #[error("Breadcrumb trail is empty")]
    EmptyTrail,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read config: {0}")]
    ConfigIo(String),

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("No pose estimate available")]
    MissingPose,

    #[error("Cannot {action} while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },
}

impl From<std::io::Error> for MargaError {
    fn from(e: std::io::Error) -> Self {
        MargaError::ConfigIo(e.to_string())
    }
}

impl From<serde_yaml::Error> for MargaError {
    fn from(e: serde_yaml::Error) -> Self {
        MargaError::ConfigParse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MargaError>;
