//! services/console/src/error.rs
//!
//! Defines the primary error type for the console service.

use crate::app::command::CommandError;
use crate::config::ConfigError;
use catalog_core::{FormError, ModalMode, PortError};

/// The primary error type for the `console` service.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A form edit or submission was rejected before anything was sent.
    #[error("Form Error: {0}")]
    Form(#[from] FormError),

    /// A console line could not be understood.
    #[error("Command Error: {0}")]
    Command(#[from] CommandError),

    #[error("Please sign in first")]
    NotSignedIn,

    #[error("There is no product in row {0}")]
    NoSuchRow(usize),

    #[error("Products cannot be saved in {0} mode")]
    InvalidMode(ModalMode),

    /// Represents an error building the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., reading the terminal).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// The text shown in a notice, without the internal category prefix.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Port(e) => e.user_message(),
            ConsoleError::Form(e) => e.to_string(),
            ConsoleError::Command(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}
