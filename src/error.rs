//! Error types for expert resolution, answering, and refinement.

use thiserror::Error;

/// Categorized failures of the expert pipeline.
///
/// Every variant is recoverable: the session boundary turns it into a
/// user-visible message and an empty result instead of aborting.
#[derive(Error, Debug)]
pub enum ExpertError {
    /// No API key for the generation backend
    #[error("Missing API key: {env_var} not found in environment or {env_file}")]
    Credential { env_var: String, env_file: String },

    /// Backend call failed (network, status, malformed body)
    #[error("Completion request failed: {0}")]
    Upstream(String),

    /// Persona store exists but cannot be parsed
    #[error("Failed to read the experts file {path}: {message}")]
    CorruptStore { path: String, message: String },

    /// Explicit selection is not in the store
    #[error("Selected expert '{0}' was not found in the experts file")]
    UnknownExpert(String),

    /// Auto-select reply had no `<title>. <description>` shape
    #[error("Could not extract an expert title from the reply: {0:?}")]
    MalformedPersonaResponse(String),

    /// Writing the persona store failed
    #[error("Failed to save expert: {0}")]
    Persistence(String),

    /// Refine was triggered before any answer was fetched
    #[error("Please fetch an answer before refining")]
    NoPriorAnswer,
}

impl ExpertError {
    /// Creates an Upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Local validation problems are shown as warnings rather than errors
    pub fn is_warning(&self) -> bool {
        matches!(self, ExpertError::NoPriorAnswer | ExpertError::CorruptStore { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExpertError>;
