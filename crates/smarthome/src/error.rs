//! Error types for the smarthome crew

use thiserror::Error;

/// Smarthome specific errors
#[derive(Debug, Error)]
pub enum SmarthomeError {
    /// LLM endpoint configuration or request failure
    #[error("LLM error: {0}")]
    Llm(#[from] smarthome_llm::LLMError),

    /// Configuration loading or crew assembly failure
    #[error(transparent)]
    Crew(#[from] smarthome_crew::CrewError),

    /// Agent construction failure
    #[error(transparent)]
    Agent(#[from] smarthome_core::Error),

    /// Web search failure
    #[error("Search error: {0}")]
    Search(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Result type alias for smarthome operations
pub type Result<T> = std::result::Result<T, SmarthomeError>;

/// Tool failures surface to the executor as processing errors
impl From<SmarthomeError> for smarthome_core::Error {
    fn from(err: SmarthomeError) -> Self {
        match err {
            SmarthomeError::Agent(inner) => inner,
            other => smarthome_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}
