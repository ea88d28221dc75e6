//! Core Agent trait definition

use crate::{Context, Inputs, Result};
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// An agent receives a fully composed task prompt and returns its final
/// answer as text. Crew inputs and task metadata travel in the [`Context`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name (the key it was declared under)
    fn name(&self) -> &str;

    /// Human readable role, defaults to the name
    fn role(&self) -> &str {
        self.name()
    }

    /// Check that `inputs` cover every placeholder the agent uses
    ///
    /// Called by the crew before any task runs.
    fn validate_inputs(&self, _inputs: &Inputs) -> Result<()> {
        Ok(())
    }
}
