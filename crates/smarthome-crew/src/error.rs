//! Error types for crew assembly and execution

use std::path::PathBuf;
use thiserror::Error;

/// Result type for crew operations
pub type Result<T> = std::result::Result<T, CrewError>;

/// Errors raised while loading configuration, assembling or running a crew
#[derive(Error, Debug)]
pub enum CrewError {
    /// A requested agent or task key is absent from the loaded mapping
    #[error("Key '{key}' not found in {section} configuration")]
    MissingConfigKey {
        /// `agents` or `tasks`
        section: &'static str,
        /// The key that was looked up
        key: String,
    },

    /// A configuration file could not be read
    #[error("Failed to read configuration file {}", path.display())]
    ConfigLoad {
        /// File that was read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A configuration document is not valid YAML of the expected shape
    #[error("Invalid {section} configuration")]
    Yaml {
        /// `agents` or `tasks`
        section: &'static str,
        /// Underlying parse error
        #[source]
        source: serde_yaml::Error,
    },

    /// A task output file could not be written
    #[error("Failed to write {}", path.display())]
    Io {
        /// File that was written
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A task output file would land outside the output directory
    #[error("Task '{task}' output file '{path}' must be a relative path inside the output directory")]
    InvalidOutputPath {
        /// Task name
        task: String,
        /// Output file as given or rendered
        path: String,
    },

    /// A task has neither an agent nor an agent key
    #[error("Task '{0}' has no agent assigned")]
    NoAgentForTask(String),

    /// A task names an agent that is not part of the crew
    #[error("Task '{task}' refers to unknown agent '{agent}'")]
    UnknownAgent {
        /// Task name
        task: String,
        /// Agent key from the task
        agent: String,
    },

    /// A task lists a context task that does not run before it
    #[error("Task '{task}' uses context from '{context}', which is not an earlier task")]
    UnknownContextTask {
        /// Task name
        task: String,
        /// Referenced context task
        context: String,
    },

    /// The requested process is not available
    #[error("Process '{0}' is not supported")]
    UnsupportedProcess(String),

    /// The crew has no tasks
    #[error("Crew has no tasks")]
    EmptyCrew,

    /// An agent or interpolation failure
    #[error(transparent)]
    Agent(#[from] smarthome_core::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_cause_is_not_repeated_in_message() {
        let err = CrewError::ConfigLoad {
            path: PathBuf::from("config/agents.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read configuration file config/agents.yaml"
        );
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("No such file"));

        let err = CrewError::Io {
            path: PathBuf::from("out/first_report.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write out/first_report.md");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_yaml_error_keeps_parse_cause_as_source() {
        let source = serde_yaml::from_str::<std::collections::BTreeMap<String, String>>("[")
            .unwrap_err();
        let err = CrewError::Yaml {
            section: "tasks",
            source,
        };
        assert_eq!(err.to_string(), "Invalid tasks configuration");
        assert!(err.source().is_some());
    }
}
