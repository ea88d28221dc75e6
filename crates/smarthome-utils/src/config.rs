//! Project path configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name of the agent definitions
pub const DEFAULT_AGENTS_FILE: &str = "agents.yaml";
/// Default file name of the task definitions
pub const DEFAULT_TASKS_FILE: &str = "tasks.yaml";

/// Where a crew project keeps its configuration and writes its outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name, used in log output
    pub name: String,
    /// Directory holding the YAML definitions
    pub config_dir: PathBuf,
    /// Agent definitions, relative to `config_dir`
    pub agents_file: String,
    /// Task definitions, relative to `config_dir`
    pub tasks_file: String,
    /// Base directory for task output files
    pub output_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "smarthome".to_string(),
            config_dir: PathBuf::from("config"),
            agents_file: DEFAULT_AGENTS_FILE.to_string(),
            tasks_file: DEFAULT_TASKS_FILE.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ProjectConfig {
    /// Create a config rooted at the given configuration directory
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            ..Self::default()
        }
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Full path of the agent definitions
    pub fn agents_path(&self) -> PathBuf {
        self.config_dir.join(&self.agents_file)
    }

    /// Full path of the task definitions
    pub fn tasks_path(&self) -> PathBuf {
        self.config_dir.join(&self.tasks_file)
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = ProjectConfig::default();
        assert_eq!(config.agents_path(), PathBuf::from("config/agents.yaml"));
        assert_eq!(config.tasks_path(), PathBuf::from("config/tasks.yaml"));
        assert_eq!(config.output_dir(), Path::new("."));
    }

    #[test]
    fn test_custom_config_dir() {
        let config = ProjectConfig::new("/etc/crew").with_output_dir("/tmp/out");
        assert_eq!(config.agents_path(), PathBuf::from("/etc/crew/agents.yaml"));
        assert_eq!(config.tasks_path(), PathBuf::from("/etc/crew/tasks.yaml"));
        assert_eq!(config.output_dir(), Path::new("/tmp/out"));
        assert_eq!(config.name, "smarthome");
    }
}
