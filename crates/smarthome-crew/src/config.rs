//! YAML agent and task definitions
//!
//! Both files are mappings from a key to an entry:
//!
//! ```yaml
//! researcher:
//!   role: >
//!     {topic} Senior Data Researcher
//!   goal: ...
//!   backstory: ...
//! ```

use crate::{CrewError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Entry kind stored in a [`ConfigMap`]
pub trait ConfigEntry: DeserializeOwned {
    /// Section name used in error messages
    const SECTION: &'static str;
}

/// One agent from `agents.yaml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentConfig {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub allow_delegation: Option<bool>,
    #[serde(default)]
    pub max_iter: Option<usize>,
}

impl ConfigEntry for AgentConfig {
    const SECTION: &'static str = "agents";
}

/// One task from `tasks.yaml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskConfig {
    pub description: String,
    pub expected_output: String,
    /// Key of the agent that performs the task
    #[serde(default)]
    pub agent: Option<String>,
    /// File the output is written to, relative to the output directory
    #[serde(default)]
    pub output_file: Option<String>,
    /// Earlier tasks whose output is passed as context
    #[serde(default)]
    pub context: Option<Vec<String>>,
}

impl ConfigEntry for TaskConfig {
    const SECTION: &'static str = "tasks";
}

/// Key → entry mapping loaded from one YAML file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMap<T> {
    entries: BTreeMap<String, T>,
}

/// Contents of `agents.yaml`
pub type AgentsConfig = ConfigMap<AgentConfig>;

/// Contents of `tasks.yaml`
pub type TasksConfig = ConfigMap<TaskConfig>;

impl<T: ConfigEntry> ConfigMap<T> {
    /// Read and parse a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CrewError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        debug!(
            section = T::SECTION,
            path = %path.display(),
            entries = config.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse a YAML document
    ///
    /// An empty document yields an empty mapping.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let entries: Option<BTreeMap<String, T>> =
            serde_yaml::from_str(text).map_err(|source| CrewError::Yaml {
                section: T::SECTION,
                source,
            })?;
        Ok(Self {
            entries: entries.unwrap_or_default(),
        })
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Result<&T> {
        self.entries
            .get(key)
            .ok_or_else(|| CrewError::MissingConfigKey {
                section: T::SECTION,
                key: key.to_string(),
            })
    }

    /// All keys, sorted
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const AGENTS: &str = r"
researcher:
  role: >
    {topic} Senior Data Researcher
  goal: >
    Uncover cutting-edge developments in {topic}
  backstory: >
    You're a seasoned researcher.
reporting_analyst:
  role: Reporting Analyst
  goal: Create detailed reports
  backstory: You're a meticulous analyst.
  allow_delegation: true
";

    const TASKS: &str = r"
research_task:
  description: Research {topic}
  expected_output: A list with 10 bullet points
  agent: researcher
reporting_task:
  description: Review the context
  expected_output: A full report
  agent: reporting_analyst
  output_file: first_report.md
";

    #[test]
    fn test_parse_agents() {
        let agents = AgentsConfig::from_yaml_str(AGENTS).unwrap();
        assert_eq!(agents.len(), 2);

        let researcher = agents.get("researcher").unwrap();
        assert_eq!(researcher.role.trim(), "{topic} Senior Data Researcher");
        assert_eq!(researcher.allow_delegation, None);

        let analyst = agents.get("reporting_analyst").unwrap();
        assert_eq!(analyst.allow_delegation, Some(true));
    }

    #[test]
    fn test_parse_tasks() {
        let tasks = TasksConfig::from_yaml_str(TASKS).unwrap();
        assert_eq!(
            tasks.keys().collect::<Vec<_>>(),
            vec!["reporting_task", "research_task"]
        );

        let reporting = tasks.get("reporting_task").unwrap();
        assert_eq!(reporting.agent.as_deref(), Some("reporting_analyst"));
        assert_eq!(reporting.output_file.as_deref(), Some("first_report.md"));
        assert!(reporting.context.is_none());
    }

    #[test]
    fn test_missing_key() {
        let agents = AgentsConfig::from_yaml_str(AGENTS).unwrap();
        let err = agents.get("manager").unwrap_err();
        assert!(matches!(
            err,
            CrewError::MissingConfigKey { section: "agents", ref key } if key == "manager"
        ));
        assert_eq!(
            err.to_string(),
            "Key 'manager' not found in agents configuration"
        );
    }

    #[test]
    fn test_missing_required_field() {
        let result = TasksConfig::from_yaml_str("research_task:\n  description: only this\n");
        assert!(matches!(
            result,
            Err(CrewError::Yaml {
                section: "tasks",
                ..
            })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TASKS.as_bytes()).unwrap();

        let tasks = TasksConfig::load(file.path()).unwrap();
        assert!(tasks.get("research_task").is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = AgentsConfig::load("/nonexistent/agents.yaml");
        assert!(matches!(result, Err(CrewError::ConfigLoad { .. })));
    }
}
