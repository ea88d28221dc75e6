//! Web search through the Serper API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use smarthome_core::Result as AgentResult;
use smarthome_llm::tools::schema;
use smarthome_tools::Tool;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, SmarthomeError};

/// Environment variable holding the Serper API key
pub const SERPER_API_KEY_ENV: &str = "SERPER_API_KEY";

/// Search endpoint
pub const SERPER_SEARCH_URL: &str = "https://google.serper.dev/search";

/// Settings for [`SerperDevTool`]
#[derive(Clone)]
pub struct SerperConfig {
    /// API key; searches fail when unset
    pub api_key: Option<String>,
    /// Search endpoint
    pub endpoint: String,
    /// Number of results requested
    pub n_results: usize,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SerperConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: SERPER_SEARCH_URL.to_string(),
            n_results: 10,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SerperConfig {
    /// Read the API key from [`SERPER_API_KEY_ENV`]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(SERPER_API_KEY_ENV)
                .ok()
                .filter(|k| !k.trim().is_empty()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_n_results(mut self, n_results: usize) -> Self {
        self.n_results = n_results;
        self
    }
}

impl std::fmt::Debug for SerperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerperConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("n_results", &self.n_results)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    search_query: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
    #[serde(default, rename = "knowledgeGraph")]
    knowledge_graph: Option<KnowledgeGraph>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct KnowledgeGraph {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

/// Searches the internet for a query
pub struct SerperDevTool {
    client: reqwest::Client,
    config: SerperConfig,
}

impl SerperDevTool {
    pub fn new(config: SerperConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SerperConfig {
        &self.config
    }

    async fn search(&self, query: &str) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            SmarthomeError::Search(format!("{SERPER_API_KEY_ENV} is not set"))
        })?;

        debug!(query = %query, n_results = self.config.n_results, "Searching with Serper");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("X-API-KEY", api_key)
            .json(&SearchRequest {
                q: query,
                num: self.config.n_results,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmarthomeError::Search(format!("HTTP {status}: {body}")));
        }

        let results: SearchResponse = response.json().await?;
        debug!(organic = results.organic.len(), "Serper search finished");
        Ok(format_results(&results))
    }
}

fn format_results(results: &SearchResponse) -> String {
    let mut out = String::new();

    if let Some(graph) = &results.knowledge_graph {
        out.push_str(&format!("Knowledge Graph: {}\n", graph.title));
        if !graph.description.is_empty() {
            out.push_str(&format!("{}\n", graph.description));
        }
        out.push('\n');
    }

    if results.organic.is_empty() {
        out.push_str("No results found.");
        return out;
    }

    out.push_str("Search results:\n");
    for result in &results.organic {
        out.push_str(&format!(
            "Title: {}\nLink: {}\nSnippet: {}\n---\n",
            result.title, result.link, result.snippet
        ));
    }
    out
}

#[async_trait]
impl Tool for SerperDevTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SearchParams = serde_json::from_value(params).map_err(|e| {
            smarthome_core::Error::ProcessingFailed(format!("Invalid parameters: {e}"))
        })?;

        Ok(json!(self.search(&params.search_query).await?))
    }

    fn name(&self) -> &str {
        "search_the_internet_with_serper"
    }

    fn description(&self) -> &str {
        "A tool that can be used to search the internet with a search_query. \
         Returns titles, links and snippets of the top results."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "search_query": schema::string("Mandatory search query you want to use to search the internet")
            }),
            &["search_query"],
        )
    }
}
