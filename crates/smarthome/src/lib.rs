//! Smarthome research crew
//!
//! Two agents share one LLM endpoint:
//!
//! - `researcher` digs into a topic, with access to the private portfolio tool
//! - `reporting_analyst` turns the findings into a report, with web search
//!
//! Their tasks run in sequence and the report is written to
//! [`crew::REPORT_FILE`].

pub mod crew;
pub mod error;
pub mod llm;
pub mod tools;

pub use crew::{CONFIG_DIR, REPORT_FILE, SmarthomeCrew, default_inputs};
pub use error::{Result, SmarthomeError};
pub use llm::{llm_config_from_env, llm_config_from_token, llm_config_from_token_var};
