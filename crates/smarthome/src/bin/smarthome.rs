//! Smarthome crew CLI
//!
//! # Usage
//!
//! ```bash
//! export LLM_API_TOKEN="..."
//! export SERPER_API_KEY="..."
//!
//! # Research a topic and write first_report.md
//! cargo run --bin smarthome -- run --topic "AI LLMs"
//!
//! # Validate the YAML definitions without calling the LLM
//! cargo run --bin smarthome -- check
//!
//! # Use other definitions
//! cargo run --bin smarthome -- --config-dir ./my-crew check
//! ```
//!
//! `--config-dir` defaults to the `config/` directory of the `smarthome`
//! crate, so the commands work from any directory of the checkout.

use anyhow::Context as _;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use smarthome::llm::{TOKEN_ENV, llm_config_from_env, llm_config_from_token};
use smarthome::{SmarthomeCrew, default_inputs};
use smarthome_llm::Llm;
use smarthome_utils::ProjectConfig;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "smarthome")]
#[command(about = "Run the smarthome research crew", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding agents.yaml and tasks.yaml
    #[arg(long, global = true, default_value = smarthome::CONFIG_DIR)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the crew and write the report
    Run {
        /// Topic to research
        #[arg(short, long, default_value = "AI LLMs")]
        topic: String,

        /// Directory the report is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Print the full crew output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the configuration and assemble the crew without running it
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    smarthome_utils::init_tracing("info");

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            topic,
            output_dir,
            json,
        } => run(cli.config_dir, topic, output_dir, json).await,
        Command::Check => check(cli.config_dir),
    }
}

async fn run(config_dir: PathBuf, topic: String, output_dir: PathBuf, json: bool) -> anyhow::Result<()> {
    let llm = Llm::new(llm_config_from_env()?)?;
    let project = ProjectConfig::new(config_dir).with_output_dir(output_dir);

    let crew = SmarthomeCrew::new(&project, llm)?.crew()?;
    let inputs = default_inputs(&topic, chrono::Local::now().year());

    info!(topic = %topic, model = %smarthome::llm::MODEL, "Starting smarthome crew");
    let output = crew
        .kickoff(inputs)
        .await
        .context("crew run failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{output}");
    }

    Ok(())
}

fn check(config_dir: PathBuf) -> anyhow::Result<()> {
    let config = llm_config_from_env().unwrap_or_else(|_| {
        warn!("{TOKEN_ENV} is not set; checking with a placeholder token");
        llm_config_from_token("unset")
    });
    let project = ProjectConfig::new(config_dir);

    let crew = SmarthomeCrew::new(&project, Llm::new(config)?)?.crew()?;
    for (task, agent) in crew.assignments() {
        println!("{task} -> {agent}");
    }
    println!("Configuration OK");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_defaults_to_bundled_definitions() {
        let cli = Cli::parse_from(["smarthome", "check"]);
        assert_eq!(cli.config_dir, PathBuf::from(smarthome::CONFIG_DIR));
        assert!(ProjectConfig::new(cli.config_dir).agents_path().is_file());
    }

    #[test]
    fn test_config_dir_override() {
        let cli = Cli::parse_from(["smarthome", "run", "--config-dir", "other"]);
        assert_eq!(cli.config_dir, PathBuf::from("other"));
        assert!(matches!(cli.command, Command::Run { ref topic, .. } if topic == "AI LLMs"));
    }
}
