//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::ModerationContext;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Verdict, reasoning and every specialist's opinion
    Full,
    /// Only the final decision and confidence
    Verdict,
    /// JSON output
    Json,
}

/// CLI arguments for ethos-council
#[derive(Parser, Debug)]
#[command(name = "ethos-council")]
#[command(author, version, about = "Ethics council - independent specialists deliberate on a moderation decision")]
#[command(long_about = r#"
Ethos Council asks a panel of ethical specialists whether a piece of content
should be allowed, removed or flagged for human review.

The deliberation has three phases:
1. Dispatch: every specialist evaluates the content in parallel
2. Cross-examination: agreements, conflicts and low-confidence opinions are found
3. Synthesis: opinions are weighed into one verdict with its reasoning

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/ethos-council/config.toml   Global config

Example:
  ethos-council "Satire about government criticism"
  ethos-council -c audience_size=50000 -c vulnerable_audience=true "..."
  echo "some post" | ethos-council --output json
"#)]
pub struct Cli {
    /// The content to deliberate on (read from stdin when omitted)
    pub content: Option<String>,

    /// Moderation context entry; the value is parsed as JSON when possible
    #[arg(short, long = "context", value_name = "KEY=VALUE", value_parser = parse_context_pair)]
    pub context: Vec<(String, Value)>,

    /// Moderation context as a JSON object (merged before --context entries)
    #[arg(long, value_name = "JSON")]
    pub context_json: Option<String>,

    /// Specialists to consult (can be specified multiple times; default: all)
    #[arg(short, long, value_name = "ID")]
    pub specialist: Vec<String>,

    /// Per-specialist timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to daily-rolling files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Build the moderation context from `--context-json` and `--context`
    pub fn moderation_context(&self) -> Result<ModerationContext, String> {
        let mut context = match &self.context_json {
            Some(json) => {
                let map: BTreeMap<String, Value> = serde_json::from_str(json)
                    .map_err(|e| format!("--context-json must be a JSON object: {}", e))?;
                ModerationContext::from(map)
            }
            None => ModerationContext::new(),
        };

        for (key, value) in &self.context {
            context.insert(key.clone(), value.clone());
        }
        Ok(context)
    }
}

/// Parse `KEY=VALUE`; values that are valid JSON keep their type
fn parse_context_pair(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context_pair_types() {
        assert_eq!(
            parse_context_pair("audience_size=50000").unwrap(),
            ("audience_size".to_string(), Value::from(50000))
        );
        assert_eq!(
            parse_context_pair("vulnerable_audience=true").unwrap(),
            ("vulnerable_audience".to_string(), Value::Bool(true))
        );
        assert_eq!(
            parse_context_pair("platform=forum").unwrap(),
            ("platform".to_string(), Value::String("forum".to_string()))
        );
        assert!(parse_context_pair("no-equals").is_err());
        assert!(parse_context_pair("=value").is_err());
    }

    #[test]
    fn test_cli_parses_arguments() {
        let cli = Cli::try_parse_from([
            "ethos-council",
            "-c",
            "audience_size=20000",
            "--context-json",
            r#"{"platform": "forum", "audience_size": 10}"#,
            "-s",
            "utilitarian",
            "--specialist",
            "cultural",
            "--timeout-ms",
            "250",
            "--output",
            "verdict",
            "-vv",
            "Some post",
        ])
        .unwrap();

        assert_eq!(cli.content.as_deref(), Some("Some post"));
        assert_eq!(cli.specialist, vec!["utilitarian", "cultural"]);
        assert_eq!(cli.timeout_ms, Some(250));
        assert_eq!(cli.output, Some(OutputFormat::Verdict));
        assert_eq!(cli.verbose, 2);

        // --context entries win over --context-json
        let context = cli.moderation_context().unwrap();
        assert_eq!(context.audience_size(), 20000);
        assert_eq!(context.platform(), Some("forum"));
    }

    #[test]
    fn test_context_json_must_be_object() {
        let cli = Cli::try_parse_from(["ethos-council", "--context-json", "[1, 2]", "x"]).unwrap();
        assert!(cli.moderation_context().is_err());
    }
}
