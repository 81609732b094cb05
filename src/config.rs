use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://machineid.io";
pub const DEFAULT_DEVICE_ID: &str = "crewai:agent-01";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const REGISTER_PATH: &str = "/api/v1/devices/register";
const VALIDATE_PATH: &str = "/api/v1/devices/validate";

/// Register a device with MachineID, validate it, then run the crew
#[derive(Debug, Clone, Parser)]
#[command(name = "machineid-crew", version, about)]
pub struct Cli {
    /// MachineID API base URL
    #[arg(long, env = "MACHINEID_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Organization key sent as `x-org-key`
    #[arg(long, env = "MACHINEID_ORG_KEY", hide_env_values = true)]
    pub org_key: Option<String>,

    /// Device identifier for this agent instance
    #[arg(long, env = "MACHINEID_DEVICE_ID", default_value = DEFAULT_DEVICE_ID)]
    pub device_id: String,

    /// HTTP method used for the validate call
    #[arg(long, env = "MACHINEID_VALIDATE_METHOD", value_enum, default_value_t = ValidateMethod::Post)]
    pub validate_method: ValidateMethod,

    /// Pause between register and validate, in milliseconds
    #[arg(long, default_value = "1000")]
    pub settle_ms: u64,

    /// Timeout for device API calls, in seconds
    #[arg(long, default_value = "10")]
    pub timeout_secs: u64,

    /// Model used by the crew agent
    #[arg(long, env = "MACHINEID_CREW_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_LLM_BASE_URL)]
    pub llm_base_url: String,

    /// API key for the LLM endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Timeout for each LLM request, in seconds
    #[arg(long, env = "MACHINEID_LLM_TIMEOUT_SECS", default_value = "120")]
    pub llm_timeout_secs: u64,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidateMethod {
    /// JSON body, the canonical form
    Post,
    /// `deviceId` as a query parameter
    Get,
}

/// LLM endpoint settings for the crew
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub org_key: String,
    pub device_id: String,
    pub validate_method: ValidateMethod,
    pub settle_delay: Duration,
    pub timeout: Duration,
    pub llm: LlmConfig,
}

impl Config {
    /// Resolve and validate settings from parsed command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the org key is missing or blank, or the
    /// base URL is empty.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let org_key = cli
            .org_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "Missing MACHINEID_ORG_KEY.\nExample:\n  export MACHINEID_ORG_KEY=org_your_key_here"
                        .to_string(),
                )
            })?
            .to_string();

        let base_url = cli.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("MACHINEID_BASE_URL is empty".to_string()));
        }

        let device_id = match cli.device_id.trim() {
            "" => DEFAULT_DEVICE_ID.to_string(),
            id => id.to_string(),
        };

        let api_key = cli
            .llm_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(ToString::to_string);

        Ok(Self {
            base_url,
            org_key,
            device_id,
            validate_method: cli.validate_method,
            settle_delay: Duration::from_millis(cli.settle_ms),
            timeout: Duration::from_secs(cli.timeout_secs),
            llm: LlmConfig {
                base_url: cli.llm_base_url.trim().trim_end_matches('/').to_string(),
                api_key,
                model: cli.model.clone(),
                timeout: Duration::from_secs(cli.llm_timeout_secs),
            },
        })
    }

    pub fn register_url(&self) -> String {
        format!("{}{REGISTER_PATH}", self.base_url)
    }

    pub fn validate_url(&self) -> String {
        format!("{}{VALIDATE_PATH}", self.base_url)
    }

    /// Org key prefix safe to print
    pub fn masked_org_key(&self) -> String {
        let prefix: String = self.org_key.chars().take(12).collect();
        format!("{prefix}…")
    }
}
