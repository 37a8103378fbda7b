use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;

use serde_json::{Map, Value};

use crate::models::{EmailConfig, EmailConfigRequest};

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub admin_key: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
    pub initial_configs: BTreeMap<String, EmailConfig>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("admin_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_body_size", &self.max_body_size)
            .field("log_level", &self.log_level)
            .field("initial_configs", &self.initial_configs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, "API_KEY")?;
        let admin_key = required(&lookup, "ADMIN_KEY")?;
        if api_key == admin_key {
            return Err("API_KEY and ADMIN_KEY must be different".to_string());
        }

        let host: IpAddr = or_default(&lookup, "HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid HOST: {e}"))?;

        let port: u16 = or_default(&lookup, "PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid PORT: {e}"))?;

        let max_body_size: usize = or_default(&lookup, "MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid MAX_BODY_SIZE: {e}"))?;

        let log_level = or_default(&lookup, "LOG_LEVEL", "info");

        let initial_configs = match lookup("INITIAL_CONFIG") {
            Some(raw) if !raw.trim().is_empty() => parse_initial_config(&raw)?,
            _ => BTreeMap::new(),
        };

        Ok(Config {
            api_key,
            admin_key,
            host,
            port,
            max_body_size,
            log_level,
            initial_configs,
        })
    }
}

/// Parse `INITIAL_CONFIG`: a JSON object mapping organization code to an
/// email configuration. Each entry passes the same validation as a create.
pub fn parse_initial_config(raw: &str) -> Result<BTreeMap<String, EmailConfig>, String> {
    let entries: HashMap<String, Map<String, Value>> =
        serde_json::from_str(raw).map_err(|e| {
            format!(
                "Invalid INITIAL_CONFIG: expected an object of email configurations ({})",
                describe(&e)
            )
        })?;

    entries
        .into_iter()
        .map(|(code, fields)| {
            EmailConfigRequest::try_from(fields)
                .and_then(|req| req.validate(&code))
                .map(|config| (code.clone(), config))
                .map_err(|e| format!("Invalid INITIAL_CONFIG entry '{code}': {e}"))
        })
        .collect()
}

fn describe(err: &serde_json::Error) -> &'static str {
    use serde_json::error::Category;

    match err.classify() {
        Category::Io => "I/O error",
        Category::Syntax => "syntax error",
        Category::Data => "wrong field types",
        Category::Eof => "unexpected end of input",
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}
