//! CLI argument definitions for the sommelier client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sommelier_core::config::SommelierConfig;
use sommelier_core::types::{TasteProfileCandidate, WineType};

/// Sommelier: chat with a wine recommendation service.
#[derive(Parser, Debug)]
#[command(name = "sommelier", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the recommendation service.
    #[arg(short = 'u', long = "base-url")]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Request timeout in seconds.
    #[arg(short = 't', long = "timeout")]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub profile: ProfileArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Taste profile overrides. Any flag given replaces the config value.
#[derive(clap::Args, Debug, Default)]
pub struct ProfileArgs {
    /// Preferred sweetness, 1-5.
    #[arg(long)]
    pub sweetness: Option<i64>,

    /// Preferred acidity, 1-5.
    #[arg(long)]
    pub acidity: Option<i64>,

    /// Preferred body, 1-5.
    #[arg(long)]
    pub body: Option<i64>,

    /// Preferred tannin, 1-5.
    #[arg(long)]
    pub tannin: Option<i64>,

    /// Comma-separated wine types (RED, WHITE, SPARKLING, ROSE).
    #[arg(long, value_delimiter = ',', value_parser = parse_wine_type)]
    pub types: Option<Vec<WineType>>,

    /// Lower price bound in won.
    #[arg(long = "price-min", allow_negative_numbers = true)]
    pub price_min: Option<i64>,

    /// Upper price bound in won.
    #[arg(long = "price-max", allow_negative_numbers = true)]
    pub price_max: Option<i64>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Interactive conversation (default).
    Chat,
    /// Fetch recommendations for the taste profile once and exit.
    Recommend,
}

fn parse_wine_type(value: &str) -> Result<WineType, String> {
    WineType::parse(value).ok_or_else(|| format!("unknown wine type: {value}"))
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Chat)
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SOMMELIER_CONFIG env var > ~/.sommelier/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SOMMELIER_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Priority: --base-url flag > SOMMELIER_BASE_URL env var > config file value.
    pub fn resolve_base_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.base_url {
            return url.clone();
        }
        if let Ok(url) = std::env::var("SOMMELIER_BASE_URL") {
            if !url.trim().is_empty() {
                return url;
            }
        }
        config_url.to_string()
    }

    /// Priority: --timeout flag > SOMMELIER_TIMEOUT env var > config file value.
    ///
    /// Zero is ignored at every level.
    pub fn resolve_timeout(&self, config_secs: u64) -> u64 {
        if let Some(secs) = self.timeout.filter(|s| *s > 0) {
            return secs;
        }
        if let Ok(val) = std::env::var("SOMMELIER_TIMEOUT") {
            if let Ok(secs) = val.parse::<u64>() {
                if secs > 0 {
                    return secs;
                }
            }
        }
        if config_secs > 0 {
            return config_secs;
        }
        30
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Apply flags and environment overrides to the loaded config.
    pub fn apply(&self, config: &mut SommelierConfig) {
        config.general.log_level = self.resolve_log_level(&config.general.log_level);
        config.service.base_url = self.resolve_base_url(&config.service.base_url);
        config.service.timeout_secs = self.resolve_timeout(config.service.timeout_secs);
        let base = config.profile.take().unwrap_or_default();
        config.profile = Some(self.profile.overlay(base));
    }
}

impl ProfileArgs {
    /// Overlay the given flags onto `base`. Price bounds are merged
    /// individually; a bound with no value anywhere leaves the range missing.
    pub fn overlay(&self, base: TasteProfileCandidate) -> TasteProfileCandidate {
        let (base_min, base_max) = match base.price_range {
            Some((min, max)) => (Some(min), Some(max)),
            None => (None, None),
        };
        let price_range = match (self.price_min.or(base_min), self.price_max.or(base_max)) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        };

        TasteProfileCandidate {
            preferred_sweetness: self.sweetness.or(base.preferred_sweetness),
            preferred_acidity: self.acidity.or(base.preferred_acidity),
            preferred_body: self.body.or(base.preferred_body),
            preferred_tannin: self.tannin.or(base.preferred_tannin),
            preferred_types: self.types.clone().unwrap_or(base.preferred_types),
            price_range,
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".sommelier").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".sommelier").join("config.toml");
    }
    PathBuf::from("config.toml")
}
