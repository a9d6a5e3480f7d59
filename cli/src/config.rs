//! Runtime configuration.
//!
//! Everything deployment-specific lives here: where the market page is, what
//! the report's columns are called, where the page goes, and how patiently
//! acquisition retries. Defaults match the OTE-CR intraday electricity
//! market deployment; a TOML file overrides them field by field.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use blockwatch_core::RetryPolicy;
use blockwatch_fetch::FetchConfig;
use chrono_tz::Tz;
use serde::Deserialize;
use url::Url;

/// File consulted in the working directory when no path is given.
const DEFAULT_CONFIG_FILE: &str = "blockwatch.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Market page listing the report attachment.
    pub page_url: String,
    /// Base URL the attachment href is joined against.
    pub base_url: String,
    /// Where the generated page is written.
    pub output_path: PathBuf,
    /// IANA timezone the market trades in.
    pub timezone: String,
    /// Zero-based worksheet row holding the column headers.
    pub header_row: usize,
    /// Column carrying the interval labels.
    pub interval_column: String,
    /// Data columns shown on the page and consulted for emptiness.
    pub payload_columns: Vec<String>,
    /// Acquisition attempts, including the first.
    pub retry_attempts: u32,
    /// Delay between acquisition attempts, in seconds.
    pub retry_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_url: "https://www.ote-cr.cz/cs/kratkodobe-trhy/elektrina/vnitrodenni-trh"
                .to_string(),
            base_url: "https://www.ote-cr.cz".to_string(),
            output_path: PathBuf::from("index.html"),
            timezone: "Europe/Prague".to_string(),
            header_row: 5,
            interval_column: "Časový interval".to_string(),
            payload_columns: vec![
                "Zobchodované množství(MWh)".to_string(),
                "Zobchodované množství - nákup(MWh)".to_string(),
                "Zobchodované množství - prodej(MWh)".to_string(),
                "Vážený průměr cen (EUR/MWh)".to_string(),
                "Minimální cena(EUR/MWh)".to_string(),
                "Maximální cena(EUR/MWh)".to_string(),
                "Poslední cena(EUR/MWh)".to_string(),
            ],
            retry_attempts: 3,
            retry_delay_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from `path`, from `blockwatch.toml` in the working
    /// directory when present, or fall back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("could not parse config file {}", path.display()))
    }

    pub fn market_timezone(&self) -> Result<Tz> {
        self.timezone.parse().map_err(|error: String| {
            anyhow::anyhow!("invalid timezone {:?}: {error}", self.timezone)
        })
    }

    pub fn fetch_config(&self) -> Result<FetchConfig> {
        let page_url = Url::parse(&self.page_url)
            .with_context(|| format!("invalid page_url {:?}", self.page_url))?;
        let base_url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        let mut fetch = FetchConfig::new(page_url, base_url);
        fetch.header_row = self.header_row;
        Ok(fetch)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts,
            delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}
