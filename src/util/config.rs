//! Command line and environment configuration.
//!
//! Every setting can come from a flag or from the environment (a `.env`
//! file is loaded first). [`Config::validate`] runs before any remote call so
//! a broken configuration aborts the run up front.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use url::Url;

use crate::domain::{MoneyFormat, RankKey, RankOrder, RankPolicy, RecordField, RecordFormat};
use crate::domain::ranking::DEFAULT_MIN_PROFIT_PER_RUN;
use crate::error::ConfigError;
use crate::infra::cache::DEFAULT_CAPACITY;
use crate::infra::output::ReportFormat;

#[derive(Debug, Clone, Parser)]
#[command(name = "blueprint-prospector")]
#[command(version, about = "Ranks owned blueprints by manufacturing profitability")]
pub struct Config {
    /// Base URL of the reference API serving manufacturing recipes
    #[arg(long, env = "REFAPI_URL")]
    pub refapi_url: Option<String>,

    /// Base URL of the market price service
    #[arg(long, env = "PRICES_URL")]
    pub prices_url: Option<String>,

    /// URL or file path of the owned blueprint listing
    #[arg(long, env = "BLUEPRINTS")]
    pub blueprints: Option<String>,

    /// Bearer token sent with blueprint listing requests
    #[arg(long, env = "BLUEPRINTS_TOKEN", hide_env_values = true)]
    pub blueprints_token: Option<String>,

    /// JSON file with facility definitions
    #[arg(long, env = "FACILITIES_PATH", default_value = "facilities.json")]
    pub facilities_path: PathBuf,

    /// Comma separated ids of the facilities to evaluate against
    #[arg(long, env = "STATION_IDS")]
    pub station_ids: Option<String>,

    /// Where the CSV report is written
    #[arg(long, env = "OUTPUT_PATH", default_value = "prospects.csv")]
    pub output_path: PathBuf,

    #[arg(long, env = "FORMAT", value_enum, default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,

    /// Minimum profit a single run must exceed to be reported
    #[arg(long, env = "MIN_PROFIT_PER_RUN", default_value_t = DEFAULT_MIN_PROFIT_PER_RUN)]
    pub min_profit_per_run: f64,

    #[arg(long, env = "RANK_BY", value_enum, default_value_t = RankKey::ProfitPerUnit)]
    pub rank_by: RankKey,

    #[arg(long, env = "RANK_ORDER", value_enum, default_value_t = RankOrder::Descending)]
    pub rank_order: RankOrder,

    #[arg(long, env = "MONEY_FORMAT", value_enum, default_value_t = MoneyFormat::Currency)]
    pub money_format: MoneyFormat,

    /// Record fields always written as raw numbers
    #[arg(long, env = "RAW_FIELDS", value_enum, value_delimiter = ',')]
    pub raw_fields: Vec<RecordField>,

    /// Record fields always written in currency notation
    #[arg(long, env = "CURRENCY_FIELDS", value_enum, value_delimiter = ',')]
    pub currency_fields: Vec<RecordField>,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Entries kept per lookup cache
    #[arg(long, env = "CACHE_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub cache_capacity: usize,
}

/// Configuration after validation; every required setting is present.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub refapi_url: String,
    pub prices_url: String,
    pub blueprints: String,
    pub blueprints_token: Option<String>,
    pub facilities_path: PathBuf,
    pub station_ids: Vec<i64>,
    pub output_path: PathBuf,
    pub format: ReportFormat,
    pub rank_policy: RankPolicy,
    pub record_format: RecordFormat,
    pub request_timeout: Duration,
    pub cache_capacity: usize,
}

impl Config {
    pub fn validate(&self) -> Result<RunConfig, ConfigError> {
        let refapi_url = required_url(&self.refapi_url, "REFAPI_URL")?;
        let prices_url = required_url(&self.prices_url, "PRICES_URL")?;
        let blueprints = required(&self.blueprints, "BLUEPRINTS")?;
        let station_ids = parse_station_ids(required(&self.station_ids, "STATION_IDS")?)?;

        if !self.min_profit_per_run.is_finite() {
            return Err(ConfigError::invalid(
                "MIN_PROFIT_PER_RUN",
                "must be a finite number",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "REQUEST_TIMEOUT_SECS",
                "must be at least one second",
            ));
        }
        if let Some(field) = self
            .raw_fields
            .iter()
            .find(|field| self.currency_fields.contains(field))
        {
            return Err(ConfigError::invalid(
                "RAW_FIELDS",
                format!("{field:?} is also listed in CURRENCY_FIELDS"),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::invalid("CACHE_CAPACITY", "must be positive"));
        }

        Ok(RunConfig {
            refapi_url,
            prices_url,
            blueprints: blueprints.to_string(),
            blueprints_token: self.blueprints_token.clone().filter(|t| !t.is_empty()),
            facilities_path: self.facilities_path.clone(),
            station_ids,
            output_path: self.output_path.clone(),
            format: self.format,
            rank_policy: RankPolicy {
                min_profit_per_run: self.min_profit_per_run,
                key: self.rank_by,
                order: self.rank_order,
            },
            record_format: self.record_format(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            cache_capacity: self.cache_capacity,
        })
    }
}

impl Config {
    fn record_format(&self) -> RecordFormat {
        let raw = self.raw_fields.iter().map(|field| (*field, MoneyFormat::Raw));
        let currency = self
            .currency_fields
            .iter()
            .map(|field| (*field, MoneyFormat::Currency));
        raw.chain(currency)
            .fold(RecordFormat::uniform(self.money_format), |format, (field, money)| {
                format.with(field, money)
            })
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn required_url(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    let raw = required(value, name)?;
    Url::parse(raw).map_err(|err| ConfigError::invalid(name, err))?;
    Ok(raw.to_string())
}

fn parse_station_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|err| ConfigError::invalid("STATION_IDS", format!("{part:?}: {err}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(ConfigError::Missing("STATION_IDS"));
    }
    Ok(ids)
}
