//! Flattens ranked prospects into report records.

use std::{collections::HashMap, fmt};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::entities::{Materials, Prospect};

const CURRENCY_SUFFIX: &str = "ISK";

/// How money fields are rendered in a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MoneyFormat {
    #[default]
    Currency,
    Raw,
}

/// Record fields whose rendering can be chosen independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RecordField {
    IskPerHour,
    Price,
    Cost,
    Value,
    Profit,
    Margin,
    Install,
}

/// Per-field rendering: a base format plus field overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordFormat {
    base: MoneyFormat,
    overrides: HashMap<RecordField, MoneyFormat>,
}

impl RecordFormat {
    pub fn uniform(base: MoneyFormat) -> Self {
        Self {
            base,
            overrides: HashMap::new(),
        }
    }

    pub fn with(mut self, field: RecordField, format: MoneyFormat) -> Self {
        self.overrides.insert(field, format);
        self
    }

    pub fn for_field(&self, field: RecordField) -> MoneyFormat {
        self.overrides.get(&field).copied().unwrap_or(self.base)
    }
}

impl From<MoneyFormat> for RecordFormat {
    fn from(base: MoneyFormat) -> Self {
        Self::uniform(base)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Money {
    Formatted(String),
    Raw(f64),
}

impl Money {
    fn new(value: f64, format: MoneyFormat) -> Self {
        match format {
            MoneyFormat::Currency => Money::Formatted(format_currency(value)),
            MoneyFormat::Raw => Money::Raw(value),
        }
    }

    /// Percentages render as `12.35%` in currency mode.
    fn percent(value: f64, format: MoneyFormat) -> Self {
        match format {
            MoneyFormat::Currency => Money::Formatted(format!("{value:.2}%")),
            MoneyFormat::Raw => Money::Raw(value),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Money::Formatted(text) => f.write_str(text),
            Money::Raw(value) => write!(f, "{value:.2}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProspectRecord {
    pub product: String,
    pub copies: u32,
    /// System and station parts of the facility name.
    pub location: Vec<String>,
    pub blueprint_me: i32,
    pub isk_per_hour: Money,
    pub price: Money,
    pub cost: Money,
    pub value: Money,
    pub profit: Money,
    pub margin: Money,
    pub install: Money,
    pub materials: Materials,
}

impl ProspectRecord {
    pub fn from_prospect(prospect: &Prospect, format: &RecordFormat) -> Self {
        let money = |field, value| Money::new(value, format.for_field(field));
        Self {
            product: prospect.product.clone(),
            copies: prospect.count,
            location: prospect.facility.location(),
            blueprint_me: prospect.blueprint_me,
            isk_per_hour: money(RecordField::IskPerHour, prospect.isk_per_hour),
            price: money(RecordField::Price, prospect.price_per_unit),
            cost: money(RecordField::Cost, prospect.cost_per_unit),
            value: money(RecordField::Value, prospect.product_value),
            profit: money(RecordField::Profit, prospect.profit_per_unit),
            margin: Money::percent(
                prospect.profit_margin,
                format.for_field(RecordField::Margin),
            ),
            install: money(RecordField::Install, prospect.install_cost),
            materials: prospect.materials.clone(),
        }
    }
}

pub fn to_records(prospects: &[Prospect], format: &RecordFormat) -> Vec<ProspectRecord> {
    prospects
        .iter()
        .map(|prospect| ProspectRecord::from_prospect(prospect, format))
        .collect()
}

/// Renders `1234567.891` as `1,234,567.89 ISK`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value} {CURRENCY_SUFFIX}");
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction} {CURRENCY_SUFFIX}")
}
