//! Default manufacturing cost and profit calculator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::entities::{
    EnrichedBlueprint, Facility, MaterialLine, Materials, Prospect, RecipeMaterial, TypeId,
};
use super::evaluation::ProspectCalculator;
use crate::error::{EvaluationError, RemoteLookupError};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Market quote for one item type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(default)]
    pub buy: Option<f64>,
    #[serde(default)]
    pub sell: Option<f64>,
}

impl PriceQuote {
    /// Sell price when usable, falling back to the buy price.
    pub fn best(&self) -> Option<f64> {
        self.sell
            .filter(|price| price.is_finite() && *price > 0.0)
            .or_else(|| self.buy.filter(|price| price.is_finite() && *price > 0.0))
    }
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn quote(&self, type_id: TypeId) -> Result<PriceQuote, RemoteLookupError>;
}

pub struct IndustryCalculator<P> {
    prices: P,
}

impl<P: PriceSource> IndustryCalculator<P> {
    pub fn new(prices: P) -> Self {
        Self { prices }
    }

    async fn unit_price(&self, type_id: TypeId) -> Result<f64, EvaluationError> {
        self.prices
            .quote(type_id)
            .await?
            .best()
            .ok_or(EvaluationError::MissingPrice { type_id })
    }
}

#[async_trait]
impl<P: PriceSource> ProspectCalculator for IndustryCalculator<P> {
    async fn calculate(
        &self,
        blueprint: &EnrichedBlueprint,
        facilities: &[Facility],
        runs: u32,
        copies: u32,
    ) -> Result<Vec<Prospect>, EvaluationError> {
        let candidates: Vec<&Facility> = facilities.iter().filter(|f| f.manufacturing).collect();
        if candidates.is_empty() {
            return Err(EvaluationError::NoFacility {
                type_id: blueprint.type_id,
            });
        }

        let price_per_unit = self.unit_price(blueprint.product_type_id).await?;
        let mut inputs = Vec::with_capacity(blueprint.materials.len());
        for material in &blueprint.materials {
            inputs.push((material, self.unit_price(material.type_id).await?));
        }

        let mut prospects = candidates
            .into_iter()
            .map(|facility| {
                price_job(blueprint, facility, price_per_unit, &inputs, runs, copies)
            })
            .collect::<Result<Vec<_>, _>>()?;

        prospects.sort_by(|a, b| b.profit_per_unit.total_cmp(&a.profit_per_unit));
        Ok(prospects)
    }
}

fn price_job(
    blueprint: &EnrichedBlueprint,
    facility: &Facility,
    price_per_unit: f64,
    inputs: &[(&RecipeMaterial, f64)],
    runs: u32,
    copies: u32,
) -> Result<Prospect, EvaluationError> {
    let overflow = || EvaluationError::Overflow {
        type_id: blueprint.type_id,
    };
    let efficiency = f64::from(blueprint.material_efficiency.clamp(0, 100)) / 100.0;
    let jobs = u64::from(runs) * u64::from(copies);

    let mut materials = Materials::new();
    let mut material_cost_per_run = 0.0;
    let mut estimated_value = 0.0;
    for (material, price) in inputs {
        let per_run = adjusted_quantity(material.quantity, efficiency, facility.material_modifier);
        material_cost_per_run += per_run as f64 * price;
        estimated_value += material.quantity as f64 * price;

        let total = per_run.checked_mul(jobs).ok_or_else(overflow)?;
        let line = materials.entry(material.label()).or_insert(MaterialLine {
            quantity: 0,
            cost: 0.0,
        });
        line.quantity = line.quantity.checked_add(total).ok_or_else(overflow)?;
        line.cost += total as f64 * price;
    }

    let install_cost = estimated_value * facility.cost_index * (1.0 + facility.tax_rate);
    let units = f64::from(blueprint.quantity.max(1));
    let cost_per_unit = (material_cost_per_run + install_cost) / units;
    let profit_per_unit = price_per_unit - cost_per_unit;
    let profit_per_run = profit_per_unit * units;
    let hours = blueprint.time * facility.time_modifier / SECONDS_PER_HOUR;

    Ok(Prospect {
        product_type_id: blueprint.product_type_id,
        product: blueprint.product_label(),
        count: copies,
        facility: facility.clone(),
        blueprint_me: blueprint.material_efficiency,
        price_per_unit,
        cost_per_unit,
        profit_per_unit,
        profit_margin: if price_per_unit > 0.0 {
            profit_per_unit / price_per_unit * 100.0
        } else {
            0.0
        },
        profit_per_run,
        product_value: price_per_unit * units,
        isk_per_hour: if hours > 0.0 { profit_per_run / hours } else { 0.0 },
        install_cost,
        materials,
    })
}

/// Per-run quantity after efficiency and facility bonuses; never below one.
fn adjusted_quantity(base: u64, efficiency: f64, modifier: f64) -> u64 {
    if base == 0 {
        return 0;
    }
    // Tolerance keeps exact products like 100 * 0.9 from rounding up.
    let raw = base as f64 * (1.0 - efficiency) * modifier;
    ((raw - 1e-9).ceil().max(1.0)) as u64
}
