//! Per-type prospect evaluation.
//!
//! Each blueprint type is evaluated one efficiency tier at a time, highest
//! tier first. The first tier that clears the margin bar wins; a tier below
//! the bar ends the type. A failed recipe lookup only skips its tier, while
//! a calculator failure abandons the whole type.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::entities::{BlueprintCopy, EnrichedBlueprint, Facility, Prospect, Recipe, TypeId};
use super::grouping::BlueprintGroup;
use crate::error::{EvaluationError, RemoteLookupError};

/// Tiers at or below this efficiency are never evaluated.
pub const UNRESEARCHED_MAX_EFFICIENCY: i32 = 3;

/// Best-facility margin (percent) a tier must exceed to be accepted.
pub const MIN_PROFIT_MARGIN: f64 = 5.0;

const RUNS_PER_COPY: u32 = 1;

#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch_recipe(&self, type_id: TypeId) -> Result<Recipe, RemoteLookupError>;
}

/// Turns a blueprint and facility list into prospects, best facility first.
#[async_trait]
pub trait ProspectCalculator: Send + Sync {
    async fn calculate(
        &self,
        blueprint: &EnrichedBlueprint,
        facilities: &[Facility],
        runs: u32,
        copies: u32,
    ) -> Result<Vec<Prospect>, EvaluationError>;
}

#[derive(Debug)]
pub enum TypeVerdict {
    /// A tier cleared the margin bar; holds that tier's prospects.
    Accepted(Vec<Prospect>),
    /// The first evaluated tier fell short of the margin bar.
    Rejected { efficiency: i32, margin: f64 },
    /// The calculator could not evaluate the type at all.
    Abandoned {
        efficiency: i32,
        error: EvaluationError,
    },
    /// No copy above the unresearched tier.
    Unresearched,
    /// Every eligible tier failed its recipe lookup.
    Unavailable,
}

impl TypeVerdict {
    pub fn into_prospects(self) -> Option<Vec<Prospect>> {
        match self {
            TypeVerdict::Accepted(prospects) => Some(prospects),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeVerdict::Accepted(_) => "accepted",
            TypeVerdict::Rejected { .. } => "rejected",
            TypeVerdict::Abandoned { .. } => "abandoned",
            TypeVerdict::Unresearched => "unresearched",
            TypeVerdict::Unavailable => "unavailable",
        }
    }
}

enum TierOutcome {
    Accepted(Vec<Prospect>),
    BelowMargin(f64),
    Skipped(RemoteLookupError),
}

pub async fn evaluate_type<R, C>(
    type_id: TypeId,
    group: &BlueprintGroup,
    facilities: &[Facility],
    recipes: &R,
    calculator: &C,
) -> TypeVerdict
where
    R: RecipeSource + ?Sized,
    C: ProspectCalculator + ?Sized,
{
    let tiers: Vec<(i32, Vec<&BlueprintCopy>)> = group
        .by_efficiency()
        .into_iter()
        .filter(|(efficiency, _)| *efficiency > UNRESEARCHED_MAX_EFFICIENCY)
        .rev()
        .collect();

    if tiers.is_empty() {
        debug!(type_id, "only unresearched copies; skipping type");
        return TypeVerdict::Unresearched;
    }

    for (efficiency, copies) in tiers {
        let Some(representative) = copies.first().copied() else {
            continue;
        };
        let count = u32::try_from(copies.len()).unwrap_or(u32::MAX);

        match evaluate_tier(representative, count, facilities, recipes, calculator).await {
            Ok(TierOutcome::Accepted(prospects)) => {
                debug!(type_id, efficiency, copies = count, "tier accepted");
                return TypeVerdict::Accepted(prospects);
            }
            Ok(TierOutcome::BelowMargin(margin)) => {
                debug!(type_id, efficiency, margin, "margin too low; dropping type");
                return TypeVerdict::Rejected { efficiency, margin };
            }
            Ok(TierOutcome::Skipped(error)) => {
                warn!(type_id, efficiency, %error, "recipe lookup failed; skipping tier");
            }
            Err(error) => {
                warn!(type_id, efficiency, %error, "cannot evaluate type; abandoning");
                return TypeVerdict::Abandoned { efficiency, error };
            }
        }
    }

    TypeVerdict::Unavailable
}

async fn evaluate_tier<R, C>(
    representative: &BlueprintCopy,
    copies: u32,
    facilities: &[Facility],
    recipes: &R,
    calculator: &C,
) -> Result<TierOutcome, EvaluationError>
where
    R: RecipeSource + ?Sized,
    C: ProspectCalculator + ?Sized,
{
    let type_id = representative.type_id;
    let recipe = match recipes.fetch_recipe(type_id).await {
        Ok(recipe) => recipe,
        Err(error) => return Ok(TierOutcome::Skipped(error)),
    };

    let blueprint = match EnrichedBlueprint::merge(representative, &recipe) {
        Ok(blueprint) => blueprint,
        Err(error) => {
            return Ok(TierOutcome::Skipped(RemoteLookupError::malformed(
                format!("recipe for type {type_id}"),
                error,
            )))
        }
    };

    let prospects = calculator
        .calculate(&blueprint, facilities, RUNS_PER_COPY, copies)
        .await?;
    let Some(best) = prospects.first() else {
        return Err(EvaluationError::NoProspects { type_id });
    };

    if best.profit_margin > MIN_PROFIT_MARGIN {
        Ok(TierOutcome::Accepted(prospects))
    } else {
        Ok(TierOutcome::BelowMargin(best.profit_margin))
    }
}

#[derive(Debug, Default)]
pub struct EvaluationSummary {
    /// Prospect lists of every accepted type, in type id order.
    pub prospects: Vec<Vec<Prospect>>,
    pub accepted: usize,
    pub rejected: usize,
    pub abandoned: usize,
    pub unresearched: usize,
    pub unavailable: usize,
}

impl EvaluationSummary {
    fn record(&mut self, verdict: TypeVerdict) {
        match verdict {
            TypeVerdict::Accepted(prospects) => {
                self.accepted += 1;
                self.prospects.push(prospects);
            }
            TypeVerdict::Rejected { .. } => self.rejected += 1,
            TypeVerdict::Abandoned { .. } => self.abandoned += 1,
            TypeVerdict::Unresearched => self.unresearched += 1,
            TypeVerdict::Unavailable => self.unavailable += 1,
        }
    }
}

/// Evaluates every grouped type in turn; no single type can fail the run.
pub async fn evaluate_prospects<R, C>(
    keys: &BTreeSet<TypeId>,
    groups: &HashMap<TypeId, BlueprintGroup>,
    facilities: &[Facility],
    recipes: &R,
    calculator: &C,
) -> EvaluationSummary
where
    R: RecipeSource + ?Sized,
    C: ProspectCalculator + ?Sized,
{
    let mut summary = EvaluationSummary::default();

    for &type_id in keys {
        let Some(group) = groups.get(&type_id) else {
            continue;
        };
        let verdict = evaluate_type(type_id, group, facilities, recipes, calculator).await;
        debug!(type_id, verdict = verdict.label(), "type evaluated");
        summary.record(verdict);
    }

    info!(
        types = keys.len(),
        accepted = summary.accepted,
        rejected = summary.rejected,
        abandoned = summary.abandoned,
        unresearched = summary.unresearched,
        unavailable = summary.unavailable,
        "evaluation finished"
    );
    summary
}
