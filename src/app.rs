//! Run orchestration: load inputs, evaluate, rank, report.

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    domain::{
        evaluate_prospects, filter_and_rank, group_by_type, to_records, BlueprintCopy, Facility,
        IndustryCalculator, Prospect, ProspectCalculator, RankPolicy, RecipeSource,
    },
    infra::{
        facilities::FacilityDirectory, http_client, market::MarketClient, output,
        ownership::{ownership_source, OwnershipSource},
        refapi::RefApiClient,
    },
    util::config::RunConfig,
};

/// Groups, evaluates and ranks the given copies. Never fails: per-type
/// problems are logged and the type is left out of the result.
pub async fn run_pipeline<R, C>(
    copies: Vec<BlueprintCopy>,
    facilities: &[Facility],
    recipes: &R,
    calculator: &C,
    policy: &RankPolicy,
) -> Vec<Prospect>
where
    R: RecipeSource + ?Sized,
    C: ProspectCalculator + ?Sized,
{
    let (keys, groups) = group_by_type(copies);
    let summary = evaluate_prospects(&keys, &groups, facilities, recipes, calculator).await;
    let ranked = filter_and_rank(summary.prospects, policy);
    info!(
        passing = ranked.len(),
        key = policy.key.label(),
        min_profit_per_run = policy.min_profit_per_run,
        "ranked prospects"
    );
    ranked
}

pub async fn run(config: &RunConfig) -> Result<Vec<Prospect>> {
    // Facilities come from local configuration; resolve them before any
    // remote call so a bad station list aborts immediately.
    let facilities = FacilityDirectory::load(&config.facilities_path)?
        .resolve(&config.station_ids)?;

    let http = http_client(config.request_timeout).context("failed to build HTTP client")?;
    let recipes = RefApiClient::with_client(http.clone(), &config.refapi_url, config.cache_capacity)
        .context("invalid REFAPI_URL")?;
    let market = MarketClient::with_client(http.clone(), &config.prices_url, config.cache_capacity)
        .context("invalid PRICES_URL")?;
    let calculator = IndustryCalculator::new(market);
    let ownership = ownership_source(&config.blueprints, config.blueprints_token.clone(), http)
        .context("invalid BLUEPRINTS location")?;

    let copies = ownership
        .blueprints()
        .await
        .context("failed to load owned blueprints")?;

    let ranked = run_pipeline(
        copies,
        &facilities,
        &recipes,
        &calculator,
        &config.rank_policy,
    )
    .await;

    let stats = recipes.cache_stats().await;
    info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        "recipe cache"
    );

    let records = to_records(&ranked, &config.record_format);
    output::emit(config.format, &config.output_path, &records)
        .context("failed to write report")?;

    Ok(ranked)
}
