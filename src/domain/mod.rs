//! Prospect evaluation logic lives here.

pub mod entities;
pub mod evaluation;
pub mod grouping;
pub mod industry;
pub mod ranking;
pub mod report;

pub use entities::{
    Attributes, BlueprintCopy, EnrichedBlueprint, Facility, MaterialLine, Materials, Prospect,
    Recipe, RecipeMaterial, TypeId,
};
pub use evaluation::{
    evaluate_prospects, evaluate_type, EvaluationSummary, ProspectCalculator, RecipeSource,
    TypeVerdict, MIN_PROFIT_MARGIN, UNRESEARCHED_MAX_EFFICIENCY,
};
pub use grouping::{group_by_type, BlueprintGroup};
pub use industry::{IndustryCalculator, PriceQuote, PriceSource};
pub use ranking::{filter_and_rank, sort_prospects, RankKey, RankOrder, RankPolicy};
pub use report::{
    format_currency, to_records, Money, MoneyFormat, ProspectRecord, RecordField, RecordFormat,
};
