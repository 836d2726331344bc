//! Profit threshold filtering and ranking of evaluated prospects.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::entities::Prospect;

/// Default absolute profit a single run must exceed.
pub const DEFAULT_MIN_PROFIT_PER_RUN: f64 = 45_000.0;

/// Sorting options for ranked prospects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RankKey {
    #[default]
    ProfitPerUnit,
    ProfitPerRun,
    Margin,
    IskPerHour,
}

impl RankKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProfitPerUnit => "Profit/unit",
            Self::ProfitPerRun => "Profit/run",
            Self::Margin => "Margin %",
            Self::IskPerHour => "ISK/hour",
        }
    }

    fn value(&self, prospect: &Prospect) -> f64 {
        match self {
            Self::ProfitPerUnit => prospect.profit_per_unit,
            Self::ProfitPerRun => prospect.profit_per_run,
            Self::Margin => prospect.profit_margin,
            Self::IskPerHour => prospect.isk_per_hour,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RankOrder {
    #[default]
    Descending,
    Ascending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankPolicy {
    pub min_profit_per_run: f64,
    pub key: RankKey,
    pub order: RankOrder,
}

impl Default for RankPolicy {
    fn default() -> Self {
        Self {
            min_profit_per_run: DEFAULT_MIN_PROFIT_PER_RUN,
            key: RankKey::default(),
            order: RankOrder::default(),
        }
    }
}

/// Sort prospects by the given key; equal keys keep their input order.
pub fn sort_prospects(prospects: &mut [Prospect], key: RankKey, order: RankOrder) {
    prospects.sort_by(|a, b| {
        let ord = key.value(a).total_cmp(&key.value(b));
        match order {
            RankOrder::Ascending => ord,
            RankOrder::Descending => ord.reverse(),
        }
    });
}

/// Keeps the best-facility prospect of each evaluation that clears the
/// per-run profit threshold, ranked by the policy's key.
pub fn filter_and_rank<I>(evaluations: I, policy: &RankPolicy) -> Vec<Prospect>
where
    I: IntoIterator<Item = Vec<Prospect>>,
{
    let mut passing: Vec<Prospect> = evaluations
        .into_iter()
        .filter_map(|prospects| prospects.into_iter().next())
        .filter(|best| best.profit_per_run > policy.min_profit_per_run)
        .collect();

    sort_prospects(&mut passing, policy.key, policy.order);
    passing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Facility, Materials};

    fn prospect(product: &str, profit_per_unit: f64, profit_per_run: f64) -> Prospect {
        Prospect {
            product_type_id: 1,
            product: product.to_string(),
            count: 1,
            facility: Facility {
                id: 1,
                name: "Jita IV".into(),
                material_modifier: 1.0,
                time_modifier: 1.0,
                cost_index: 0.0,
                tax_rate: 0.0,
                manufacturing: true,
            },
            blueprint_me: 10,
            price_per_unit: 0.0,
            cost_per_unit: 0.0,
            profit_per_unit,
            profit_margin: 10.0,
            profit_per_run,
            product_value: 0.0,
            isk_per_hour: 0.0,
            install_cost: 0.0,
            materials: Materials::new(),
        }
    }

    fn products(prospects: &[Prospect]) -> Vec<&str> {
        prospects.iter().map(|p| p.product.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter_and_rank(Vec::new(), &RankPolicy::default()).is_empty());
    }

    #[test]
    fn drops_prospects_at_or_below_threshold() {
        let evaluations = vec![
            vec![prospect("at", 10.0, 45_000.0)],
            vec![prospect("above", 10.0, 45_000.5)],
            vec![prospect("below", 10.0, 100.0)],
            vec![],
        ];

        let ranked = filter_and_rank(evaluations, &RankPolicy::default());

        assert_eq!(products(&ranked), vec!["above"]);
        assert!(ranked
            .iter()
            .all(|p| p.profit_per_run > DEFAULT_MIN_PROFIT_PER_RUN));
    }

    #[test]
    fn only_the_best_facility_is_considered() {
        let evaluations = vec![vec![
            prospect("best", 10.0, 10.0),
            prospect("runner-up", 10.0, 90_000.0),
        ]];

        assert!(filter_and_rank(evaluations, &RankPolicy::default()).is_empty());
    }

    #[test]
    fn ranks_by_configured_key_and_order() {
        let evaluations = || {
            vec![
                vec![prospect("a", 5.0, 300_000.0)],
                vec![prospect("b", 50.0, 100_000.0)],
                vec![prospect("c", 20.0, 200_000.0)],
            ]
        };

        let by_unit = filter_and_rank(evaluations(), &RankPolicy::default());
        assert_eq!(products(&by_unit), vec!["b", "c", "a"]);

        let by_run_ascending = filter_and_rank(
            evaluations(),
            &RankPolicy {
                key: RankKey::ProfitPerRun,
                order: RankOrder::Ascending,
                ..RankPolicy::default()
            },
        );
        assert_eq!(products(&by_run_ascending), vec!["b", "c", "a"]);

        let by_run = filter_and_rank(
            evaluations(),
            &RankPolicy {
                key: RankKey::ProfitPerRun,
                ..RankPolicy::default()
            },
        );
        assert_eq!(products(&by_run), vec!["a", "c", "b"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let evaluations = vec![
            vec![prospect("first", 10.0, 50_000.0)],
            vec![prospect("top", 99.0, 50_000.0)],
            vec![prospect("second", 10.0, 50_000.0)],
            vec![prospect("third", 10.0, 50_000.0)],
        ];

        let ranked = filter_and_rank(evaluations, &RankPolicy::default());

        assert_eq!(products(&ranked), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn nan_values_do_not_disturb_ranking() {
        let evaluations = vec![
            vec![prospect("low", 5.0, 50_000.0)],
            vec![prospect("broken", f64::NAN, 50_000.0)],
            vec![prospect("high", 50.0, 50_000.0)],
        ];

        let ranked = filter_and_rank(evaluations, &RankPolicy::default());

        assert_eq!(ranked.len(), 3);
        assert_eq!(products(&ranked[1..]), vec!["high", "low"]);
    }

    #[test]
    fn reranking_own_output_is_a_no_op() {
        let policy = RankPolicy::default();
        let evaluations = vec![
            vec![prospect("a", 5.0, 300_000.0)],
            vec![prospect("b", 50.0, 100_000.0)],
            vec![prospect("c", 50.0, 200_000.0)],
            vec![prospect("d", 80.0, 1_000.0)],
        ];

        let once = filter_and_rank(evaluations, &policy);
        let twice = filter_and_rank(once.iter().cloned().map(|p| vec![p]), &policy);

        assert_eq!(once, twice);
    }
}
