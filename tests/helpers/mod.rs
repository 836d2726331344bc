//! Fakes for the pipeline's trait seams.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use blueprint_prospector::domain::{
    BlueprintCopy, EnrichedBlueprint, Facility, Materials, Prospect, ProspectCalculator, Recipe,
    RecipeSource, TypeId,
};
use blueprint_prospector::{EvaluationError, RemoteLookupError};

pub fn copies(type_id: TypeId, efficiency: i32, count: usize) -> Vec<BlueprintCopy> {
    (0..count)
        .map(|_| BlueprintCopy::new(type_id, efficiency))
        .collect()
}

pub fn facility() -> Facility {
    Facility {
        id: 60003760,
        name: "Jita IV - Moon 4 - Caldari Navy Assembly Plant".into(),
        material_modifier: 1.0,
        time_modifier: 1.0,
        cost_index: 0.0,
        tax_rate: 0.0,
        manufacturing: true,
    }
}

pub fn recipe(type_id: TypeId) -> Recipe {
    Recipe {
        product_type_id: type_id * 10,
        product_name: Some(format!("Product {type_id}")),
        quantity: 1,
        time: 3_600.0,
        materials: Vec::new(),
        attributes: Default::default(),
    }
}

/// Serves a canned recipe for every type and records each lookup.
#[derive(Default)]
pub struct RecordingRecipes {
    calls: Mutex<Vec<TypeId>>,
    failing: HashSet<TypeId>,
    /// Types whose first lookup fails and later lookups succeed.
    flaky: Mutex<HashSet<TypeId>>,
}

impl RecordingRecipes {
    pub fn failing(types: impl IntoIterator<Item = TypeId>) -> Self {
        Self {
            failing: types.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn flaky(types: impl IntoIterator<Item = TypeId>) -> Self {
        Self {
            flaky: Mutex::new(types.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<TypeId> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecipeSource for RecordingRecipes {
    async fn fetch_recipe(&self, type_id: TypeId) -> Result<Recipe, RemoteLookupError> {
        self.calls.lock().unwrap().push(type_id);
        if self.failing.contains(&type_id) || self.flaky.lock().unwrap().remove(&type_id) {
            return Err(RemoteLookupError::malformed(
                format!("recipes/manufacturing/{type_id}"),
                "expected value at line 1 column 1",
            ));
        }
        Ok(recipe(type_id))
    }
}

/// Returns a prospect with a fixed margin per type; selected types fail.
#[derive(Default)]
pub struct ScriptedCalculator {
    margins: HashMap<TypeId, f64>,
    failing: HashSet<TypeId>,
    calls: Mutex<Vec<(TypeId, i32, u32)>>,
}

impl ScriptedCalculator {
    pub fn with_margins(margins: impl IntoIterator<Item = (TypeId, f64)>) -> Self {
        Self {
            margins: margins.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn failing_for(mut self, type_id: TypeId) -> Self {
        self.failing.insert(type_id);
        self
    }

    /// (type id, efficiency, copies) of every call, in order.
    pub fn calls(&self) -> Vec<(TypeId, i32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProspectCalculator for ScriptedCalculator {
    async fn calculate(
        &self,
        blueprint: &EnrichedBlueprint,
        facilities: &[Facility],
        _runs: u32,
        copies: u32,
    ) -> Result<Vec<Prospect>, EvaluationError> {
        self.calls.lock().unwrap().push((
            blueprint.type_id,
            blueprint.material_efficiency,
            copies,
        ));
        if self.failing.contains(&blueprint.type_id) {
            return Err(EvaluationError::NoFacility {
                type_id: blueprint.type_id,
            });
        }

        let margin = self.margins.get(&blueprint.type_id).copied().unwrap_or(0.0);
        Ok(facilities
            .iter()
            .map(|facility| prospect(blueprint, facility, copies, margin))
            .collect())
    }
}

pub fn prospect(
    blueprint: &EnrichedBlueprint,
    facility: &Facility,
    copies: u32,
    margin: f64,
) -> Prospect {
    let price = 1_000_000.0;
    let profit = price * margin / 100.0;
    Prospect {
        product_type_id: blueprint.product_type_id,
        product: blueprint.product_label(),
        count: copies,
        facility: facility.clone(),
        blueprint_me: blueprint.material_efficiency,
        price_per_unit: price,
        cost_per_unit: price - profit,
        profit_per_unit: profit,
        profit_margin: margin,
        profit_per_run: profit,
        product_value: price,
        isk_per_hour: profit,
        install_cost: 0.0,
        materials: Materials::new(),
    }
}
