use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier for item and blueprint types as used by the reference API.
pub type TypeId = i64;

/// Open attribute set carried through the pipeline unmodified.
pub type Attributes = Map<String, Value>;

/// One owned blueprint copy as reported by the ownership source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlueprintCopy {
    #[serde(rename = "typeID", alias = "type_id")]
    pub type_id: TypeId,
    #[serde(rename = "materialEfficiency", alias = "material_efficiency")]
    pub material_efficiency: i32,
    #[serde(
        rename = "itemID",
        alias = "item_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub item_id: Option<i64>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl BlueprintCopy {
    pub fn new(type_id: TypeId, material_efficiency: i32) -> Self {
        Self {
            type_id,
            material_efficiency,
            item_id: None,
            attributes: Attributes::new(),
        }
    }
}

/// Manufacturing recipe for a blueprint type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "productTypeID", alias = "product_type_id")]
    pub product_type_id: TypeId,
    #[serde(
        rename = "productName",
        alias = "product_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub product_name: Option<String>,
    /// Units produced per run.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Base seconds per run.
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub materials: Vec<RecipeMaterial>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeMaterial {
    #[serde(rename = "typeID", alias = "type_id")]
    pub type_id: TypeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: u64,
}

impl RecipeMaterial {
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("type {}", self.type_id))
    }
}

fn default_quantity() -> u32 {
    1
}

/// A blueprint copy merged with its recipe.
///
/// Built by overlaying the recipe's fields on top of the copy's, so a key
/// present in both always takes the recipe's value. Typed fields cover what
/// the calculator reads; everything else stays in `attributes`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBlueprint {
    #[serde(rename = "typeID")]
    pub type_id: TypeId,
    #[serde(rename = "materialEfficiency")]
    pub material_efficiency: i32,
    #[serde(rename = "itemID", default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
    #[serde(rename = "productTypeID")]
    pub product_type_id: TypeId,
    #[serde(rename = "productName", default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub materials: Vec<RecipeMaterial>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl EnrichedBlueprint {
    pub fn merge(copy: &BlueprintCopy, recipe: &Recipe) -> Result<Self, serde_json::Error> {
        let mut fields = to_object(copy)?;
        fields.extend(to_object(recipe)?);
        serde_json::from_value(Value::Object(fields))
    }

    pub fn product_label(&self) -> String {
        self.product_name
            .clone()
            .unwrap_or_else(|| format!("type {}", self.product_type_id))
    }
}

fn to_object<T: Serialize>(value: &T) -> Result<Attributes, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// A production location and its cost structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    /// Multiplier applied to material quantities (1.0 = no bonus).
    #[serde(default = "unit_modifier")]
    pub material_modifier: f64,
    /// Multiplier applied to job duration.
    #[serde(default = "unit_modifier")]
    pub time_modifier: f64,
    /// System cost index applied to the estimated item value.
    #[serde(default)]
    pub cost_index: f64,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default = "enabled")]
    pub manufacturing: bool,
}

impl Facility {
    /// Splits the facility name into its system and station parts.
    pub fn location(&self) -> Vec<String> {
        match self.name.split_once(' ') {
            Some((system, station)) => vec![system.to_string(), station.to_string()],
            None => vec![self.name.clone()],
        }
    }
}

fn unit_modifier() -> f64 {
    1.0
}

fn enabled() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub quantity: u64,
    pub cost: f64,
}

/// Material name to quantity and cost for one prospect.
pub type Materials = BTreeMap<String, MaterialLine>;

/// Profitability of manufacturing one blueprint at one facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub product_type_id: TypeId,
    pub product: String,
    /// Number of blueprint copies this prospect covers.
    pub count: u32,
    pub facility: Facility,
    pub blueprint_me: i32,
    pub price_per_unit: f64,
    pub cost_per_unit: f64,
    pub profit_per_unit: f64,
    /// Percentage of the unit price kept as profit.
    pub profit_margin: f64,
    pub profit_per_run: f64,
    pub product_value: f64,
    pub isk_per_hour: f64,
    pub install_cost: f64,
    pub materials: Materials,
}
