//! Organises owned blueprint copies by type and efficiency.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::entities::{BlueprintCopy, TypeId};

/// All owned copies of a single blueprint type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlueprintGroup {
    pub copies: Vec<BlueprintCopy>,
}

impl BlueprintGroup {
    pub fn len(&self) -> usize {
        self.copies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Partitions the copies by material efficiency level.
    pub fn by_efficiency(&self) -> BTreeMap<i32, Vec<&BlueprintCopy>> {
        let mut tiers: BTreeMap<i32, Vec<&BlueprintCopy>> = BTreeMap::new();
        for copy in &self.copies {
            tiers.entry(copy.material_efficiency).or_default().push(copy);
        }
        tiers
    }
}

pub fn group_by_type(
    copies: impl IntoIterator<Item = BlueprintCopy>,
) -> (BTreeSet<TypeId>, HashMap<TypeId, BlueprintGroup>) {
    let mut groups: HashMap<TypeId, BlueprintGroup> = HashMap::new();
    for copy in copies {
        groups.entry(copy.type_id).or_default().copies.push(copy);
    }
    let keys = groups.keys().copied().collect();
    (keys, groups)
}
