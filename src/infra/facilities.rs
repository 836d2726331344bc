//! Facility definitions loaded from a JSON file.

use std::{collections::HashMap, fs, path::Path};

use tracing::info;

use crate::domain::Facility;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct FacilityDirectory {
    facilities: HashMap<i64, Facility>,
}

impl FacilityDirectory {
    pub fn from_facilities(facilities: impl IntoIterator<Item = Facility>) -> Self {
        Self {
            facilities: facilities
                .into_iter()
                .map(|facility| (facility.id, facility))
                .collect(),
        }
    }

    /// Load the directory from a JSON array of facility definitions.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let facilities: Vec<Facility> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(count = facilities.len(), path = %path.display(), "loaded facility directory");
        Ok(Self::from_facilities(facilities))
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Resolves the configured ids in order; any unknown id is fatal.
    pub fn resolve(&self, ids: &[i64]) -> Result<Vec<Facility>, ConfigError> {
        ids.iter()
            .map(|id| {
                self.facilities
                    .get(id)
                    .cloned()
                    .ok_or(ConfigError::UnknownFacility(*id))
            })
            .collect()
    }
}
