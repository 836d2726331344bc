//! Error kinds for the prospecting pipeline.
//!
//! The split mirrors how far a failure is allowed to reach:
//! - [`RemoteLookupError`] abandons a single efficiency tier.
//! - [`EvaluationError`] abandons a whole blueprint type.
//! - [`ConfigError`] aborts the run before any evaluation starts.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::TypeId;

#[derive(Debug, Error)]
pub enum RemoteLookupError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("malformed payload from {resource}: {reason}")]
    Malformed { resource: String, reason: String },
}

impl RemoteLookupError {
    pub fn malformed(resource: impl ToString, reason: impl ToString) -> Self {
        Self::Malformed {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("no configured facility can manufacture type {type_id}")]
    NoFacility { type_id: TypeId },
    #[error("no usable market price for type {type_id}")]
    MissingPrice { type_id: TypeId },
    #[error("price lookup failed: {0}")]
    Pricing(#[from] RemoteLookupError),
    #[error("material totals for type {type_id} exceed the supported range")]
    Overflow { type_id: TypeId },
    #[error("calculator returned no prospects for type {type_id}")]
    NoProspects { type_id: TypeId },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("unknown facility id {0}")]
    UnknownFacility(i64),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            name,
            reason: reason.to_string(),
        }
    }
}
