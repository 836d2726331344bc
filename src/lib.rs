//! Ranks owned manufacturing blueprints by profitability.
//!
//! A run loads the owned blueprint copies, groups them by type, evaluates
//! each type's researched tiers against the configured facilities using
//! recipe and price lookups, then filters, ranks and reports the survivors.

pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod util;

pub use error::{ConfigError, EvaluationError, RemoteLookupError};
