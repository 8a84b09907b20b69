// src/lib.rs

pub mod config;
pub mod core;
pub mod editing;
pub mod error;
pub mod fuzzy;
pub mod logging;
pub mod persistence;

pub use crate::core::engine::{FlavorEngine, FlavorService};
pub use crate::core::types::{QueryResult, Resolution, Resolved, SuggestionList, SuggestionReason};
pub use crate::error::{FlavorError, Result};
