// src/core/types.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Flavor name -> ingredient names, in the order they were loaded.
pub type FlavorIndex = IndexMap<String, Vec<String>>;

/// Ingredient name -> flavor names, in the order they were loaded.
pub type IngredientIndex = IndexMap<String, Vec<String>>;

/// Canonical ingredient name -> free-text variants (spellings, synonyms, regional names).
/// Iteration order is significant: later entries win variant collisions and the
/// substring scan stops at the first hit.
pub type AliasTable = IndexMap<String, Vec<String>>;

/// The two static tables, loaded once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tables {
    pub flavors: FlavorIndex,
    pub ingredients: IngredientIndex,
}

/// A resolved name together with the values listed under it.
/// For a flavor these are ingredients (load order); for an ingredient they are
/// flavors, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryResult {
    Flavor(Match),
    Ingredient(Match),
    /// The ingredient pairs with every known flavor.
    IngredientAll(Match),
    /// The ingredient resolved to a canonical entry but none of its variants list any flavor.
    IngredientNone(Match),
}

impl QueryResult {
    pub fn matched(&self) -> &Match {
        match self {
            QueryResult::Flavor(m)
            | QueryResult::Ingredient(m)
            | QueryResult::IngredientAll(m)
            | QueryResult::IngredientNone(m) => m,
        }
    }

    pub fn name(&self) -> &str {
        &self.matched().name
    }

    pub fn values(&self) -> &[String] {
        &self.matched().values
    }

    /// The flavors this result stands for: the flavor itself, or the ingredient's flavors.
    pub fn matched_flavors(&self) -> Vec<&str> {
        match self {
            QueryResult::Flavor(m) => vec![m.name.as_str()],
            other => other.values().iter().map(String::as_str).collect(),
        }
    }
}

/// Why a query produced candidates instead of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionReason {
    /// Blank input.
    EmptyQuery,
    /// Two or more flavors contain the query.
    Ambiguous,
    /// Flavor or ingredient names containing the query.
    Substring,
    /// Close spellings, best first.
    Fuzzy,
    /// Nothing cleared any cutoff.
    NoMatch,
}

/// "Did you mean" candidates. Scores are never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionList {
    pub reason: SuggestionReason,
    pub candidates: Vec<String>,
}

impl SuggestionList {
    pub fn new(reason: SuggestionReason, candidates: Vec<String>) -> Self {
        Self { reason, candidates }
    }

    pub fn empty(reason: SuggestionReason) -> Self {
        Self::new(reason, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// A classified result plus the flavors it does not cover, for the caller to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved {
    pub result: QueryResult,
    pub missing_flavors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Resolved(Resolved),
    Suggestions(SuggestionList),
}

impl Resolution {
    pub fn resolved(&self) -> Option<&Resolved> {
        match self {
            Resolution::Resolved(r) => Some(r),
            Resolution::Suggestions(_) => None,
        }
    }

    pub fn suggestions(&self) -> Option<&SuggestionList> {
        match self {
            Resolution::Suggestions(s) => Some(s),
            Resolution::Resolved(_) => None,
        }
    }
}
