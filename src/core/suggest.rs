// File: src/core/suggest.rs
use crate::config::MatchConfig;
use crate::core::index::VariantMap;
use crate::core::types::{SuggestionList, SuggestionReason, Tables};
use crate::fuzzy::similarity::{close_matches, Similarity};
use indexmap::IndexSet;

/// Produces "did you mean" candidates once the ingredient cascade has nothing.
///
/// Substring hits across flavors and ingredients come back uncapped, flavors
/// first. Only when there are none does it fall back to fuzzy candidates drawn
/// from flavor names, alias variants and lowercased ingredient names, capped
/// at `suggestion_limit`.
pub struct SuggestionGenerator<'a> {
    tables: &'a Tables,
    scorer: &'a dyn Similarity,
    config: &'a MatchConfig,
}

impl<'a> SuggestionGenerator<'a> {
    pub fn new(tables: &'a Tables, scorer: &'a dyn Similarity, config: &'a MatchConfig) -> Self {
        Self {
            tables,
            scorer,
            config,
        }
    }

    pub fn suggest(&self, variants: &VariantMap, query: &str) -> SuggestionList {
        let query = query.trim();
        if query.is_empty() {
            return SuggestionList::empty(SuggestionReason::EmptyQuery);
        }

        let substring_hits = self.substring_candidates(&query.to_lowercase());
        if !substring_hits.is_empty() {
            log::debug!("{} substring suggestions for '{}'", substring_hits.len(), query);
            return SuggestionList::new(SuggestionReason::Substring, substring_hits);
        }

        let mut pool: IndexSet<String> = self.tables.flavors.keys().cloned().collect();
        pool.extend(variants.variants().map(str::to_string));
        pool.extend(self.tables.ingredients.keys().map(|name| name.to_lowercase()));

        let fuzzy = close_matches(
            self.scorer,
            query,
            pool.iter().map(String::as_str),
            self.config.suggestion_limit,
            self.config.suggestion_cutoff,
        );
        if fuzzy.is_empty() {
            log::debug!("No suggestions for '{}'", query);
            SuggestionList::empty(SuggestionReason::NoMatch)
        } else {
            SuggestionList::new(SuggestionReason::Fuzzy, fuzzy)
        }
    }

    fn substring_candidates(&self, lowered: &str) -> Vec<String> {
        let names = self.tables.flavors.keys().chain(self.tables.ingredients.keys());
        let hits: IndexSet<&String> = names
            .filter(|name| name.to_lowercase().contains(lowered))
            .collect();
        hits.into_iter().cloned().collect()
    }
}
