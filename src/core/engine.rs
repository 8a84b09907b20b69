use crate::config::{AppConfig, MatchConfig};
use crate::core::index::{build_token_index, build_variant_map, TokenIndex, VariantMap};
use crate::core::normalize::extract_normalized_tokens;
use crate::core::suggest::SuggestionGenerator;
use crate::core::types::{
    AliasTable, Match, QueryResult, Resolution, Resolved, SuggestionList, SuggestionReason, Tables,
};
use crate::error::Result;
use crate::fuzzy::similarity::{close_matches, MatchingBlocks, Similarity};
use crate::persistence::{load_tables, AliasStore, JsonAliasStore};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// The resolution engine: static tables, the token index built from them,
/// and the matching knobs. Read-only once built, so it can be shared freely.
pub struct FlavorEngine {
    tables: Tables,
    token_index: TokenIndex,
    config: MatchConfig,
    scorer: Box<dyn Similarity>,
}

impl FlavorEngine {
    pub fn new(tables: Tables, config: MatchConfig) -> Result<Self> {
        config.validate()?;
        let token_index = build_token_index(&tables.ingredients);
        Ok(Self {
            tables,
            token_index,
            config,
            scorer: Box::new(MatchingBlocks),
        })
    }

    /// Swaps the similarity function used by every fuzzy stage.
    pub fn with_scorer(mut self, scorer: impl Similarity + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Flavor lookup: exact (case-sensitive), then a unique case-insensitive
    /// substring, then fuzzy candidates.
    ///
    /// Several substring hits are returned as an ambiguous suggestion list.
    pub fn resolve_flavor(&self, query: &str) -> Resolution {
        let query = query.trim();
        if query.is_empty() {
            return Resolution::Suggestions(SuggestionList::empty(SuggestionReason::EmptyQuery));
        }

        if let Some(ingredients) = self.tables.flavors.get(query) {
            log::debug!("Flavor '{}' matched exactly", query);
            return self.flavor_result(query, ingredients);
        }

        let lowered = query.to_lowercase();
        let hits: Vec<&String> = self
            .tables
            .flavors
            .keys()
            .filter(|flavor| flavor.to_lowercase().contains(&lowered))
            .collect();

        match hits.as_slice() {
            [only] => {
                log::debug!("Flavor '{}' matched '{}' by substring", query, only);
                self.flavor_result(only, &self.tables.flavors[*only])
            }
            [] => {
                let fuzzy = close_matches(
                    self.scorer.as_ref(),
                    query,
                    self.tables.flavors.keys().map(String::as_str),
                    self.config.flavor_limit,
                    self.config.flavor_cutoff,
                );
                let reason = if fuzzy.is_empty() {
                    SuggestionReason::NoMatch
                } else {
                    SuggestionReason::Fuzzy
                };
                Resolution::Suggestions(SuggestionList::new(reason, fuzzy))
            }
            many => {
                log::debug!("Flavor '{}' is ambiguous ({} hits)", query, many.len());
                let candidates = many.iter().map(|flavor| flavor.to_string()).collect();
                Resolution::Suggestions(SuggestionList::new(SuggestionReason::Ambiguous, candidates))
            }
        }
    }

    /// Ingredient lookup against one alias snapshot.
    ///
    /// The alias stages run exact, then substring, then fuzzy. The substring
    /// stage takes the first variant in alias-table order that contains the
    /// query; it is not scored. A resolved canonical name collects the flavors
    /// of every one of its variants. Otherwise the query's tokens are looked up
    /// in the token index, then a unique ingredient-name substring is tried,
    /// and finally the suggestion generator runs.
    pub fn resolve_ingredient(&self, aliases: &AliasTable, query: &str) -> Resolution {
        let query = query.trim();
        if query.is_empty() {
            return Resolution::Suggestions(SuggestionList::empty(SuggestionReason::EmptyQuery));
        }

        let lowered = query.to_lowercase();
        let variants = build_variant_map(aliases);

        if let Some(canonical) = self.resolve_canonical(&variants, &lowered) {
            let mut flavors = BTreeSet::new();
            for variant in aliases.get(&canonical).into_iter().flatten() {
                if let Some(listed) = self.tables.ingredients.get(variant) {
                    flavors.extend(listed.iter().cloned());
                }
            }
            return Resolution::Resolved(self.classify_ingredient(canonical, flavors));
        }

        let flavors = self.token_flavors(query);
        if !flavors.is_empty() {
            log::debug!("Ingredient '{}' matched through the token index", query);
            return Resolution::Resolved(self.classify_ingredient(query.to_string(), flavors));
        }

        let hits: Vec<(&String, &Vec<String>)> = self
            .tables
            .ingredients
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&lowered))
            .collect();
        if let [(name, listed)] = hits.as_slice() {
            log::debug!("Ingredient '{}' matched '{}' by substring", query, name);
            let flavors = listed.iter().cloned().collect();
            return Resolution::Resolved(self.classify_ingredient(name.to_string(), flavors));
        }

        let generator = SuggestionGenerator::new(&self.tables, self.scorer.as_ref(), &self.config);
        Resolution::Suggestions(generator.suggest(&variants, query))
    }

    fn resolve_canonical(&self, variants: &VariantMap, lowered: &str) -> Option<String> {
        if let Some(canonical) = variants.get(lowered) {
            log::debug!("Alias exact match: '{}' -> '{}'", lowered, canonical);
            return Some(canonical.to_string());
        }
        if let Some((variant, canonical)) = variants.first_containing(lowered) {
            log::debug!("Alias substring match: '{}' in '{}' -> '{}'", lowered, variant, canonical);
            return Some(canonical.to_string());
        }
        let best = close_matches(
            self.scorer.as_ref(),
            lowered,
            variants.variants(),
            1,
            self.config.alias_cutoff,
        );
        let canonical = best.first().and_then(|variant| variants.get(variant))?;
        log::debug!("Alias fuzzy match: '{}' -> '{}'", lowered, canonical);
        Some(canonical.to_string())
    }

    /// Union of the token-index buckets for every token of `query`.
    fn token_flavors(&self, query: &str) -> BTreeSet<String> {
        extract_normalized_tokens(query)
            .iter()
            .filter_map(|token| self.token_index.flavors_for(token))
            .flatten()
            .cloned()
            .collect()
    }

    fn flavor_result(&self, name: &str, ingredients: &[String]) -> Resolution {
        let result = QueryResult::Flavor(Match {
            name: name.to_string(),
            values: ingredients.to_vec(),
        });
        Resolution::Resolved(self.with_missing(result))
    }

    /// Compares by size against the flavor universe; the two tables are
    /// assumed consistent, so drift between them is not detected here.
    fn classify_ingredient(&self, name: String, flavors: BTreeSet<String>) -> Resolved {
        let values: Vec<String> = flavors.into_iter().collect();
        let matched = Match { name, values };
        let result = if matched.values.len() == self.tables.flavors.len() {
            QueryResult::IngredientAll(matched)
        } else if matched.values.is_empty() {
            QueryResult::IngredientNone(matched)
        } else {
            QueryResult::Ingredient(matched)
        };
        self.with_missing(result)
    }

    fn with_missing(&self, result: QueryResult) -> Resolved {
        let missing_flavors = self.missing_flavors(&result.matched_flavors());
        Resolved {
            result,
            missing_flavors,
        }
    }

    /// Every known flavor not in `matched`, sorted ascending.
    pub fn missing_flavors(&self, matched: &[&str]) -> Vec<String> {
        let matched: HashSet<&str> = matched.iter().copied().collect();
        let mut missing: Vec<String> = self
            .tables
            .flavors
            .keys()
            .filter(|flavor| !matched.contains(flavor.as_str()))
            .cloned()
            .collect();
        missing.sort();
        missing
    }
}

/// Engine plus alias store: what a request handler talks to.
///
/// Ingredient lookups read a fresh alias snapshot each time, so edits made
/// through the store apply without a restart.
pub struct FlavorService {
    engine: Arc<FlavorEngine>,
    aliases: Box<dyn AliasStore>,
}

impl FlavorService {
    pub fn new(engine: Arc<FlavorEngine>, aliases: Box<dyn AliasStore>) -> Self {
        Self { engine, aliases }
    }

    /// Loads the static tables and points the alias store at the configured file.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let tables = load_tables(&config.flavor_path(), &config.ingredient_path())?;
        let engine = FlavorEngine::new(tables, config.matching.clone())?;
        let aliases = JsonAliasStore::new(config.alias_path());
        Ok(Self::new(Arc::new(engine), Box::new(aliases)))
    }

    pub fn engine(&self) -> &FlavorEngine {
        &self.engine
    }

    pub fn aliases(&self) -> &dyn AliasStore {
        self.aliases.as_ref()
    }

    pub fn lookup_flavor(&self, query: &str) -> Resolution {
        self.engine.resolve_flavor(query)
    }

    /// Fails only when the alias snapshot cannot be read.
    pub fn lookup_ingredient(&self, query: &str) -> Result<Resolution> {
        let snapshot = self.aliases.load()?;
        log::debug!(
            "Resolving '{}' against alias snapshot v{} ({} entries)",
            query,
            snapshot.version,
            snapshot.table.len()
        );
        Ok(self.engine.resolve_ingredient(&snapshot.table, query))
    }
}
