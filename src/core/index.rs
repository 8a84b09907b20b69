// src/core/index.rs
use crate::core::normalize::extract_normalized_tokens;
use crate::core::types::{AliasTable, IngredientIndex};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

/// lowercase(variant) -> canonical name, in alias-table order.
///
/// Rebuilt from every alias snapshot and never persisted.
#[derive(Debug, Clone, Default)]
pub struct VariantMap {
    entries: IndexMap<String, String>,
}

impl VariantMap {
    pub fn get(&self, variant: &str) -> Option<&str> {
        self.entries.get(variant).map(String::as_str)
    }

    /// First variant (in insertion order) containing `needle`, with its canonical name.
    pub fn first_containing(&self, needle: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|(variant, _)| variant.contains(needle))
            .map(|(variant, canonical)| (variant.as_str(), canonical.as_str()))
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps every lowercased variant to its canonical name.
///
/// When two canonical entries share a variant, the later entry wins, but the
/// variant keeps the position where it was first seen.
pub fn build_variant_map(aliases: &AliasTable) -> VariantMap {
    let mut entries = IndexMap::new();
    for (canonical, variants) in aliases {
        for variant in variants {
            entries.insert(variant.to_lowercase(), canonical.clone());
        }
    }
    VariantMap { entries }
}

/// normalized token -> every flavor of every ingredient whose name yields that token.
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    buckets: HashMap<String, BTreeSet<String>>,
}

impl TokenIndex {
    pub fn flavors_for(&self, token: &str) -> Option<&BTreeSet<String>> {
        self.buckets.get(token)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Built once from the static ingredient table; alias edits never touch it.
pub fn build_token_index(ingredients: &IngredientIndex) -> TokenIndex {
    let mut buckets: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (ingredient, flavors) in ingredients {
        for token in extract_normalized_tokens(ingredient) {
            buckets
                .entry(token)
                .or_default()
                .extend(flavors.iter().cloned());
        }
    }
    log::debug!(
        "Token index built: {} tokens from {} ingredients",
        buckets.len(),
        ingredients.len()
    );
    TokenIndex { buckets }
}
