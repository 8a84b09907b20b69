// File: src/editing.rs
use crate::core::types::AliasTable;
use crate::error::Result;
use crate::persistence::AliasStore;

/// Administrative edits to the alias table. The only code that saves it.
pub struct AliasEditor<'a> {
    store: &'a dyn AliasStore,
}

/// Splits a comma-separated variant list, trimming and dropping blanks.
pub fn parse_variants(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|variant| !variant.is_empty())
        .map(str::to_string)
        .collect()
}

impl<'a> AliasEditor<'a> {
    pub fn new(store: &'a dyn AliasStore) -> Self {
        Self { store }
    }

    /// Adds `name`, or replaces its variants in place if it already exists.
    /// A blank name or an empty variant list leaves the table untouched.
    pub fn add_entry(&self, name: &str, variants_csv: &str) -> Result<AliasTable> {
        let mut table = self.store.load()?.table;
        let name = name.trim();
        let variants = parse_variants(variants_csv);
        if name.is_empty() || variants.is_empty() {
            log::warn!("Ignoring alias entry with blank name or no variants");
            return Ok(table);
        }

        table.insert(name.to_string(), variants);
        self.store.save(&table)?;
        Ok(table)
    }

    /// Rebuilds the whole table from `(name, variants_csv)` rows, in row order.
    /// Rows with a blank name or no variants are dropped.
    pub fn replace_all<'r, I>(&self, rows: I) -> Result<AliasTable>
    where
        I: IntoIterator<Item = (&'r str, &'r str)>,
    {
        let mut table = AliasTable::new();
        for (name, variants_csv) in rows {
            let name = name.trim();
            let variants = parse_variants(variants_csv);
            if !name.is_empty() && !variants.is_empty() {
                table.insert(name.to_string(), variants);
            }
        }
        self.store.save(&table)?;
        Ok(table)
    }

    /// Removes `name`, keeping the order of the remaining entries.
    /// Returns whether anything was removed.
    pub fn remove_entry(&self, name: &str) -> Result<bool> {
        let mut table = self.store.load()?.table;
        if table.shift_remove(name.trim()).is_none() {
            return Ok(false);
        }
        self.store.save(&table)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryAliasStore;

    fn seeded() -> MemoryAliasStore {
        let mut table = AliasTable::new();
        table.insert("tomato".into(), vec!["tomato".into()]);
        table.insert("basil".into(), vec!["basil".into()]);
        MemoryAliasStore::new(table)
    }

    #[test]
    fn parses_comma_separated_variants() {
        assert_eq!(parse_variants(" a, b ,,c ,"), vec!["a", "b", "c"]);
        assert!(parse_variants(" , ").is_empty());
    }

    #[test]
    fn add_replaces_existing_entry_in_place() {
        let store = seeded();
        let table = AliasEditor::new(&store)
            .add_entry(" tomato ", "tomato, roma tomato")
            .unwrap();

        let keys: Vec<_> = table.keys().cloned().collect();
        assert_eq!(keys, vec!["tomato", "basil"]);
        assert_eq!(table["tomato"], vec!["tomato", "roma tomato"]);
        assert_eq!(store.load().unwrap().version, 1);
    }

    #[test]
    fn add_appends_new_entry() {
        let store = seeded();
        let table = AliasEditor::new(&store).add_entry("lime", "lime, key lime").unwrap();
        assert_eq!(table.keys().last().map(String::as_str), Some("lime"));
    }

    #[test]
    fn add_with_blank_fields_does_not_save() {
        let store = seeded();
        let editor = AliasEditor::new(&store);
        editor.add_entry("", "x").unwrap();
        editor.add_entry("lime", " , ").unwrap();
        assert_eq!(store.load().unwrap().version, 0);
    }

    #[test]
    fn replace_all_skips_incomplete_rows() {
        let store = seeded();
        let table = AliasEditor::new(&store)
            .replace_all([("lime", "lime"), ("", "orphan"), ("mint", "  "), ("sage", "sage, salvia")])
            .unwrap();

        let keys: Vec<_> = table.keys().cloned().collect();
        assert_eq!(keys, vec!["lime", "sage"]);
        assert_eq!(store.load().unwrap().table, table);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut table = AliasTable::new();
        for name in ["a", "b", "c"] {
            table.insert(name.into(), vec![name.into()]);
        }
        let store = MemoryAliasStore::new(table);
        let editor = AliasEditor::new(&store);

        assert!(editor.remove_entry("b").unwrap());
        assert!(!editor.remove_entry("zzz").unwrap());
        let keys: Vec<_> = store.load().unwrap().table.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
