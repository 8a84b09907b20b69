// File: src/persistence.rs
use crate::core::types::{AliasTable, Tables};
use crate::error::{FlavorError, Result, TableError};
use indexmap::IndexMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::UNIX_EPOCH;
use tempfile::NamedTempFile;

/// An alias table as read at one moment, tagged with the store's version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasSnapshot {
    pub version: u64,
    pub table: AliasTable,
}

/// Backing store for the alias table.
///
/// Resolution only ever calls `load`; `save` belongs to the editing side.
/// Nothing serializes a load against a concurrent save, so a reader may
/// observe either side of an edit.
pub trait AliasStore: Send + Sync {
    fn load(&self) -> Result<AliasSnapshot>;
    fn save(&self, table: &AliasTable) -> Result<()>;
}

/// Alias table kept as pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonAliasStore {
    path: PathBuf,
}

impl JsonAliasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file exactly as stored, for download.
    pub fn export_bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }

    fn version(&self) -> u64 {
        fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0)
    }
}

impl AliasStore for JsonAliasStore {
    fn load(&self) -> Result<AliasSnapshot> {
        let table = read_json_table(&self.path).map_err(|source| FlavorError::AliasLoad {
            path: self.path.clone(),
            source,
        })?;
        Ok(AliasSnapshot {
            version: self.version(),
            table,
        })
    }

    /// Writes to a temp file beside the target, then renames over it, so
    /// readers see either the old file or the new one in full.
    fn save(&self, table: &AliasTable) -> Result<()> {
        write_json_atomic(&self.path, table).map_err(|source| FlavorError::AliasSave {
            path: self.path.clone(),
            source,
        })?;
        log::info!(
            "Saved {} alias entries to {}",
            table.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn write_json_atomic(path: &Path, table: &AliasTable) -> std::io::Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&mut temp_file);
        serde_json::to_writer_pretty(&mut writer, table)?;
        writer.flush()?;
    }
    temp_file.persist(path)?;
    Ok(())
}

/// In-process alias store. Every save bumps the version.
#[derive(Debug, Default)]
pub struct MemoryAliasStore {
    inner: RwLock<AliasSnapshot>,
}

impl MemoryAliasStore {
    pub fn new(table: AliasTable) -> Self {
        Self {
            inner: RwLock::new(AliasSnapshot { version: 0, table }),
        }
    }
}

impl AliasStore for MemoryAliasStore {
    fn load(&self) -> Result<AliasSnapshot> {
        Ok(self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, table: &AliasTable) -> Result<()> {
        let mut snapshot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        snapshot.version += 1;
        snapshot.table = table.clone();
        Ok(())
    }
}

/// Reads a `{ "key": ["value", ...] }` JSON file, keeping key order.
fn read_json_table(path: &Path) -> std::result::Result<IndexMap<String, Vec<String>>, TableError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Loads flavor -> ingredients and ingredient -> flavors. Any failure is fatal.
pub fn load_tables(flavor_path: &Path, ingredient_path: &Path) -> Result<Tables> {
    let load = |path: &Path| {
        read_json_table(path).map_err(|source| FlavorError::StartupLoad {
            path: path.to_path_buf(),
            source,
        })
    };
    let tables = Tables {
        flavors: load(flavor_path)?,
        ingredients: load(ingredient_path)?,
    };
    log::info!(
        "Loaded {} flavors and {} ingredients",
        tables.flavors.len(),
        tables.ingredients.len()
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn aliases() -> AliasTable {
        let mut table = AliasTable::new();
        table.insert("tomato".into(), vec!["tomato".into(), "roma tomato".into()]);
        table.insert("basil".into(), vec!["basil".into(), "thai basil".into()]);
        table
    }

    #[test]
    fn json_store_round_trips_in_order() {
        let dir = tempdir().unwrap();
        let store = JsonAliasStore::new(dir.path().join("nested").join("aliases.json"));
        store.save(&aliases()).unwrap();

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.table, aliases());
        let keys: Vec<_> = snapshot.table.keys().cloned().collect();
        assert_eq!(keys, vec!["tomato", "basil"]);
        assert!(snapshot.version > 0);
    }

    #[test]
    fn export_returns_pretty_json_bytes() {
        let dir = tempdir().unwrap();
        let store = JsonAliasStore::new(dir.path().join("aliases.json"));
        store.save(&aliases()).unwrap();

        let text = String::from_utf8(store.export_bytes().unwrap()).unwrap();
        assert!(text.starts_with("{\n  \"tomato\": [\n    \"tomato\""));
    }

    #[test]
    fn missing_alias_file_is_a_load_error() {
        let dir = tempdir().unwrap();
        let store = JsonAliasStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(FlavorError::AliasLoad { .. })));
    }

    #[test]
    fn corrupt_alias_file_is_a_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        fs::write(&path, "{\"tomato\": \"not a list\"}").unwrap();
        assert!(matches!(
            JsonAliasStore::new(&path).load(),
            Err(FlavorError::AliasLoad { .. })
        ));
    }

    #[test]
    fn memory_store_bumps_version_on_save() {
        let store = MemoryAliasStore::new(aliases());
        assert_eq!(store.load().unwrap().version, 0);

        let mut edited = aliases();
        edited.shift_remove("basil");
        store.save(&edited).unwrap();

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.table.len(), 1);
    }

    #[test]
    fn load_tables_reports_the_failing_path() {
        let dir = tempdir().unwrap();
        let flavors = dir.path().join("flavors.json");
        fs::write(&flavors, r#"{"Sweet": ["honey"]}"#).unwrap();
        let ingredients = dir.path().join("ingredients.json");

        match load_tables(&flavors, &ingredients) {
            Err(FlavorError::StartupLoad { path, .. }) => assert_eq!(path, ingredients),
            other => panic!("expected StartupLoad, got {other:?}"),
        }

        fs::write(&ingredients, r#"{"honey": ["Sweet"]}"#).unwrap();
        let tables = load_tables(&flavors, &ingredients).unwrap();
        assert_eq!(tables.flavors["Sweet"], vec!["honey"]);
        assert_eq!(tables.ingredients["honey"], vec!["Sweet"]);
    }
}
