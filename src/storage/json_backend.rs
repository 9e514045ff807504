use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::core::{errors::ExpenseError, utils::ensure_dir};

use super::{KeyValueStore, Result};

const VALUE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// File-backed key-value store: each key maps to `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn value_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => {
                tracing::debug!(key, path = %path.display(), bytes = data.len(), "read value");
                Ok(Some(data))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;
        write_atomic(&path, value)?;
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "wrote value");
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ExpenseError::StorageError(format!(
            "invalid storage key `{key}`"
        )))
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Stages `data` next to `path` and renames it into place.
pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_value_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert_eq!(store.get("expenses").unwrap(), None);
    }

    #[test]
    fn values_round_trip_through_files() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested")).unwrap();
        store.set("categories", r#"["Food"]"#).unwrap();
        assert_eq!(store.get("categories").unwrap().as_deref(), Some(r#"["Food"]"#));
        assert!(dir.path().join("nested/categories.json").exists());
        assert!(!dir.path().join("nested/categories.json.tmp").exists());
    }

    #[test]
    fn keys_cannot_escape_root() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        for key in ["../evil", "a/b", "", "with space"] {
            assert!(store.set(key, "[]").is_err(), "{key:?}");
        }
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.set("expenses", "[]").unwrap();

        // A directory squatting on the temp path makes File::create fail.
        let path = store.value_path("expenses").unwrap();
        fs::create_dir_all(tmp_path(&path)).unwrap();

        assert!(store.set("expenses", "[1]").is_err());
        assert_eq!(store.get("expenses").unwrap().as_deref(), Some("[]"));
    }
}
