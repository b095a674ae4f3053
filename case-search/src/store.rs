//! Persisted key/value state.
//!
//! Values are JSON values; typed access goes through serde. Writes are visible to the next read right away, and a
//! [`FileStore`] flushes the whole map to disk after each write so that the state survives restarts.

use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::OhNo;

/// String-keyed store of JSON values.
pub trait Store {
  fn raw(&self, key: &str) -> Option<Value>;

  /// Set a key; `None` deletes it.
  fn put_raw(&mut self, key: &str, value: Option<Value>);

  fn keys(&self) -> Vec<String>;

  fn contains(&self, key: &str) -> bool {
    self.raw(key).is_some()
  }

  /// Typed value at `key`, or `default` if it is absent or cannot be decoded.
  fn get<T>(&self, key: &str, default: T) -> T
  where
    Self: Sized,
    T: DeserializeOwned,
  {
    match self.raw(key) {
      Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
        log::warn!("ignoring persisted value for {key}: {err}");
        default
      }),

      None => default,
    }
  }

  fn set<T>(&mut self, key: &str, value: Option<T>)
  where
    Self: Sized,
    T: Serialize,
  {
    match value.map(serde_json::to_value).transpose() {
      Ok(value) => self.put_raw(key, value),
      Err(err) => log::error!("cannot encode value for {key}: {err}"),
    }
  }
}

/// Store living only as long as the process.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryStore {
  values: BTreeMap<String, Value>,
}

impl Store for MemoryStore {
  fn raw(&self, key: &str) -> Option<Value> {
    self.values.get(key).cloned()
  }

  fn put_raw(&mut self, key: &str, value: Option<Value>) {
    match value {
      Some(value) => {
        self.values.insert(key.to_owned(), value);
      }

      None => {
        self.values.remove(key);
      }
    }
  }

  fn keys(&self) -> Vec<String> {
    self.values.keys().cloned().collect()
  }
}

/// Store backed by a JSON file.
#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  memory: MemoryStore,
}

impl FileStore {
  /// Open the store at `path`, starting empty if the file does not exist yet.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, OhNo> {
    let path = path.into();

    if let Some(dir) = path.parent() {
      fs::create_dir_all(dir).map_err(|err| OhNo::CannotCreateDir {
        dir: dir.to_owned(),
        err,
      })?;
    }

    let values = if path.exists() {
      log::debug!("loading state from {}", path.display());

      let content = fs::read_to_string(&path).map_err(|err| OhNo::CannotReadFile {
        file: path.clone(),
        err,
      })?;

      serde_json::from_str(&content).map_err(|err| OhNo::CorruptedState {
        file: path.clone(),
        err: err.to_string(),
      })?
    } else {
      log::info!("no state at {}; starting fresh", path.display());
      BTreeMap::new()
    };

    Ok(Self {
      path,
      memory: MemoryStore { values },
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn flush(&self) -> Result<(), OhNo> {
    let content =
      serde_json::to_string_pretty(&self.memory.values).map_err(|err| OhNo::CorruptedState {
        file: self.path.clone(),
        err: err.to_string(),
      })?;

    // write aside then rename, so that a crash never leaves a truncated file
    let tmp = self.path.with_extension("json.tmp");
    fs::write(&tmp, content).map_err(|err| OhNo::CannotWriteFile {
      file: tmp.clone(),
      err,
    })?;
    fs::rename(&tmp, &self.path).map_err(|err| OhNo::CannotWriteFile {
      file: self.path.clone(),
      err,
    })
  }
}

impl Store for FileStore {
  fn raw(&self, key: &str) -> Option<Value> {
    self.memory.raw(key)
  }

  fn put_raw(&mut self, key: &str, value: Option<Value>) {
    self.memory.put_raw(key, value);

    if let Err(err) = self.flush() {
      log::error!("cannot persist state: {err}");
    }
  }

  fn keys(&self) -> Vec<String> {
    self.memory.keys()
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::{FileStore, MemoryStore, Store};
  use crate::error::OhNo;

  #[test]
  fn defaults_and_deletion() {
    let mut store = MemoryStore::default();

    assert!(store.get("text", true));
    assert_eq!(store.get("textElts", Vec::<String>::new()), Vec::<String>::new());

    store.set("text", Some("hello"));
    assert_eq!(store.get("text", String::new()), "hello");
    assert!(store.contains("text"));

    store.set::<bool>("text", None);
    assert!(!store.contains("text"));
    assert!(store.keys().is_empty());
  }

  #[test]
  fn mismatched_type_falls_back() {
    let mut store = MemoryStore::default();
    store.set("sensitiveCase", Some("yes"));

    assert!(!store.get("sensitiveCase", false));
  }

  #[test]
  fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/state.json");

    {
      let mut store = FileStore::open(&path).unwrap();
      store.set("filesToIncludeElts", Some(vec!["filesToInclude-0"]));
      store.set("filesToInclude-0", Some(true));
      store.set("filesToInclude-0-label", Some("*.ts"));
      store.set("gone", Some(1));
      store.set::<i32>("gone", None);
    }

    let store = FileStore::open(&path).unwrap();
    assert_eq!(
      store.get("filesToIncludeElts", Vec::<String>::new()),
      ["filesToInclude-0"]
    );
    assert!(store.get("filesToInclude-0", false));
    assert_eq!(store.get("filesToInclude-0-label", String::new()), "*.ts");
    assert!(!store.contains("gone"));
    assert_eq!(store.keys().len(), 3);
  }

  #[test]
  fn corrupted_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{ nope").unwrap();

    assert!(matches!(
      FileStore::open(&path),
      Err(OhNo::CorruptedState { .. })
    ));
  }
}
