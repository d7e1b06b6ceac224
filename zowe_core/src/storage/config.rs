use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use super::store::config_dir;
use crate::connections::errors::ZoweError;

/// Setting keys shared by the stores.
pub mod keys {
    pub const COMMAND_HISTORY: &str = "zowe.commands.history";
    pub const MAX_HISTORY: &str = "zowe.commands.maxHistory";
    pub const DEFAULT_PROFILE: &str = "zowe.profiles.default";
    pub const CLI_PATH: &str = "zowe.cli.path";
}

/// A flat JSON object of dotted setting names, persisted as one file.
///
/// Cloning is cheap: clones share the same in-memory object. Every
/// `update` rewrites the whole file; there is no merge with concurrent
/// writers from other processes.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    values: Arc<Mutex<Map<String, Value>>>,
}

impl ConfigStore {
    /// `<config dir>/settings.json`.
    pub fn open_default() -> Result<Self, ZoweError> {
        Self::open(config_dir()?.join("settings.json"))
    }

    /// Reads the file if it exists; a missing file is an empty object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ZoweError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    return Err(ZoweError::Format(format!(
                        "{} does not contain a JSON object",
                        path.display()
                    )))
                }
                Err(e) => {
                    return Err(ZoweError::Format(format!("{}: {}", path.display(), e)))
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded {} setting(s) from {:?}", values.len(), path);
        Ok(Self {
            path: Some(path),
            values: Arc::new(Mutex::new(values)),
        })
    }

    /// Never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Arc::new(Mutex::new(Map::new())),
        }
    }

    /// `None` when the key is missing or does not deserialize into `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let values = self.values.lock().await;
        let value = values.get(key)?.clone();
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("Ignoring setting '{}': {}", key, e);
                None
            }
        }
    }

    pub async fn update<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ZoweError> {
        let value = serde_json::to_value(value)?;
        let mut values = self.values.lock().await;
        values.insert(key.to_string(), value);
        self.persist(&values)
    }

    pub async fn remove(&self, key: &str) -> Result<(), ZoweError> {
        let mut values = self.values.lock().await;
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<(), ZoweError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_atomically(path, |file| {
            serde_json::to_writer_pretty(&mut *file, values)?;
            Ok(())
        })
    }
}

/// Writes through a temporary file next to `path` and renames it into place,
/// so readers see either the old or the new content, never a partial file.
pub(crate) fn write_atomically(
    path: &Path,
    write: impl FnOnce(&mut fs::File) -> Result<(), ZoweError>,
) -> Result<(), ZoweError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ZoweError::IoError(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn updates_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("settings.json");

        let config = ConfigStore::open(&path).unwrap();
        assert_eq!(config.get::<u32>(keys::MAX_HISTORY).await, None);
        config.update(keys::MAX_HISTORY, &8u32).await.unwrap();

        let reopened = ConfigStore::open(&path).unwrap();
        assert_eq!(reopened.get::<u32>(keys::MAX_HISTORY).await, Some(8));
        reopened.remove(keys::MAX_HISTORY).await.unwrap();
        assert_eq!(ConfigStore::open(&path).unwrap().get::<u32>(keys::MAX_HISTORY).await, None);
    }

    #[tokio::test]
    async fn wrong_type_reads_as_missing() {
        let config = ConfigStore::in_memory();
        config.update(keys::MAX_HISTORY, &"five").await.unwrap();
        assert_eq!(config.get::<u32>(keys::MAX_HISTORY).await, None);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "[1, 2]").unwrap();
        let err = ConfigStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("settings.json"));
    }

    #[tokio::test]
    async fn failed_write_keeps_the_previous_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        let config = ConfigStore::open(&path).unwrap();
        config.update(keys::DEFAULT_PROFILE, &"prod").await.unwrap();

        let result = write_atomically(&path, |file| {
            use std::io::Write;
            file.write_all(b"{\"zowe.profiles.def")?;
            Err(ZoweError::IoError(io::Error::other("No space left on device")))
        });
        assert!(result.is_err());

        let reopened = ConfigStore::open(&path).unwrap();
        assert_eq!(
            reopened.get::<String>(keys::DEFAULT_PROFILE).await.as_deref(),
            Some("prod")
        );
        let leftovers = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file was not cleaned up");
    }
}
