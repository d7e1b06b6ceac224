use std::{fs, io, path::PathBuf};

use directories::ProjectDirs;
use log::warn;
use serde_json::Error as SerdeError;

use super::config::write_atomically;
use super::profile::{validate_name, Profile};
use crate::connections::errors::ZoweError;

/// Overrides the platform config dir, e.g. for scripted runs.
pub const CONFIG_DIR_ENV: &str = "ZOWE_RS_CONFIG_DIR";

/// `~/.config/zowe_rs` on Linux, `%APPDATA%\zowe_rs` on Windows, etc.
pub fn config_dir() -> io::Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let proj = ProjectDirs::from("", "", "zowe_rs")
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Unable to locate config dir"))?;
    Ok(proj.config_dir().to_path_buf())
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// `<config dir>/profiles`.
    pub fn new() -> io::Result<Self> {
        Self::at(config_dir()?.join("profiles"))
    }

    pub fn at(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Rejects names that would resolve outside the store directory.
    fn file_for(&self, name: &str) -> Result<PathBuf, ZoweError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Returns every stored profile sorted by name (silently skips malformed files).
    pub fn list(&self) -> io::Result<Vec<Profile>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            match fs::File::open(&path)
                .and_then(|f| serde_json::from_reader(f).map_err(SerdeError::into))
            {
                Ok(profile) => out.push(profile),
                Err(e) => warn!("Could not read {:?}: {e}", path),
            }
        }
        out.sort_by(|a: &Profile, b: &Profile| a.name.cmp(&b.name));
        Ok(out)
    }

    /// Loads one profile; the password field is always empty here.
    pub fn load(&self, name: &str) -> Result<Profile, ZoweError> {
        let file = match fs::File::open(self.file_for(name)?) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ZoweError::ProfileNotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_reader(file)?)
    }

    /// Create or overwrite a profile. The password is not written.
    pub fn save(&self, profile: &Profile) -> Result<(), ZoweError> {
        profile.validate()?;
        write_atomically(&self.file_for(profile.name())?, |file| {
            serde_json::to_writer_pretty(&mut *file, profile)?;
            Ok(())
        })
    }

    /// Delete a preset (`Ok(true)` if removed, `Ok(false)` if it didn’t exist).
    pub fn delete(&self, name: &str) -> Result<bool, ZoweError> {
        match fs::remove_file(self.file_for(name)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
