//! Key/value preference stores.
//!
//! Preferences are stored in `~/.config/moebius/preferences.yaml`.

use crate::{Preferences, PrefsError};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Key/value access to the persisted preferences.
///
/// Writes are last-write-wins per key.
pub trait PreferencesStore: Send + Sync {
    /// Current value of `key`, if the key is known or was ever written.
    fn get(&self, key: &str) -> Option<Value>;

    /// Replace the value of `key` and persist.
    fn set(&self, key: &str, value: Value) -> Result<(), PrefsError>;

    /// Every key and value, as pushed to windows in the `prefs` message.
    fn get_all(&self) -> Map<String, Value>;

    /// Typed snapshot of the current preferences.
    fn snapshot(&self) -> Preferences;
}

/// Preferences kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    prefs: Mutex<Preferences>,
}

impl MemoryPreferences {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }
}

impl PreferencesStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<Value> {
        self.prefs.lock().get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PrefsError> {
        let mut prefs = self.prefs.lock();
        *prefs = prefs.with_value(key, value)?;
        Ok(())
    }

    fn get_all(&self) -> Map<String, Value> {
        self.prefs.lock().to_map()
    }

    fn snapshot(&self) -> Preferences {
        self.prefs.lock().clone()
    }
}

/// Preferences backed by a YAML file, saved after every write.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    prefs: Mutex<Preferences>,
}

impl FilePreferences {
    /// Load from the default location, falling back to defaults when the
    /// file is missing.
    pub fn load() -> Result<Self, PrefsError> {
        Self::load_from(preferences_path())
    }

    /// Load from a specific file.
    ///
    /// A missing or empty file yields the defaults; a corrupt file is an error.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        log::info!("Preferences path: {:?}", path);

        let prefs = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Preferences::default()
            } else {
                serde_yaml_ng::from_str(&contents)?
            }
        } else {
            log::info!("No preferences file yet, using defaults");
            Preferences::default()
        };

        Ok(Self {
            path,
            prefs: Mutex::new(prefs),
        })
    }

    /// Path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(prefs)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = self.path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl PreferencesStore for FilePreferences {
    fn get(&self, key: &str) -> Option<Value> {
        self.prefs.lock().get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PrefsError> {
        let mut prefs = self.prefs.lock();
        let updated = prefs.with_value(key, value)?;
        self.save(&updated)?;
        *prefs = updated;
        log::debug!("Saved preference {key}");
        Ok(())
    }

    fn get_all(&self) -> Map<String, Value> {
        self.prefs.lock().to_map()
    }

    fn snapshot(&self) -> Preferences {
        self.prefs.lock().clone()
    }
}

/// Get the preferences file path (XDG convention on every platform but Windows)
pub fn preferences_path() -> PathBuf {
    preferences_dir().join("preferences.yaml")
}

/// Get the preferences directory
pub fn preferences_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        dirs::config_dir()
            .map(|dir| dir.join("moebius"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
    #[cfg(not(target_os = "windows"))]
    {
        dirs::home_dir()
            .map(|home| home.join(".config").join("moebius"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use serde_json::json;

    #[test]
    fn test_memory_store_get_set() {
        let store = MemoryPreferences::default();
        store.set(keys::NICK, json!("Horsenburger")).unwrap();
        assert_eq!(store.get(keys::NICK), Some(json!("Horsenburger")));
        assert_eq!(store.snapshot().nick, "Horsenburger");
    }

    #[test]
    fn test_memory_store_rejected_value_leaves_state() {
        let store = MemoryPreferences::default();
        assert!(store.set(keys::UNSAVED_CHANGES, json!(3)).is_err());
        assert_eq!(store.get(keys::UNSAVED_CHANGES), Some(json!(true)));
    }

    #[test]
    fn test_get_all_contains_every_known_key() {
        let all = MemoryPreferences::default().get_all();
        for key in [
            keys::NICK,
            keys::GROUP,
            keys::NEW_DOCUMENT_ROWS,
            keys::RECENT_FILES,
            keys::FKEYS,
            keys::SERVER,
            keys::PASS,
            keys::SAVED_SERVERS,
            keys::DISCORD,
            keys::DEBUG,
            keys::UNSAVED_CHANGES,
            keys::SMALLSCALE_GUIDE,
            keys::IGNORE_HDPI,
        ] {
            assert!(all.contains_key(key), "missing {key}");
        }
    }
}
