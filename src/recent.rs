//! Most-recently-used document list.

use moebius_config::{PrefsError, PreferencesStore, keys};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Maximum number of entries kept.
pub const RECENT_FILES_CAPACITY: usize = 10;

/// Recent files, most recent first, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentFiles {
    entries: Vec<PathBuf>,
}

impl RecentFiles {
    /// Read the list from the `recent_files` preference.
    pub fn load(store: &dyn PreferencesStore) -> Self {
        Self::from_value(store.get(keys::RECENT_FILES).as_ref())
    }

    /// Build from a raw preference value. Anything but an array of strings
    /// yields an empty list.
    pub fn from_value(value: Option<&Value>) -> Self {
        let mut recent = Self::default();
        if let Some(Value::Array(items)) = value {
            for item in items.iter().rev() {
                if let Value::String(path) = item {
                    recent.add(Path::new(path));
                }
            }
        }
        recent
    }

    /// Move `path` to the front, evicting the oldest entry past capacity.
    pub fn add(&mut self, path: &Path) {
        self.remove(path);
        self.entries.insert(0, path.to_path_buf());
        self.entries.truncate(RECENT_FILES_CAPACITY);
    }

    /// Returns whether the path was present.
    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry != path);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.entries
                .iter()
                .map(|path| Value::String(path.to_string_lossy().into_owned()))
                .collect(),
        )
    }

    pub fn save(&self, store: &dyn PreferencesStore) -> Result<(), PrefsError> {
        store.set(keys::RECENT_FILES, self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moebius_config::MemoryPreferences;
    use serde_json::json;

    #[test]
    fn test_add_moves_existing_entry_to_front() {
        let mut recent = RecentFiles::default();
        recent.add(Path::new("/a.ans"));
        recent.add(Path::new("/b.ans"));
        recent.add(Path::new("/a.ans"));
        assert_eq!(
            recent.entries(),
            &[PathBuf::from("/a.ans"), PathBuf::from("/b.ans")]
        );
    }

    #[test]
    fn test_eleventh_entry_evicts_oldest() {
        let mut recent = RecentFiles::default();
        for i in 0..=RECENT_FILES_CAPACITY {
            recent.add(&PathBuf::from(format!("/file{i}.ans")));
        }
        assert_eq!(recent.entries().len(), RECENT_FILES_CAPACITY);
        assert_eq!(recent.entries()[0], PathBuf::from("/file10.ans"));
        assert!(!recent.entries().contains(&PathBuf::from("/file0.ans")));
    }

    #[test]
    fn test_from_value_keeps_order() {
        let recent = RecentFiles::from_value(Some(&json!(["/new.ans", "/old.ans"])));
        assert_eq!(
            recent.entries(),
            &[PathBuf::from("/new.ans"), PathBuf::from("/old.ans")]
        );
    }

    #[test]
    fn test_non_array_value_is_empty() {
        assert!(RecentFiles::from_value(Some(&json!("oops"))).entries().is_empty());
        assert!(RecentFiles::from_value(None).entries().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryPreferences::default();
        let mut recent = RecentFiles::default();
        recent.add(Path::new("/x.xb"));
        recent.save(&store).unwrap();
        assert_eq!(RecentFiles::load(&store), recent);
    }
}
