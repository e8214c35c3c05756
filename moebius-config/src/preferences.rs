//! The typed preferences record.
//!
//! Every key the host reads has a field with a default; keys written by
//! renderer windows that the host does not know about are kept in
//! [`Preferences::extra`] so a save never drops them.

use crate::PrefsError;
use crate::defaults;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Preference key names used by the host.
pub mod keys {
    pub const NICK: &str = "nick";
    pub const GROUP: &str = "group";
    pub const NEW_DOCUMENT_ROWS: &str = "new_document_rows";
    pub const RECENT_FILES: &str = "recent_files";
    pub const FKEYS: &str = "fkeys";
    pub const SERVER: &str = "server";
    pub const PASS: &str = "pass";
    pub const SAVED_SERVERS: &str = "saved_servers";
    pub const DISCORD: &str = "discord";
    pub const DEBUG: &str = "debug";
    pub const UNSAVED_CHANGES: &str = "unsaved_changes";
    pub const SMALLSCALE_GUIDE: &str = "smallscale_guide";
    pub const IGNORE_HDPI: &str = "ignore_hdpi";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Author name stamped into new documents
    #[serde(default = "defaults::nick")]
    pub nick: String,

    /// Group name stamped into new documents
    pub group: String,

    /// Row count for new documents (raw value, validated by the host)
    #[serde(default = "defaults::new_document_rows")]
    pub new_document_rows: Value,

    /// Recently opened files, most recent first
    #[serde(deserialize_with = "lenient_string_list")]
    pub recent_files: Vec<String>,

    /// Function key character sets
    #[serde(default = "defaults::fkeys")]
    pub fkeys: Vec<Vec<u32>>,

    /// Last used collaboration server
    pub server: String,

    /// Password for the last used server
    pub pass: String,

    /// Servers remembered by the connection window
    pub saved_servers: Vec<Value>,

    /// Rich presence integration
    #[serde(default = "defaults::bool_false")]
    pub discord: bool,

    /// Show the debug menu
    #[serde(default = "defaults::bool_false")]
    pub debug: bool,

    /// Ask before closing a document with unsaved changes
    #[serde(default = "defaults::bool_true")]
    pub unsaved_changes: bool,

    /// Show the small-scale guide in new documents
    #[serde(default = "defaults::bool_false")]
    pub smallscale_guide: bool,

    /// Force a device scale factor of 1 on Windows
    #[serde(default = "defaults::bool_false")]
    pub ignore_hdpi: bool,

    /// Keys owned by renderer windows
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            nick: defaults::nick(),
            group: String::new(),
            new_document_rows: defaults::new_document_rows(),
            recent_files: Vec::new(),
            fkeys: defaults::fkeys(),
            server: String::new(),
            pass: String::new(),
            saved_servers: Vec::new(),
            discord: false,
            debug: false,
            unsaved_changes: true,
            smallscale_guide: false,
            ignore_hdpi: false,
            extra: BTreeMap::new(),
        }
    }
}

impl Preferences {
    /// Flatten the record into a key/value map.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Look up a single key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().remove(key)
    }

    /// Return a copy with `key` replaced by `value`.
    ///
    /// Fails without modifying anything if the value does not fit the key's
    /// type (for example a string for `debug`).
    pub fn with_value(&self, key: &str, value: Value) -> Result<Self, PrefsError> {
        let mut map = self.to_map();
        map.insert(key.to_string(), value);
        serde_json::from_value(Value::Object(map)).map_err(|source| PrefsError::InvalidValue {
            key: key.to_string(),
            source,
        })
    }
}

/// Accept anything for a string list; non-arrays and non-string entries are
/// dropped instead of failing the whole file.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
