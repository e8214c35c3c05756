//! Preferences system for the moebius editor host.
//!
//! This crate provides preference loading, saving, and default values
//! for the editor. It includes:
//!
//! - The typed [`Preferences`] record with defaults for every known key
//! - The [`PreferencesStore`] key/value contract consumed by the host
//! - A YAML-backed [`FilePreferences`] store and an in-memory store

pub mod defaults;
mod error;
pub mod preferences;
pub mod store;

pub use error::PrefsError;
pub use preferences::{Preferences, keys};
pub use store::{FilePreferences, MemoryPreferences, PreferencesStore};
