//! Typed error variants for the moebius-config crate.
//!
//! Callers that only need a message can keep using `anyhow`; the variants are
//! exposed for callers that want to match on specific failure modes.

use thiserror::Error;

/// Errors that can occur when reading, updating or persisting preferences.
///
/// # Example
///
/// ```rust,no_run
/// use moebius_config::PrefsError;
///
/// fn check_err(e: &anyhow::Error) {
///     if let Some(prefs_err) = e.downcast_ref::<PrefsError>() {
///         match prefs_err {
///             PrefsError::Io(io) => eprintln!("I/O error: {io}"),
///             PrefsError::Parse(p) => eprintln!("YAML parse error: {p}"),
///             PrefsError::InvalidValue { key, .. } => eprintln!("Bad value for {key}"),
///         }
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum PrefsError {
    /// An I/O error occurred reading or writing the preferences file.
    #[error("I/O error reading preferences: {0}")]
    Io(#[from] std::io::Error),

    /// The preferences file contained invalid YAML.
    #[error("YAML parse error in preferences: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A value did not have the shape its key requires.
    #[error("invalid value for preference `{key}`: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
