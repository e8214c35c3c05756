//! Menu action definitions for moebius
//!
//! This module defines the `MenuAction` enum that represents the menu commands
//! the host itself handles. Editing commands (undo, copy, tool selection, ...)
//! go straight to the focused renderer and never reach the host.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Actions that can be triggered from the menu system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MenuAction {
    // File menu
    /// Open a new, empty document window
    NewDocument,
    /// Show the open dialog
    Open,
    /// Show the open dialog and load into the focused window even if it has content
    OpenInCurrentWindow,
    /// Reopen a file from the recent files submenu
    OpenRecent { file: PathBuf },
    /// Empty the recent files submenu
    ClearRecent,
    /// Show the connect-to-server window
    NewConnection,
    /// Float a reference image above the focused document
    OpenReferenceWindow,

    // App menu
    /// Open the preferences window
    Preferences,

    // Help menu
    ShowCheatsheet,
    ShowNumpadMappings,
    ShowAcknowledgements,
    ShowChangelog,
}
