//! Platform abstraction layer for moebius.
//!
//! This module centralises the platform-specific behaviour that would otherwise be
//! scattered across the codebase as inline `#[cfg(target_os = ...)]` blocks.
//!
//! # Conventions
//!
//! - The running platform is resolved once at startup with [`Platform::current`]
//!   and then passed around as a value, so tests can exercise every platform's
//!   rules on any host.
//! - Consumers ask the [`Platform`] value a question instead of branching on
//!   `cfg` attributes.
//!
//! # Contents
//!
//! | Item | Description |
//! |---|---|
//! | [`Platform::has_global_menu_bar`] | One application menu bar vs. a bar per window |
//! | [`Platform::stays_resident`] | Whether the process outlives its last window |
//! | [`Platform::menu_bar`] | The [`MenuBar`] capability for this platform |

use crate::menu::{GlobalMenuBar, MenuBar, PerWindowMenuBar};
use crate::traits::DesktopHost;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        {
            Platform::MacOs
        }
        #[cfg(target_os = "windows")]
        {
            Platform::Windows
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            Platform::Linux
        }
    }

    /// macOS has a single menu bar owned by the application.
    pub fn has_global_menu_bar(self) -> bool {
        self == Platform::MacOs
    }

    /// macOS apps keep running with no windows open.
    pub fn stays_resident(self) -> bool {
        self == Platform::MacOs
    }

    /// Select the menu attachment strategy for this platform.
    pub fn menu_bar(self, host: Arc<dyn DesktopHost>) -> Arc<dyn MenuBar> {
        if self.has_global_menu_bar() {
            Arc::new(GlobalMenuBar::new(host))
        } else {
            Arc::new(PerWindowMenuBar)
        }
    }
}
