//! Where menus get attached.
//!
//! macOS has one menu bar shared by every window; Windows and Linux give each
//! window its own. The coordinator holds one [`MenuBar`] chosen at startup and
//! never branches on the platform itself.

use super::Menu;
use crate::traits::{DesktopHost, WindowHandle};
use std::sync::Arc;

pub trait MenuBar: Send + Sync {
    /// Make `menu` the active menu for `window`.
    fn set_active_menu(&self, window: &dyn WindowHandle, menu: &Arc<Menu>);
    /// Install the default menu shown when no document is active.
    fn set_application_menu(&self, menu: &Arc<Menu>);
    /// True when one menu bar serves every window.
    fn is_global(&self) -> bool;
}

/// Single application-owned menu bar.
pub struct GlobalMenuBar {
    host: Arc<dyn DesktopHost>,
}

impl GlobalMenuBar {
    pub fn new(host: Arc<dyn DesktopHost>) -> Self {
        Self { host }
    }
}

impl MenuBar for GlobalMenuBar {
    fn set_active_menu(&self, window: &dyn WindowHandle, menu: &Arc<Menu>) {
        log::trace!("Global menu -> {:?} for window {}", menu.kind, window.id());
        self.host.set_application_menu(Arc::clone(menu));
    }

    fn set_application_menu(&self, menu: &Arc<Menu>) {
        self.host.set_application_menu(Arc::clone(menu));
    }

    fn is_global(&self) -> bool {
        true
    }
}

/// Menu bar embedded in each window.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerWindowMenuBar;

impl MenuBar for PerWindowMenuBar {
    fn set_active_menu(&self, window: &dyn WindowHandle, menu: &Arc<Menu>) {
        window.set_menu(menu);
    }

    fn set_application_menu(&self, _menu: &Arc<Menu>) {
        // No window to hang it on.
        log::trace!("Ignoring application menu on per-window menu platform");
    }

    fn is_global(&self) -> bool {
        false
    }
}
