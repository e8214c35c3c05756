//! Multi-window coordinator for the editor host
//!
//! This module contains `WindowManager`, which tracks every open document
//! session and brokers access to the shared host resources (menus, dialogs,
//! preferences, the recent-files list).
//!
//! The implementation is split across sub-modules for clarity:
//! - `window_lifecycle`: document window creation, open flows, close interception
//! - `modals`: the per-session modal state machine
//! - `menu_sync`: which menu is attached where
//! - `recent_files`: recent-files ledger updates and reopening
//! - `static_windows`: preferences, splash and help windows
//! - `references`: reference image windows that follow their document
//! - `messages`: inbound renderer message dispatch
//! - `menu_actions`: menu command dispatch
//!
//! # Locking
//!
//! The registry, splash and reference locks are `parking_lot` mutexes and are
//! never held across an `.await`. Handlers copy what they need out of the
//! registry, release the lock, then talk to collaborators.

mod menu_actions;
mod menu_sync;
mod messages;
mod modals;
mod recent_files;
mod references;
mod static_windows;
mod window_lifecycle;

pub use modals::{MODAL_TEARDOWN_BOUND, ModalError, ModalRequest, centered_origin};
pub use references::{REFERENCE_WINDOW_SIZE, ReferenceLink};
pub use window_lifecycle::{CloseDecision, DEFAULT_NEW_DOCUMENT_ROWS, MAX_NEW_DOCUMENT_ROWS};

use crate::menu::{Menu, MenuBar, MenuBuilder, MenuContext};
use crate::platform::Platform;
use crate::recent::RecentFiles;
use crate::session::SessionRegistry;
use crate::traits::{DesktopHost, Dialogs, Presence, WindowFactory, WindowHandle, WindowId};
use moebius_config::PreferencesStore;
use parking_lot::{Mutex, MutexGuard};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Collaborators the coordinator drives.
#[derive(Clone)]
pub struct Services {
    pub windows: Arc<dyn WindowFactory>,
    pub dialogs: Arc<dyn Dialogs>,
    pub host: Arc<dyn DesktopHost>,
    pub menus: Arc<dyn MenuBuilder>,
    pub prefs: Arc<dyn PreferencesStore>,
    pub presence: Arc<dyn Presence>,
}

/// Coordinates document windows and shared host resources
pub struct WindowManager {
    /// Open document sessions
    pub(crate) registry: Mutex<SessionRegistry>,
    /// Recent files, mirrored to the `recent_files` preference
    pub(crate) recent: Mutex<RecentFiles>,
    pub(crate) services: Services,
    /// Global or per-window menu attachment
    pub(crate) menu_bar: Arc<dyn MenuBar>,
    pub(crate) platform: Platform,
    /// Splash screen, if showing
    pub(crate) splash: Mutex<Option<Arc<dyn WindowHandle>>>,
    /// Reference image windows and the documents they follow
    pub(crate) references: Mutex<Vec<ReferenceLink>>,
}

impl WindowManager {
    /// Create a new window manager
    pub fn new(services: Services, platform: Platform) -> Self {
        let menu_bar = platform.menu_bar(Arc::clone(&services.host));
        let recent = RecentFiles::load(services.prefs.as_ref());
        log::info!(
            "Window manager ready (platform {:?}, {} recent files)",
            platform,
            recent.entries().len()
        );
        Self {
            registry: Mutex::new(SessionRegistry::new()),
            recent: Mutex::new(recent),
            services,
            menu_bar,
            platform,
            splash: Mutex::new(None),
            references: Mutex::new(Vec::new()),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Lock the session registry. Do not hold the guard across an `.await`.
    pub fn registry(&self) -> MutexGuard<'_, SessionRegistry> {
        self.registry.lock()
    }

    pub fn has_documents_open(&self) -> bool {
        !self.registry.lock().is_empty()
    }

    pub fn recent_files(&self) -> Vec<PathBuf> {
        self.recent.lock().entries().to_vec()
    }

    pub fn splash_window(&self) -> Option<Arc<dyn WindowHandle>> {
        self.splash.lock().clone()
    }

    pub(crate) fn pref_bool(&self, key: &str) -> bool {
        self.services
            .prefs
            .get(key)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    pub(crate) fn pref_string(&self, key: &str) -> String {
        match self.services.prefs.get(key) {
            Some(Value::String(value)) => value,
            _ => String::new(),
        }
    }

    pub(crate) fn session_window(&self, id: WindowId) -> Option<Arc<dyn WindowHandle>> {
        self.registry
            .lock()
            .get(id)
            .map(|session| Arc::clone(&session.window))
    }

    /// Build the menus for a window against the current debug flag and recent files.
    pub(crate) fn build_session_menus(&self, id: WindowId) -> (Arc<Menu>, Arc<Menu>) {
        let recent = self.recent_files();
        let context = MenuContext {
            debug: self.pref_bool(moebius_config::keys::DEBUG),
            recent_files: &recent,
        };
        (
            Arc::new(self.services.menus.document_menu(id, context)),
            Arc::new(self.services.menus.chat_input_menu(id, context)),
        )
    }

    pub(crate) fn application_menu(&self) -> Arc<Menu> {
        let recent = self.recent_files();
        self.services.menus.application_menu(MenuContext {
            debug: self.pref_bool(moebius_config::keys::DEBUG),
            recent_files: &recent,
        })
    }

    /// Route a `Closed` event from the window layer to whoever owned the window.
    pub fn on_window_closed(&self, id: WindowId) {
        if self.registry.lock().contains(id) {
            log::info!("Document window {} closed by the window layer", id);
            self.cleanup(id);
            return;
        }
        if self.on_modal_closed(id) || self.on_reference_closed(id) {
            return;
        }
        let mut splash = self.splash.lock();
        if splash.as_ref().is_some_and(|window| window.id() == id) {
            *splash = None;
        }
    }
}
