//! Shared integration test helpers for moebius.
//!
//! Every test drives the real coordinator against the headless backend.
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::Harness;
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers are used per file.

#![allow(dead_code)]

use moebius::app::{App, AppEvent, Services, WindowManager};
use moebius::backend::{HeadlessBackend, HeadlessWindow};
use moebius::menu::{MenuKind, StandardMenuBuilder};
use moebius::messages::{InboundMessage, NewDocumentOptions, OutboundMessage};
use moebius::platform::Platform;
use moebius::traits::{Presence, WindowHandle, WindowId};
use moebius_config::{MemoryPreferences, Preferences, PreferencesStore, keys};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// Counts presence logins and logouts.
#[derive(Debug, Default)]
pub struct RecordingPresence {
    pub logins: AtomicUsize,
    pub logouts: AtomicUsize,
}

impl RecordingPresence {
    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn logouts(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

impl Presence for RecordingPresence {
    fn login(&self) {
        self.logins.fetch_add(1, Ordering::SeqCst);
    }

    fn logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }
}

/// A coordinator wired to the headless backend, with the backend's window
/// events fed back in by [`Harness::pump`].
pub struct Harness {
    pub backend: HeadlessBackend,
    pub prefs: Arc<MemoryPreferences>,
    pub presence: Arc<RecordingPresence>,
    pub app: Arc<App>,
    events: mpsc::UnboundedReceiver<AppEvent>,
}

impl Harness {
    pub fn new(platform: Platform) -> Self {
        Self::with_prefs(platform, Preferences::default())
    }

    pub fn with_prefs(platform: Platform, prefs: Preferences) -> Self {
        let backend = HeadlessBackend::default();
        let (tx, events) = mpsc::unbounded_channel();
        backend.connect_events(tx);

        let prefs = Arc::new(MemoryPreferences::new(prefs));
        let presence = Arc::new(RecordingPresence::default());
        let backend_arc = Arc::new(backend.clone());
        let services = Services {
            windows: backend_arc.clone(),
            dialogs: backend_arc.clone(),
            host: backend_arc,
            menus: Arc::new(StandardMenuBuilder::new()),
            prefs: prefs.clone(),
            presence: presence.clone(),
        };
        let window_manager = Arc::new(WindowManager::new(services, platform));
        Self {
            backend,
            prefs,
            presence,
            app: Arc::new(App::new(window_manager)),
            events,
        }
    }

    pub fn wm(&self) -> &Arc<WindowManager> {
        self.app.window_manager()
    }

    /// Handle every event the backend has posted, including the ones those
    /// handlers post in turn.
    pub async fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.app.handle_event(event).await;
        }
    }

    /// Handle `event`, then everything it caused.
    pub async fn dispatch(&mut self, event: AppEvent) {
        self.app.handle_event(event).await;
        self.pump().await;
    }

    pub async fn message(&mut self, sender: WindowId, message: InboundMessage) {
        self.dispatch(AppEvent::Message { sender, message }).await;
    }

    /// Open a blank document and return its window id.
    pub async fn new_document(&mut self) -> WindowId {
        let id = self
            .wm()
            .new_document(NewDocumentOptions::default())
            .await
            .expect("new document");
        self.pump().await;
        id
    }

    pub fn window(&self, id: WindowId) -> Arc<HeadlessWindow> {
        self.backend.window(id).expect("window exists")
    }

    pub fn sent(&self, id: WindowId) -> Vec<OutboundMessage> {
        self.window(id).sent()
    }

    /// Kind of the menu currently in the global menu bar.
    pub fn global_menu(&self) -> Option<MenuKind> {
        self.backend.application_menu().map(|menu| menu.kind)
    }

    /// Kind of the menu attached to a window (per-window menu platforms).
    pub fn window_menu(&self, id: WindowId) -> Option<MenuKind> {
        self.window(id).record().menu.map(|menu| menu.kind)
    }

    /// The open modal of session `id`, if any.
    pub fn modal_of(&self, id: WindowId) -> Option<WindowId> {
        let registry = self.wm().registry();
        let session = registry.get(id)?;
        session
            .has_open_modal()
            .then(|| session.modal.handle().map(|modal| modal.id()))
            .flatten()
    }

    /// The `recent_files` preference as stored.
    pub fn prefs_recent(&self) -> Vec<Value> {
        match self.prefs.get(keys::RECENT_FILES) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        }
    }

    pub fn session_count(&self) -> usize {
        self.wm().registry().len()
    }
}
