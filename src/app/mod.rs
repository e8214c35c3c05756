//! Application module for moebius
//!
//! This module contains the main application logic, including:
//! - `App`: The lifecycle controller that owns the event loop
//! - `WindowManager`: Tracks document sessions and coordinates menus, modals and dialogs

use crate::menu::MenuAction;
use crate::messages::InboundMessage;
use crate::traits::WindowId;
use moebius_config::keys;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

pub mod window_manager;

pub use window_manager::{
    CloseDecision, ModalError, REFERENCE_WINDOW_SIZE, Services, WindowManager,
};

/// Where the application is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Waiting for the desktop shell to finish launching
    Starting,
    /// Handling the ready event
    Ready,
    Running,
    /// Resident with no windows open
    Idle,
    Quitting,
}

/// Something a native window reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Focused,
    Moved,
    /// The user asked to close the window; may be vetoed
    CloseRequested,
    /// The window is gone
    Closed,
}

/// Everything the event loop reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The shell finished launching; `files` came from the command line
    Ready { files: Vec<PathBuf> },
    /// The OS asked us to open a file (macOS open-file)
    OpenFile(PathBuf),
    /// Dock icon clicked
    Activate,
    AllWindowsClosed,
    Message {
        sender: WindowId,
        message: InboundMessage,
    },
    Menu {
        window: Option<WindowId>,
        action: MenuAction,
    },
    Window { id: WindowId, event: WindowEvent },
    Quit,
}

impl AppEvent {
    /// Window events are answered before the next event is taken.
    fn runs_inline(&self) -> bool {
        matches!(
            self,
            AppEvent::Window { .. } | AppEvent::AllWindowsClosed | AppEvent::Quit
        )
    }
}

#[derive(Debug)]
struct Lifecycle {
    state: LifecycleState,
    /// Files the OS asked to open before we were ready
    pending_files: Vec<PathBuf>,
    prevent_splash: bool,
}

/// Application lifecycle controller
pub struct App {
    window_manager: Arc<WindowManager>,
    lifecycle: Mutex<Lifecycle>,
}

impl App {
    pub fn new(window_manager: Arc<WindowManager>) -> Self {
        Self {
            window_manager,
            lifecycle: Mutex::new(Lifecycle {
                state: LifecycleState::Starting,
                pending_files: Vec::new(),
                prevent_splash: false,
            }),
        }
    }

    pub fn window_manager(&self) -> &Arc<WindowManager> {
        &self.window_manager
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.lock().state
    }

    fn set_state(&self, state: LifecycleState) {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != state {
            log::debug!("Lifecycle {:?} -> {:?}", lifecycle.state, state);
            lifecycle.state = state;
        }
    }

    /// Run the event loop until quit.
    ///
    /// Events start in arrival order. Window events are handled before the
    /// next event is taken; everything else runs as its own task so a handler
    /// waiting on a dialog or window creation does not hold up the loop.
    pub async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<AppEvent>) {
        log::info!("Event loop started");
        while let Some(event) = events.recv().await {
            if event.runs_inline() {
                // Handlers spawned for earlier events run up to their first
                // suspension point before this one is seen.
                tokio::task::yield_now().await;
                self.handle_event(event).await;
            } else {
                let app = Arc::clone(&self);
                tokio::spawn(async move { app.handle_event(event).await });
            }
            if self.state() == LifecycleState::Quitting {
                break;
            }
        }
        log::info!("Event loop exited");
    }

    /// Handle one event to completion.
    pub async fn handle_event(&self, event: AppEvent) {
        match event {
            AppEvent::Ready { files } => self.on_ready(files).await,
            AppEvent::OpenFile(file) => self.on_open_file(file).await,
            AppEvent::Activate => self.on_activate().await,
            AppEvent::AllWindowsClosed => self.on_all_windows_closed(),
            AppEvent::Message { sender, message } => {
                self.window_manager.handle_message(sender, message).await
            }
            AppEvent::Menu { window, action } => {
                self.window_manager.handle_menu_action(action, window).await
            }
            AppEvent::Window { id, event } => self.on_window_event(id, event),
            AppEvent::Quit => {
                log::info!("Quit requested");
                self.set_state(LifecycleState::Quitting);
            }
        }
    }

    async fn on_ready(&self, files: Vec<PathBuf>) {
        let (pending, prevent_splash) = {
            let mut lifecycle = self.lifecycle.lock();
            lifecycle.state = LifecycleState::Ready;
            (
                std::mem::take(&mut lifecycle.pending_files),
                lifecycle.prevent_splash,
            )
        };
        let wm = &self.window_manager;
        wm.install_application_menu();
        if wm.pref_bool(keys::DISCORD) {
            wm.services.presence.login();
        }

        if !files.is_empty() {
            for file in &files {
                if let Err(e) = wm.open_file(file).await {
                    log::error!("Failed to open {}: {:#}", file.display(), e);
                }
            }
        } else if !prevent_splash && let Err(e) = wm.show_splash_screen().await {
            log::error!("Failed to show splash screen: {:#}", e);
        }

        for file in &pending {
            if let Err(e) = wm.open_file(file).await {
                log::error!("Failed to open {}: {:#}", file.display(), e);
            }
        }
        self.set_state(LifecycleState::Running);
    }

    async fn on_open_file(&self, file: PathBuf) {
        {
            let mut lifecycle = self.lifecycle.lock();
            if matches!(
                lifecycle.state,
                LifecycleState::Starting | LifecycleState::Ready
            ) {
                log::info!("Queueing {} until ready", file.display());
                lifecycle.pending_files.push(file);
                lifecycle.prevent_splash = true;
                return;
            }
        }
        if let Err(e) = self.window_manager.open_file(&file).await {
            log::error!("Failed to open {}: {:#}", file.display(), e);
        }
        self.set_state(LifecycleState::Running);
    }

    async fn on_activate(&self) {
        let wm = &self.window_manager;
        if !wm.platform().stays_resident() || wm.has_documents_open() {
            return;
        }
        if let Err(e) = wm.show_splash_screen().await {
            log::error!("Failed to show splash screen: {:#}", e);
        }
        if self.state() == LifecycleState::Idle {
            self.set_state(LifecycleState::Running);
        }
    }

    fn on_all_windows_closed(&self) {
        let wm = &self.window_manager;
        if wm.platform().stays_resident() {
            wm.install_application_menu();
            self.set_state(LifecycleState::Idle);
        } else {
            log::info!("Last window closed, exiting application");
            wm.services.host.quit();
            self.set_state(LifecycleState::Quitting);
        }
    }

    fn on_window_event(&self, id: WindowId, event: WindowEvent) {
        let wm = &self.window_manager;
        match event {
            WindowEvent::Focused => wm.on_focus(id),
            WindowEvent::Moved => wm.on_moved(id),
            WindowEvent::CloseRequested => {
                let decision = wm.on_close_requested(id);
                log::debug!("Close of window {}: {:?}", id, decision);
            }
            WindowEvent::Closed => wm.on_window_closed(id),
        }
    }
}
