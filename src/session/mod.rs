//! Open document sessions.
//!
//! A [`Session`] is the host-side record of one document window: its menus,
//! its modal slot and the flags that decide whether it can be closed or reused.
//! All sessions live in the [`SessionRegistry`].

mod registry;

pub use registry::{
    DEFAULT_WINDOW_FOOTPRINT, RegistryError, SessionRegistry, WINDOW_OFFSET, cascade_position,
};

use crate::menu::Menu;
use crate::traits::{WindowHandle, WindowId};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// State of a session's single modal.
#[derive(Clone, Default)]
pub enum ModalSlot {
    #[default]
    Empty,
    /// Window creation in flight
    Creating,
    Open(Arc<dyn WindowHandle>),
    /// Close requested, waiting for the window layer
    Closing(Arc<dyn WindowHandle>),
}

impl ModalSlot {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalSlot::Open(_))
    }

    /// The modal window, if one exists in any state.
    pub fn handle(&self) -> Option<&Arc<dyn WindowHandle>> {
        match self {
            ModalSlot::Open(handle) | ModalSlot::Closing(handle) => Some(handle),
            ModalSlot::Empty | ModalSlot::Creating => None,
        }
    }
}

impl fmt::Debug for ModalSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModalSlot::Empty => write!(f, "Empty"),
            ModalSlot::Creating => write!(f, "Creating"),
            ModalSlot::Open(handle) => write!(f, "Open({})", handle.id()),
            ModalSlot::Closing(handle) => write!(f, "Closing({})", handle.id()),
        }
    }
}

pub struct Session {
    pub window: Arc<dyn WindowHandle>,
    pub menu: Arc<Menu>,
    pub chat_input_menu: Arc<Menu>,
    pub modal: ModalSlot,
    /// Serializes modal show/close requests for this session
    pub modal_lane: Arc<tokio::sync::Mutex<()>>,
    pub edited: bool,
    pub network: bool,
    pub file: Option<PathBuf>,
    /// Position at creation time
    pub position: (i32, i32),
    pub destroyed: bool,
    /// Next open goes into this window even if it has content
    pub open_in_current_window: bool,
}

impl Session {
    pub fn new(window: Arc<dyn WindowHandle>, menu: Arc<Menu>, chat_input_menu: Arc<Menu>) -> Self {
        let position = window.position();
        Self {
            window,
            menu,
            chat_input_menu,
            modal: ModalSlot::Empty,
            modal_lane: Arc::new(tokio::sync::Mutex::new(())),
            edited: false,
            network: false,
            file: None,
            position,
            destroyed: false,
            open_in_current_window: false,
        }
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    /// An untouched local window that a file can be loaded into.
    pub fn is_reusable(&self) -> bool {
        !self.network && self.file.is_none() && !self.edited
    }

    pub fn has_open_modal(&self) -> bool {
        self.modal.is_open()
    }

    /// Whether closing must be intercepted to ask about unsaved changes.
    pub fn needs_close_confirmation(&self, unsaved_changes_pref: bool) -> bool {
        unsaved_changes_pref && self.edited && !self.destroyed && !self.network
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id())
            .field("modal", &self.modal)
            .field("edited", &self.edited)
            .field("network", &self.network)
            .field("file", &self.file)
            .field("position", &self.position)
            .field("destroyed", &self.destroyed)
            .field("open_in_current_window", &self.open_in_current_window)
            .finish()
    }
}
