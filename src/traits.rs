//! Contracts between the coordinator and the host platform.
//!
//! The coordinator never talks to a windowing toolkit directly. Everything it
//! needs from the outside world goes through these traits, which lets the
//! headless backend (and tests) stand in for a real desktop.
//!
//! # Window close protocol
//!
//! - [`WindowHandle::close`] is a polite request. For document windows the
//!   window layer answers by reporting `WindowEvent::CloseRequested` to the
//!   coordinator, which may veto it. Other windows close right away.
//! - [`WindowHandle::destroy`] tears the window down unconditionally. The
//!   coordinator calls it once it has allowed a document window to close.
//! - The [`CloseAck`] returned by `close` resolves when the window is really
//!   gone, so callers can wait for teardown instead of sleeping.

use crate::menu::Menu;
use crate::messages::OutboundMessage;
use crate::pages::{ModalKind, StaticPage};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Identity of a native window, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A screen rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Completion signal for [`WindowHandle::close`].
#[derive(Debug)]
pub struct CloseAck(Option<oneshot::Receiver<()>>);

impl CloseAck {
    /// A close that is still in flight; fire the sender once the window is gone.
    pub fn pending() -> (oneshot::Sender<()>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self(Some(rx)))
    }

    /// A close that already completed.
    pub fn done() -> Self {
        Self(None)
    }

    /// Wait for the window layer to confirm the close, at most `bound`.
    ///
    /// Returns `false` if the confirmation did not arrive in time. A dropped
    /// sender counts as confirmation.
    pub async fn wait(self, bound: Duration) -> bool {
        match self.0 {
            None => true,
            Some(rx) => tokio::time::timeout(bound, rx).await.is_ok(),
        }
    }
}

/// A live native window.
pub trait WindowHandle: Send + Sync {
    fn id(&self) -> WindowId;
    fn position(&self) -> (i32, i32);
    fn set_position(&self, x: i32, y: i32);
    fn size(&self) -> (u32, u32);
    fn set_title(&self, title: &str);
    /// Associate the window with a file (proxy icon on macOS)
    fn set_represented_file(&self, path: &Path);
    /// Toggle the platform's unsaved-changes indicator
    fn set_document_edited(&self, edited: bool);
    /// Attach a menu bar to this window (per-window menu platforms)
    fn set_menu(&self, menu: &Arc<Menu>);
    fn show(&self);
    fn focus(&self);
    /// Push a message to the renderer hosted in this window
    fn send(&self, message: OutboundMessage);
    fn close(&self) -> CloseAck;
    fn destroy(&self);
    fn is_destroyed(&self) -> bool;
}

/// Geometry and page for a session-owned modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalOptions {
    pub parent: WindowId,
    pub kind: ModalKind,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub frame: bool,
    pub resizable: bool,
    pub minimizable: bool,
    pub maximizable: bool,
}

/// Geometry and page for a static content window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticOptions {
    pub page: StaticPage,
    pub width: u32,
    pub height: u32,
    pub frame: bool,
}

/// A floating image window attached to a document window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOptions {
    pub parent: WindowId,
    pub image: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Creates native windows.
#[async_trait]
pub trait WindowFactory: Send + Sync {
    async fn document_window(&self) -> Result<Arc<dyn WindowHandle>>;
    async fn static_window(&self, options: StaticOptions) -> Result<Arc<dyn WindowHandle>>;
    async fn modal_window(&self, options: ModalOptions) -> Result<Arc<dyn WindowHandle>>;
    async fn reference_window(&self, options: ReferenceOptions) -> Result<Arc<dyn WindowHandle>>;
    /// Usable area of the primary display (excludes docks and task bars)
    fn primary_work_area(&self) -> Rect;
}

/// Extensions accepted by the document open dialog.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["ans", "xb", "bin", "diz", "asc", "txt", "nfo"];

/// Extensions accepted for reference images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFilter {
    /// Text-art documents, with an "All Files" fallback
    Documents,
    Images,
}

impl FileFilter {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileFilter::Documents => DOCUMENT_EXTENSIONS,
            FileFilter::Images => IMAGE_EXTENSIONS,
        }
    }

    pub fn allows_any_file(self) -> bool {
        self == FileFilter::Documents
    }
}

/// A native open-file dialog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDialog {
    /// Window the dialog is sheet-attached to, if any
    pub parent: Option<WindowId>,
    pub filter: FileFilter,
    pub multiple: bool,
}

/// A blocking error message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub title: String,
    pub message: String,
    pub detail: String,
}

impl ErrorNotice {
    pub fn file_not_found(path: &Path) -> Self {
        Self {
            title: "File Not Found".to_string(),
            message: format!("The file \"{}\" could not be found.", path.display()),
            detail: "It may have been moved, renamed, or deleted.".to_string(),
        }
    }
}

/// Native dialogs.
#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Returns the chosen paths; empty when the user cancels.
    async fn pick_files(&self, request: OpenDialog) -> Vec<PathBuf>;
    async fn show_error(&self, notice: ErrorNotice);
}

/// Application-level services of the desktop shell.
pub trait DesktopHost: Send + Sync {
    /// Install the single global menu bar (global menu platforms)
    fn set_application_menu(&self, menu: Arc<Menu>);
    /// Register a path with the OS recent-documents list
    fn add_recent_document(&self, path: &Path);
    /// Terminate the event loop
    fn quit(&self);
}

/// Rich-presence integration toggled by the `discord` preference.
pub trait Presence: Send + Sync {
    fn login(&self);
    fn logout(&self);
}

/// Presence integration that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPresence;

impl Presence for NoPresence {
    fn login(&self) {
        log::debug!("Presence login requested (no presence backend)");
    }

    fn logout(&self) {
        log::debug!("Presence logout requested (no presence backend)");
    }
}
