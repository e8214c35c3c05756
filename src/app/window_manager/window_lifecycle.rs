//! Document window lifecycle for WindowManager.
//!
//! Covers window creation and placement, the open flows, file association,
//! and the unsaved-changes interception on close.

use super::WindowManager;
use crate::messages::{NewDocumentOptions, OutboundMessage};
use crate::session::Session;
use crate::traits::{FileFilter, OpenDialog, WindowHandle, WindowId};
use anyhow::Result;
use moebius_config::keys;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Rows used for a new document when the preference is missing or invalid.
pub const DEFAULT_NEW_DOCUMENT_ROWS: u32 = 25;

/// Largest accepted `new_document_rows` preference.
pub const MAX_NEW_DOCUMENT_ROWS: u32 = 3000;

/// Outcome of a close request on a document window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// The renderer was asked to confirm; the window stays open
    Prevent,
    /// The session was cleaned up and the window destroyed
    Proceed,
}

/// Read the row preference the way a lenient integer parse would: leading
/// digits of a string, or the integer part of a number.
pub(crate) fn parse_document_rows(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64().map(|rows| rows.trunc() as i64),
        Some(Value::String(text)) => {
            let text = text.trim_start();
            let end = text
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
                .map_or(text.len(), |(i, _)| i);
            text[..end].parse::<i64>().ok()
        }
        _ => None,
    };
    match parsed {
        Some(rows) if (1..=MAX_NEW_DOCUMENT_ROWS as i64).contains(&rows) => rows as u32,
        _ => DEFAULT_NEW_DOCUMENT_ROWS,
    }
}

struct OpenTarget {
    id: WindowId,
    window: Arc<dyn WindowHandle>,
    force: bool,
    reusable: bool,
}

impl WindowManager {
    /// Create a document window, register its session and hand it the preferences.
    pub async fn new_document_window(&self) -> Result<Arc<dyn WindowHandle>> {
        let window = self.services.windows.document_window().await?;

        let work_area = self.services.windows.primary_work_area();
        let next = self.registry.lock().next_position(work_area);
        if let Some((x, y)) = next {
            window.set_position(x, y);
        }

        let id = window.id();
        let (menu, chat_input_menu) = self.build_session_menus(id);
        let session = Session::new(Arc::clone(&window), Arc::clone(&menu), chat_input_menu);
        self.registry.lock().insert(session)?;

        if !self.menu_bar.is_global() {
            self.menu_bar.set_active_menu(window.as_ref(), &menu);
        }
        window.send(OutboundMessage::Prefs(self.services.prefs.get_all()));

        log::info!(
            "Created document window {} (total: {})",
            id,
            self.registry.lock().len()
        );
        Ok(window)
    }

    /// Open a blank document, filling author, group and rows from preferences.
    pub async fn new_document(&self, mut options: NewDocumentOptions) -> Result<WindowId> {
        let window = self.new_document_window().await?;
        if options.author.as_deref().is_none_or(str::is_empty) {
            options.author = Some(self.pref_string(keys::NICK));
        }
        if options.group.as_deref().is_none_or(str::is_empty) {
            options.group = Some(self.pref_string(keys::GROUP));
        }
        if options.rows.is_none_or(|rows| rows == 0) {
            let rows = self.services.prefs.get(keys::NEW_DOCUMENT_ROWS);
            options.rows = Some(parse_document_rows(rows.as_ref()));
        }
        window.send(OutboundMessage::NewDocument(options));
        Ok(window.id())
    }

    /// Bring forward the window already showing `file`, if any.
    pub fn check_if_file_is_already_open(&self, file: &Path) -> bool {
        let window = {
            let registry = self.registry.lock();
            registry
                .find_by_file(file)
                .and_then(|id| registry.get(id))
                .map(|session| Arc::clone(&session.window))
        };
        match window {
            Some(window) => {
                window.show();
                window.focus();
                true
            }
            None => false,
        }
    }

    /// Open `file` in a new window unless it is already open.
    pub async fn open_file(&self, file: &Path) -> Result<()> {
        if self.check_if_file_is_already_open(file) {
            return Ok(());
        }
        let window = self.new_document_window().await?;
        window.send(OutboundMessage::OpenFile {
            file: file.to_path_buf(),
        });
        Ok(())
    }

    /// Load `file` into `window` when that window may take it, otherwise
    /// open or focus it elsewhere. Returns true if the file went into `window`.
    pub(crate) async fn open_into(
        &self,
        window: Option<WindowId>,
        file: &Path,
        force: bool,
    ) -> Result<bool> {
        if let Some(id) = window
            && !self.check_if_file_is_already_open(file)
        {
            let target = {
                let mut registry = self.registry.lock();
                match registry.get_mut(id) {
                    Some(session) if force || session.is_reusable() => {
                        session.file = Some(file.to_path_buf());
                        Some(Arc::clone(&session.window))
                    }
                    _ => None,
                }
            };
            if let Some(target) = target {
                target.send(OutboundMessage::OpenFile {
                    file: file.to_path_buf(),
                });
                return Ok(true);
            }
        }
        self.open_file(file).await?;
        Ok(false)
    }

    /// Show the open dialog for `window` (or for no window) and route the picks.
    pub async fn open(&self, window: Option<WindowId>) -> Result<()> {
        let target = window.and_then(|id| {
            let mut registry = self.registry.lock();
            registry.get_mut(id).map(|session| OpenTarget {
                id,
                window: Arc::clone(&session.window),
                force: std::mem::take(&mut session.open_in_current_window),
                reusable: session.is_reusable(),
            })
        });

        let global = self.menu_bar.is_global();
        if let Some(target) = &target
            && global
        {
            self.menu_bar
                .set_active_menu(target.window.as_ref(), &self.services.menus.modal_menu());
        }

        let parent = target
            .as_ref()
            .filter(|target| target.force || target.reusable)
            .map(|target| target.id);
        let files = self
            .services
            .dialogs
            .pick_files(OpenDialog {
                parent,
                filter: FileFilter::Documents,
                multiple: true,
            })
            .await;

        if let Some(target) = &target
            && global
        {
            self.restore_document_menu(target.id);
        }

        let mut force = target.as_ref().is_some_and(|target| target.force);
        let window = target.map(|target| target.id);
        for file in files {
            if self.open_into(window, &file, force).await? {
                force = false;
            }
        }
        Ok(())
    }

    /// Like [`open`](Self::open), but the picked file replaces the window's content.
    pub async fn open_in_current_window(&self, id: WindowId) -> Result<()> {
        let known = {
            let mut registry = self.registry.lock();
            registry
                .get_mut(id)
                .map(|session| session.open_in_current_window = true)
                .is_some()
        };
        if !known {
            log::warn!("Open in current window for unknown window {}", id);
            return Ok(());
        }
        self.open(Some(id)).await
    }

    /// Associate a session with the file it was loaded from or saved to.
    pub fn set_file(&self, id: WindowId, file: PathBuf) {
        let window = {
            let mut registry = self.registry.lock();
            let Some(session) = registry.get_mut(id) else {
                log::warn!("set_file for unknown window {}", id);
                return;
            };
            session.file = Some(file.clone());
            session.edited = false;
            Arc::clone(&session.window)
        };
        let title = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        window.set_represented_file(&file);
        window.set_title(&title);
        window.set_document_edited(false);
        self.services.host.add_recent_document(&file);
        self.add_to_recent(&file);
    }

    pub fn document_changed(&self, id: WindowId) {
        let window = {
            let mut registry = self.registry.lock();
            match registry.get_mut(id) {
                Some(session) if !session.network => {
                    session.edited = true;
                    Some(Arc::clone(&session.window))
                }
                Some(_) => None,
                None => {
                    log::warn!("document_changed for unknown window {}", id);
                    None
                }
            }
        };
        if let Some(window) = window {
            window.set_document_edited(true);
        }
    }

    /// Close a document without asking about unsaved changes.
    pub fn destroy(&self, id: WindowId) {
        let window = {
            let mut registry = self.registry.lock();
            let Some(session) = registry.get_mut(id) else {
                log::warn!("destroy for unknown window {}", id);
                return;
            };
            session.destroyed = true;
            Arc::clone(&session.window)
        };
        // The window layer answers with CloseRequested, which now passes.
        let _ack = window.close();
    }

    /// Open a network session on `server`.
    pub async fn connect_to_server(&self, server: &str, pass: &str) -> Result<WindowId> {
        let window = self.new_document_window().await?;
        let id = window.id();
        if let Some(session) = self.registry.lock().get_mut(id) {
            session.network = true;
        }
        window.set_title(server);
        window.send(OutboundMessage::ConnectToServer {
            server: server.to_string(),
            pass: pass.to_string(),
        });
        log::info!("Connecting window {} to {}", id, server);
        Ok(id)
    }

    /// A document window asked to close.
    pub fn on_close_requested(&self, id: WindowId) -> CloseDecision {
        let unsaved_changes = self.pref_bool(keys::UNSAVED_CHANGES);
        let found = self.registry.lock().get(id).map(|session| {
            (
                session.needs_close_confirmation(unsaved_changes),
                Arc::clone(&session.window),
            )
        });
        let Some((needs_confirmation, window)) = found else {
            return CloseDecision::Proceed;
        };
        if needs_confirmation {
            log::info!("Window {} has unsaved changes, asking before closing", id);
            window.send(OutboundMessage::CheckBeforeClosing);
            return CloseDecision::Prevent;
        }
        self.cleanup(id);
        window.destroy();
        CloseDecision::Proceed
    }

    /// Forget a session and tear down the windows that belong to it.
    pub(crate) fn cleanup(&self, id: WindowId) {
        let (session, remaining) = {
            let mut registry = self.registry.lock();
            let session = registry.remove(id);
            (session, registry.len())
        };
        let Some(session) = session else {
            return;
        };
        let had_modal = match session.modal.handle() {
            Some(modal) => {
                let _ack = modal.close();
                true
            }
            None => false,
        };
        self.close_references_of(id);
        if had_modal || remaining == 0 {
            self.install_application_menu();
        }
        log::info!("Cleaned up window {} (remaining: {})", id, remaining);
    }
}
