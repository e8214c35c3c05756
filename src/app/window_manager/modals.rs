//! Modal dialogs owned by document sessions.
//!
//! Each session has at most one modal. Show and close requests for a session
//! run one at a time on the session's modal lane; a show request first tears
//! down any modal that is already open and waits (bounded) for the window
//! layer to confirm it is gone before creating the replacement.

use super::WindowManager;
use crate::messages::{FkeyRequest, OutboundMessage, SauceInfo};
use crate::pages::{ModalKind, function_keys_size};
use crate::session::ModalSlot;
use crate::traits::{ModalOptions, WindowId};
use anyhow::Result;
use moebius_config::keys;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Longest wait for the window layer to confirm a modal has closed.
pub const MODAL_TEARDOWN_BOUND: Duration = Duration::from_millis(150);

#[derive(Debug, Error)]
pub enum ModalError {
    #[error("no document session for window {0}")]
    SessionNotFound(WindowId),
    #[error("failed to create {kind:?} modal")]
    Creation {
        kind: ModalKind,
        #[source]
        source: anyhow::Error,
    },
}

/// What to show in a modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalRequest {
    pub kind: ModalKind,
    pub width: u32,
    pub height: u32,
    /// Sent to the modal once it exists
    pub payload: Option<OutboundMessage>,
    pub resizable: bool,
    pub minimizable: bool,
    pub maximizable: bool,
}

impl ModalRequest {
    pub fn new(kind: ModalKind) -> Self {
        let (width, height) = kind.default_size();
        let chrome = kind != ModalKind::Loading;
        Self {
            kind,
            width,
            height,
            payload: None,
            resizable: chrome,
            minimizable: chrome,
            maximizable: chrome,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_payload(mut self, payload: OutboundMessage) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Top-left corner that centers a `modal`-sized window over a window at
/// `position` with `size`. Rounds toward negative infinity.
pub fn centered_origin(position: (i32, i32), size: (u32, u32), modal: (u32, u32)) -> (i32, i32) {
    let x = position.0 + (size.0 as i32 - modal.0 as i32).div_euclid(2);
    let y = position.1 + (size.1 as i32 - modal.1 as i32).div_euclid(2);
    (x, y)
}

impl WindowManager {
    fn modal_lane(&self, id: WindowId) -> Option<Arc<tokio::sync::Mutex<()>>> {
        self.registry
            .lock()
            .get(id)
            .map(|session| Arc::clone(&session.modal_lane))
    }

    /// Show a modal over the document `id`, replacing any modal already open.
    pub async fn show_modal(
        &self,
        id: WindowId,
        request: ModalRequest,
    ) -> Result<WindowId, ModalError> {
        let lane = self.modal_lane(id).ok_or(ModalError::SessionNotFound(id))?;
        let _turn = lane.lock().await;

        self.teardown_modal(id).await;

        let (window, options) = {
            let mut registry = self.registry.lock();
            let session = registry
                .get_mut(id)
                .ok_or(ModalError::SessionNotFound(id))?;
            session.modal = ModalSlot::Creating;
            let (x, y) = centered_origin(
                session.window.position(),
                session.window.size(),
                (request.width, request.height),
            );
            let options = ModalOptions {
                parent: id,
                kind: request.kind,
                x,
                y,
                width: request.width,
                height: request.height,
                frame: false,
                resizable: request.resizable,
                minimizable: request.minimizable,
                maximizable: request.maximizable,
            };
            (Arc::clone(&session.window), options)
        };

        let modal = match self.services.windows.modal_window(options).await {
            Ok(modal) => modal,
            Err(source) => {
                log::error!(
                    "Failed to create {:?} modal for window {}: {:#}",
                    request.kind,
                    id,
                    source
                );
                let menu = {
                    let mut registry = self.registry.lock();
                    registry.get_mut(id).map(|session| {
                        session.modal = ModalSlot::Empty;
                        Arc::clone(&session.menu)
                    })
                };
                if let Some(menu) = menu {
                    self.menu_bar.set_active_menu(window.as_ref(), &menu);
                }
                return Err(ModalError::Creation {
                    kind: request.kind,
                    source,
                });
            }
        };

        let installed = {
            let mut registry = self.registry.lock();
            match registry.get_mut(id) {
                Some(session) => {
                    session.modal = ModalSlot::Open(Arc::clone(&modal));
                    true
                }
                None => false,
            }
        };
        if !installed {
            log::warn!("Window {} closed while its modal was being created", id);
            let _ack = modal.close();
            self.install_application_menu();
            return Err(ModalError::SessionNotFound(id));
        }

        if self.menu_bar.is_global() {
            self.menu_bar
                .set_active_menu(window.as_ref(), &self.services.menus.modal_menu());
        }
        if let Some(payload) = request.payload {
            modal.send(payload);
        }
        log::info!("Opened {:?} modal {} over window {}", request.kind, modal.id(), id);
        Ok(modal.id())
    }

    /// Close the session's modal, if any, and wait for the window layer.
    /// The caller must hold the session's modal lane.
    async fn teardown_modal(&self, id: WindowId) -> bool {
        let closing = {
            let mut registry = self.registry.lock();
            let Some(session) = registry.get_mut(id) else {
                return false;
            };
            match std::mem::take(&mut session.modal) {
                ModalSlot::Open(handle) | ModalSlot::Closing(handle) => {
                    session.modal = ModalSlot::Closing(Arc::clone(&handle));
                    Some(handle)
                }
                other => {
                    session.modal = other;
                    None
                }
            }
        };
        let Some(modal) = closing else {
            return false;
        };

        if !modal.close().wait(MODAL_TEARDOWN_BOUND).await {
            log::warn!(
                "Modal {} did not confirm close within {:?}",
                modal.id(),
                MODAL_TEARDOWN_BOUND
            );
        }

        let mut registry = self.registry.lock();
        if let Some(session) = registry.get_mut(id)
            && matches!(session.modal, ModalSlot::Closing(_))
        {
            session.modal = ModalSlot::Empty;
        }
        true
    }

    /// Close a modal. Without a usable id, the first session with an open
    /// modal is used; with none, nothing happens.
    pub async fn close_modal(&self, id: Option<WindowId>) {
        let resolved = {
            let registry = self.registry.lock();
            match id {
                Some(id) if registry.contains(id) => Some(id),
                _ => registry.find_any_with_open_modal(),
            }
        };
        let Some(id) = resolved else {
            log::debug!("close_modal with no open modal");
            return;
        };
        let Some(lane) = self.modal_lane(id) else {
            return;
        };
        let _turn = lane.lock().await;
        if self.teardown_modal(id).await {
            self.restore_after_modal(id);
        }
    }

    fn restore_after_modal(&self, id: WindowId) {
        match self.session_window(id) {
            Some(window) => {
                window.focus();
                self.restore_document_menu(id);
            }
            None => self.install_application_menu(),
        }
    }

    /// A modal window went away without being asked to. Returns whether
    /// `modal_id` belonged to a session.
    pub(crate) fn on_modal_closed(&self, modal_id: WindowId) -> bool {
        let owner = {
            let mut registry = self.registry.lock();
            let owner = registry
                .iter()
                .find(|(_, session)| {
                    session
                        .modal
                        .handle()
                        .is_some_and(|modal| modal.id() == modal_id)
                })
                .map(|(id, session)| (id, session.modal.is_open()));
            if let Some((id, true)) = owner
                && let Some(session) = registry.get_mut(id)
            {
                session.modal = ModalSlot::Empty;
            }
            owner
        };
        match owner {
            Some((id, was_open)) => {
                if was_open {
                    log::info!("Modal {} of window {} closed", modal_id, id);
                    self.restore_document_menu(id);
                }
                true
            }
            None => false,
        }
    }

    pub async fn show_canvas_size(
        &self,
        id: WindowId,
        columns: u32,
        rows: u32,
    ) -> Result<WindowId, ModalError> {
        let request = ModalRequest::new(ModalKind::CanvasSize)
            .with_payload(OutboundMessage::SetCanvasSize { columns, rows });
        self.show_modal(id, request).await
    }

    pub async fn show_sauce_info(
        &self,
        id: WindowId,
        sauce: SauceInfo,
    ) -> Result<WindowId, ModalError> {
        let request = ModalRequest::new(ModalKind::SauceInfo)
            .with_payload(OutboundMessage::SetSauceInfo(sauce));
        self.show_modal(id, request).await
    }

    pub async fn show_select_attribute(
        &self,
        id: WindowId,
        fg: u32,
        bg: u32,
        palette: Value,
    ) -> Result<WindowId, ModalError> {
        let request = ModalRequest::new(ModalKind::SelectAttribute)
            .with_payload(OutboundMessage::SelectAttribute { fg, bg, palette });
        self.show_modal(id, request).await
    }

    pub async fn show_function_keys(
        &self,
        id: WindowId,
        request: FkeyRequest,
    ) -> Result<WindowId, ModalError> {
        let (width, height) = function_keys_size(request.font_height);
        let request = ModalRequest::new(ModalKind::FunctionKeys)
            .with_size(width, height)
            .with_payload(OutboundMessage::FkeyPrefs(request));
        self.show_modal(id, request).await
    }

    pub async fn show_control_characters(
        &self,
        id: WindowId,
        method: String,
        destroy_when_done: bool,
    ) -> Result<WindowId, ModalError> {
        let request = ModalRequest::new(ModalKind::ControlCharacters).with_payload(
            OutboundMessage::GetSaveData {
                method,
                destroy_when_done,
            },
        );
        self.show_modal(id, request).await
    }

    pub async fn show_warning(
        &self,
        id: WindowId,
        title: String,
        content: String,
    ) -> Result<WindowId, ModalError> {
        let request = ModalRequest::new(ModalKind::Warning)
            .with_payload(OutboundMessage::GetWarningData { title, content });
        self.show_modal(id, request).await
    }

    pub async fn show_loading(
        &self,
        id: WindowId,
        title: String,
        message: String,
    ) -> Result<WindowId, ModalError> {
        let request = ModalRequest::new(ModalKind::Loading)
            .with_payload(OutboundMessage::SetLoadingData { title, message });
        self.show_modal(id, request).await
    }

    /// Push fresh SAUCE data into an open sauce modal.
    pub fn update_sauce(&self, id: WindowId, sauce: SauceInfo) {
        let modal = {
            let registry = self.registry.lock();
            match registry.get(id).map(|session| &session.modal) {
                Some(ModalSlot::Open(modal)) => Some(Arc::clone(modal)),
                _ => None,
            }
        };
        if let Some(modal) = modal {
            modal.send(OutboundMessage::SetSauceInfo(sauce));
        }
    }

    /// Pass the warning modal's answer back to its document.
    pub fn relay_warning(&self, id: WindowId, accepted: bool) {
        let Some(window) = self.session_window(id) else {
            return;
        };
        if window.is_destroyed() {
            return;
        }
        window.send(if accepted {
            OutboundMessage::WarningOk
        } else {
            OutboundMessage::WarningCancel
        });
    }

    /// Store a function key chosen in the editor, or hand a custom block
    /// (`num == -1`) straight to the document.
    pub fn set_fkey(&self, id: WindowId, num: i32, fkey_index: usize, code: u32) -> Result<()> {
        if num == -1 {
            if let Some(window) = self.session_window(id) {
                window.send(OutboundMessage::SetCustomBlock { code });
            }
            return Ok(());
        }
        let mut fkeys = self.services.prefs.snapshot().fkeys;
        let slot = usize::try_from(num)
            .ok()
            .and_then(|num| fkeys.get_mut(fkey_index)?.get_mut(num));
        let Some(slot) = slot else {
            log::warn!("Ignoring function key {} in set {} (out of range)", num, fkey_index);
            return Ok(());
        };
        *slot = code;
        self.update_prefs(keys::FKEYS, serde_json::to_value(fkeys)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_origin() {
        assert_eq!(centered_origin((100, 50), (1280, 800), (300, 190)), (590, 355));
    }

    #[test]
    fn test_centered_origin_rounds_down_when_modal_is_larger() {
        // (200 - 301) / 2 = -50.5, floored
        assert_eq!(centered_origin((0, 0), (200, 200), (301, 200)), (-51, 0));
    }

    #[test]
    fn test_loading_modal_has_no_window_controls() {
        let request = ModalRequest::new(ModalKind::Loading);
        assert!(!request.resizable && !request.minimizable && !request.maximizable);
        assert_eq!((request.width, request.height), (300, 150));
        assert!(ModalRequest::new(ModalKind::Warning).resizable);
    }
}
