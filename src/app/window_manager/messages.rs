//! Inbound renderer message dispatch for WindowManager.

use super::{ModalError, ModalRequest, WindowManager};
use crate::messages::{InboundMessage, OutboundMessage};
use crate::pages::ModalKind;
use crate::recent::RecentFiles;
use crate::traits::WindowId;
use anyhow::Result;
use moebius_config::keys;
use serde_json::Value;
use std::sync::Arc;

impl WindowManager {
    /// Handle one message from the renderer in window `sender`.
    ///
    /// Failures are logged; a misbehaving renderer never takes the host down.
    pub async fn handle_message(&self, sender: WindowId, message: InboundMessage) {
        let channel = message.channel();
        log::debug!("Received {} from window {}", channel, sender);
        if let Err(e) = self.dispatch_message(sender, message).await {
            match e.downcast_ref::<ModalError>() {
                Some(ModalError::SessionNotFound(id)) => {
                    log::warn!("Ignoring {} for unknown window {}", channel, id)
                }
                _ => log::error!("Failed to handle {}: {:#}", channel, e),
            }
        }
    }

    async fn dispatch_message(&self, sender: WindowId, message: InboundMessage) -> Result<()> {
        match message {
            InboundMessage::NewDocument(options) => {
                self.new_document(options).await?;
            }
            InboundMessage::Open => self.open(None).await?,
            InboundMessage::OpenFile { file } => self.open_file(&file).await?,
            InboundMessage::SetFile { id, file } => self.set_file(id, file),
            InboundMessage::DocumentChanged { id } => self.document_changed(id),
            InboundMessage::Ready { id } => self.on_renderer_ready(id),
            InboundMessage::Destroy { id } => self.destroy(id),
            InboundMessage::UpdatePrefs { key, value } => self.update_prefs(&key, value)?,
            InboundMessage::Discord { value } => self.set_discord(value)?,
            InboundMessage::Preferences => self.show_preferences().await?,
            InboundMessage::ShowNewConnectionWindow => self.show_new_connection().await?,
            InboundMessage::ConnectToServer { server, pass } => {
                self.connect_to_server(&server, &pass).await?;
            }
            InboundMessage::GetCanvasSize { id, columns, rows } => {
                self.show_canvas_size(id, columns, rows).await?;
            }
            InboundMessage::GetSauceInfo { id, sauce } => {
                self.show_sauce_info(id, sauce).await?;
            }
            InboundMessage::UpdateSauce { id, sauce } => self.update_sauce(id, sauce),
            InboundMessage::SelectAttribute {
                id,
                fg,
                bg,
                palette,
            } => {
                self.show_select_attribute(id, fg, bg, palette).await?;
            }
            InboundMessage::FkeyPrefs { id, request } => {
                self.show_function_keys(id, request).await?;
            }
            InboundMessage::SetFkey {
                id,
                num,
                fkey_index,
                code,
            } => self.set_fkey(id, num, fkey_index, code)?,
            InboundMessage::ShowRenderingModal { id } => {
                self.show_modal(id, ModalRequest::new(ModalKind::Rendering))
                    .await?;
            }
            InboundMessage::ShowConnectingModal { id } => {
                self.show_modal(id, ModalRequest::new(ModalKind::Connecting))
                    .await?;
            }
            InboundMessage::ShowControlCharacters {
                id,
                method,
                destroy_when_done,
            } => {
                self.show_control_characters(id, method, destroy_when_done)
                    .await?;
            }
            InboundMessage::ShowWarning { id, title, content } => {
                self.show_warning(id, title, content).await?;
            }
            InboundMessage::WarningOk { id } => self.relay_warning(id, true),
            InboundMessage::WarningCancel { id } => self.relay_warning(id, false),
            InboundMessage::ShowLoadingDialog { id, title, message } => {
                self.show_loading(id, title, message).await?;
            }
            InboundMessage::CloseModal { id } => self.close_modal(id).await,
            InboundMessage::ChatInputFocus { id } => self.on_chat_input_focus(id),
            InboundMessage::ChatInputBlur { id } => self.on_chat_input_blur(id),
            InboundMessage::SetModalMenu { id } => self.set_modal_menu(id),
            InboundMessage::SetDocMenu { id } => self.set_doc_menu(id),
            InboundMessage::OpenReferenceImage { .. } => self.open_reference_image(sender).await,
        }
        Ok(())
    }

    /// Persist a preference and tell every document about it.
    pub fn update_prefs(&self, key: &str, value: Value) -> Result<()> {
        self.services.prefs.set(key, value.clone())?;
        let windows: Vec<_> = self
            .registry
            .lock()
            .iter()
            .map(|(_, session)| Arc::clone(&session.window))
            .collect();
        for window in windows {
            window.send(OutboundMessage::PrefChanged {
                key: key.to_string(),
                value: value.clone(),
            });
        }
        if key == keys::RECENT_FILES {
            *self.recent.lock() = RecentFiles::load(self.services.prefs.as_ref());
        }
        if key == keys::DEBUG || key == keys::RECENT_FILES {
            self.rebuild_menus();
        }
        Ok(())
    }

    pub fn set_discord(&self, enabled: bool) -> Result<()> {
        self.services.prefs.set(keys::DISCORD, Value::Bool(enabled))?;
        if enabled {
            self.services.presence.login();
        } else {
            self.services.presence.logout();
        }
        Ok(())
    }

    /// A document renderer finished loading.
    pub fn on_renderer_ready(&self, id: WindowId) {
        self.close_splash();
        if self.pref_bool(keys::SMALLSCALE_GUIDE)
            && let Some(window) = self.session_window(id)
        {
            window.send(OutboundMessage::ToggleSmallscaleGuide(true));
        }
    }
}
