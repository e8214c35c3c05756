//! Menu attachment for WindowManager.
//!
//! With a global menu bar the active menu follows focus, chat input and modal
//! state. With per-window bars each document window simply carries its own
//! document menu.

use super::WindowManager;
use crate::menu::policy::{self, ActiveMenu, MenuSituation};
use crate::menu::{Menu, MenuContext};
use crate::traits::{WindowHandle, WindowId};
use moebius_config::keys;
use std::sync::Arc;

impl WindowManager {
    /// Attach the menu the policy picked for session `id`.
    fn apply_menu(&self, id: WindowId, active: ActiveMenu) {
        if active == ActiveMenu::Application {
            self.install_application_menu();
            return;
        }
        let attachment = {
            let registry = self.registry.lock();
            registry.get(id).map(|session| {
                let menu = match active {
                    ActiveMenu::ChatInput => Arc::clone(&session.chat_input_menu),
                    ActiveMenu::Modal => self.services.menus.modal_menu(),
                    _ => Arc::clone(&session.menu),
                };
                (Arc::clone(&session.window), menu)
            })
        };
        if let Some((window, menu)) = attachment {
            self.menu_bar.set_active_menu(window.as_ref(), &menu);
        }
    }

    fn has_session(&self, id: WindowId) -> bool {
        self.registry.lock().contains(id)
    }

    fn modal_open(&self, id: WindowId) -> Option<bool> {
        self.registry
            .lock()
            .get(id)
            .map(|session| session.has_open_modal())
    }

    /// A document window gained focus.
    pub fn on_focus(&self, id: WindowId) {
        let modal_open = {
            let mut registry = self.registry.lock();
            let Some(session) = registry.get(id) else {
                return;
            };
            let modal_open = session.has_open_modal();
            registry.set_focused(Some(id));
            modal_open
        };
        let active = if self.menu_bar.is_global() {
            policy::resolve(MenuSituation::SessionFocused { modal_open })
        } else {
            ActiveMenu::Document
        };
        self.apply_menu(id, active);
    }

    pub fn on_chat_input_focus(&self, id: WindowId) {
        if !self.menu_bar.is_global() || !self.has_session(id) {
            return;
        }
        self.apply_menu(id, policy::resolve(MenuSituation::ChatInputFocused));
    }

    pub fn on_chat_input_blur(&self, id: WindowId) {
        if !self.menu_bar.is_global() {
            return;
        }
        let Some(modal_open) = self.modal_open(id) else {
            return;
        };
        self.apply_menu(id, policy::resolve(MenuSituation::ChatInputBlurred { modal_open }));
    }

    /// Renderer is about to show a native dialog.
    pub fn set_modal_menu(&self, id: WindowId) {
        if self.menu_bar.is_global() && self.has_session(id) {
            self.apply_menu(id, ActiveMenu::Modal);
        }
    }

    /// Renderer's native dialog is gone.
    pub fn set_doc_menu(&self, id: WindowId) {
        if self.menu_bar.is_global() && self.has_session(id) {
            self.apply_menu(id, ActiveMenu::Document);
        }
    }

    /// Put the session's document menu back after a modal or dialog.
    pub(crate) fn restore_document_menu(&self, id: WindowId) {
        if self.has_session(id) {
            self.apply_menu(id, ActiveMenu::Document);
        } else {
            self.install_application_menu();
        }
    }

    pub fn install_application_menu(&self) {
        self.menu_bar.set_application_menu(&self.application_menu());
    }

    /// Rebuild every session's menus after the debug flag or recent files
    /// changed, then refresh what is attached.
    pub fn rebuild_menus(&self) {
        let recent = self.recent_files();
        let context = MenuContext {
            debug: self.pref_bool(keys::DEBUG),
            recent_files: &recent,
        };
        let (attachments, focused) = {
            let mut registry = self.registry.lock();
            let attachments: Vec<(Arc<dyn WindowHandle>, Arc<Menu>)> = registry
                .iter_mut()
                .map(|(id, session)| {
                    session.menu = Arc::new(self.services.menus.document_menu(id, context));
                    session.chat_input_menu =
                        Arc::new(self.services.menus.chat_input_menu(id, context));
                    (Arc::clone(&session.window), Arc::clone(&session.menu))
                })
                .collect();
            (attachments, registry.focused())
        };

        if !self.menu_bar.is_global() {
            for (window, menu) in &attachments {
                self.menu_bar.set_active_menu(window.as_ref(), menu);
            }
            return;
        }
        match focused.and_then(|id| self.modal_open(id).map(|modal_open| (id, modal_open))) {
            Some((id, modal_open)) => {
                self.apply_menu(id, policy::resolve(MenuSituation::SessionFocused { modal_open }))
            }
            None => self.install_application_menu(),
        }
    }
}
