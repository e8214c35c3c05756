//! Menu action handling for the window manager.
//!
//! This module processes host-level menu commands (New, Open, Preferences,
//! help pages, ...). `window` is the document whose menu was used, if any.

use super::WindowManager;
use crate::menu::MenuAction;
use crate::pages::StaticPage;
use crate::traits::WindowId;

impl WindowManager {
    /// Handle a menu action
    pub async fn handle_menu_action(&self, action: MenuAction, window: Option<WindowId>) {
        log::debug!("Menu action {:?} (window {:?})", action, window);
        let window = window.filter(|id| self.registry.lock().contains(*id));

        let result = match action {
            MenuAction::NewDocument => self.new_document(Default::default()).await.map(|_| ()),
            MenuAction::Open => self.open(window).await,
            MenuAction::OpenInCurrentWindow => match window {
                Some(id) => self.open_in_current_window(id).await,
                None => self.open(None).await,
            },
            MenuAction::OpenRecent { file } => self.open_recent(window, &file).await,
            MenuAction::ClearRecent => {
                self.clear_recent();
                Ok(())
            }
            MenuAction::NewConnection => self.show_new_connection().await,
            MenuAction::OpenReferenceWindow => match window {
                Some(id) => self.open_reference_window(id).await,
                None => Ok(()),
            },
            MenuAction::Preferences => self.show_preferences().await,
            MenuAction::ShowCheatsheet => self.show_static(StaticPage::Cheatsheet).await.map(|_| ()),
            MenuAction::ShowNumpadMappings => {
                self.show_static(StaticPage::NumpadMappings).await.map(|_| ())
            }
            MenuAction::ShowAcknowledgements => {
                self.show_static(StaticPage::Acknowledgements).await.map(|_| ())
            }
            MenuAction::ShowChangelog => self.show_static(StaticPage::Changelog).await.map(|_| ()),
        };

        if let Err(e) = result {
            log::error!("Menu action failed: {:#}", e);
        }
    }
}
