//! Static content windows: preferences, connection, splash and help pages.

use super::WindowManager;
use crate::messages::OutboundMessage;
use crate::pages::StaticPage;
use crate::traits::{StaticOptions, WindowHandle};
use anyhow::Result;
use moebius_config::keys;
use serde_json::Value;
use std::sync::Arc;

impl WindowManager {
    /// Open a static page with its fixed geometry.
    pub async fn show_static(&self, page: StaticPage) -> Result<Arc<dyn WindowHandle>> {
        let (width, height) = page.size();
        let window = self
            .services
            .windows
            .static_window(StaticOptions {
                page,
                width,
                height,
                frame: page.has_frame(self.platform),
            })
            .await?;
        log::debug!("Opened {:?} window {}", page, window.id());
        Ok(window)
    }

    pub async fn show_preferences(&self) -> Result<()> {
        let window = self.show_static(StaticPage::Preferences).await?;
        window.send(OutboundMessage::Prefs(self.services.prefs.get_all()));
        Ok(())
    }

    pub async fn show_new_connection(&self) -> Result<()> {
        let window = self.show_static(StaticPage::NewConnection).await?;
        let server = self.pref_string(keys::SERVER);
        if !server.is_empty() {
            let saved_servers = match self.services.prefs.get(keys::SAVED_SERVERS) {
                Some(Value::Array(servers)) => servers,
                _ => Vec::new(),
            };
            window.send(OutboundMessage::SavedServers {
                server,
                pass: self.pref_string(keys::PASS),
                saved_servers,
            });
        }
        Ok(())
    }

    pub async fn show_splash_screen(&self) -> Result<()> {
        let window = self.show_static(StaticPage::Splash).await?;
        *self.splash.lock() = Some(Arc::clone(&window));
        let server = self.pref_string(keys::SERVER);
        if !server.is_empty() {
            window.send(OutboundMessage::SavedServer {
                server,
                pass: self.pref_string(keys::PASS),
            });
        }
        Ok(())
    }

    /// Close the splash screen if it is still up.
    pub fn close_splash(&self) {
        let splash = self.splash.lock().take();
        if let Some(splash) = splash
            && !splash.is_destroyed()
        {
            let _ack = splash.close();
        }
    }
}
