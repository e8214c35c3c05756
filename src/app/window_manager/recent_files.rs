//! Recent files for WindowManager.

use super::WindowManager;
use crate::traits::{ErrorNotice, WindowId};
use anyhow::Result;
use std::path::Path;

impl WindowManager {
    fn persist_recent(&self) {
        let recent = self.recent.lock().clone();
        if let Err(e) = recent.save(self.services.prefs.as_ref()) {
            log::error!("Failed to save recent files: {}", e);
        }
        self.rebuild_menus();
    }

    /// Record `file` as the most recently used document.
    pub fn add_to_recent(&self, file: &Path) {
        self.recent.lock().add(file);
        self.persist_recent();
    }

    pub fn clear_recent(&self) {
        self.recent.lock().clear();
        self.persist_recent();
        log::info!("Cleared recent files");
    }

    /// Reopen a recent file. A file that no longer exists is dropped from the
    /// list and reported to the user instead.
    pub async fn open_recent(&self, window: Option<WindowId>, file: &Path) -> Result<()> {
        let exists = tokio::fs::try_exists(file).await.unwrap_or(false);
        if !exists {
            log::warn!("Recent file no longer exists: {}", file.display());
            let removed = self.recent.lock().remove(file);
            if removed {
                self.persist_recent();
            }
            self.services
                .dialogs
                .show_error(ErrorNotice::file_not_found(file))
                .await;
            return Ok(());
        }

        let force = window.is_some_and(|id| {
            self.registry
                .lock()
                .get_mut(id)
                .is_some_and(|session| std::mem::take(&mut session.open_in_current_window))
        });
        self.open_into(window, file, force).await?;
        Ok(())
    }
}
