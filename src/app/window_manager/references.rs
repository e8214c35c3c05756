//! Reference image windows.
//!
//! A reference window floats an image next to a document and moves with it,
//! keeping whatever offset the user last gave it.

use super::WindowManager;
use crate::messages::OutboundMessage;
use crate::traits::{FileFilter, OpenDialog, ReferenceOptions, WindowHandle, WindowId};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

pub const REFERENCE_WINDOW_SIZE: (u32, u32) = (480, 340);

/// A reference window and the document it follows.
#[derive(Clone)]
pub struct ReferenceLink {
    pub parent: WindowId,
    pub window: Arc<dyn WindowHandle>,
    /// Reference position minus parent position
    pub offset: (i32, i32),
}

impl fmt::Debug for ReferenceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceLink")
            .field("parent", &self.parent)
            .field("window", &self.window.id())
            .field("offset", &self.offset)
            .finish()
    }
}

fn offset_between(child: (i32, i32), parent: (i32, i32)) -> (i32, i32) {
    (child.0 - parent.0, child.1 - parent.1)
}

impl WindowManager {
    /// Ask for images and open each in a reference window attached to `parent`.
    pub async fn open_reference_window(&self, parent: WindowId) -> Result<()> {
        let Some(parent_window) = self.session_window(parent) else {
            log::warn!("Reference window requested for unknown window {}", parent);
            return Ok(());
        };
        let images = self
            .services
            .dialogs
            .pick_files(OpenDialog {
                parent: Some(parent),
                filter: FileFilter::Images,
                multiple: true,
            })
            .await;

        for image in images {
            let (width, height) = REFERENCE_WINDOW_SIZE;
            let window = self
                .services
                .windows
                .reference_window(ReferenceOptions {
                    parent,
                    image,
                    width,
                    height,
                })
                .await?;
            let offset = offset_between(window.position(), parent_window.position());
            self.references.lock().push(ReferenceLink {
                parent,
                window,
                offset,
            });
        }
        Ok(())
    }

    /// References following `parent`.
    pub fn references_of(&self, parent: WindowId) -> Vec<ReferenceLink> {
        self.references
            .lock()
            .iter()
            .filter(|link| link.parent == parent)
            .cloned()
            .collect()
    }

    /// A window moved: drag its references along, or remember a reference's
    /// new offset.
    pub fn on_moved(&self, id: WindowId) {
        if let Some(parent_window) = self.session_window(id) {
            let (x, y) = parent_window.position();
            for link in self.references_of(id) {
                link.window.set_position(x + link.offset.0, y + link.offset.1);
            }
            return;
        }

        let moved = {
            let references = self.references.lock();
            references
                .iter()
                .find(|link| link.window.id() == id)
                .map(|link| (link.parent, link.window.position()))
        };
        let Some((parent, position)) = moved else {
            return;
        };
        let Some(parent_window) = self.session_window(parent) else {
            return;
        };
        let offset = offset_between(position, parent_window.position());
        if let Some(link) = self
            .references
            .lock()
            .iter_mut()
            .find(|link| link.window.id() == id)
        {
            link.offset = offset;
        }
    }

    /// Returns whether `id` was a reference window.
    pub(crate) fn on_reference_closed(&self, id: WindowId) -> bool {
        let mut references = self.references.lock();
        let before = references.len();
        references.retain(|link| link.window.id() != id);
        references.len() != before
    }

    /// Close every reference following `parent`.
    pub(crate) fn close_references_of(&self, parent: WindowId) {
        let closing: Vec<ReferenceLink> = {
            let mut references = self.references.lock();
            let (closing, keep) = references.drain(..).partition(|link| link.parent == parent);
            *references = keep;
            closing
        };
        for link in closing {
            let _ack = link.window.close();
        }
    }

    /// Let the renderer pick a single image for its own reference layer.
    pub async fn open_reference_image(&self, sender: WindowId) {
        let Some(window) = self.session_window(sender) else {
            log::warn!("Reference image requested by unknown window {}", sender);
            return;
        };
        let files = self
            .services
            .dialogs
            .pick_files(OpenDialog {
                parent: Some(sender),
                filter: FileFilter::Images,
                multiple: false,
            })
            .await;
        if let Some(file) = files.into_iter().next() {
            window.send(OutboundMessage::SetReferenceImage { file });
        }
    }
}
