use super::Session;
use crate::traits::{Rect, WindowId};
use std::collections::BTreeMap;
use thiserror::Error;

/// Offset applied to each new window relative to the previous one.
pub const WINDOW_OFFSET: i32 = 30;

/// Size a document window is assumed to occupy when cascading.
pub const DEFAULT_WINDOW_FOOTPRINT: (u32, u32) = (1280, 800);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("window {0} already has a session")]
    DuplicateWindow(WindowId),
}

/// Every open document session, keyed by window id.
///
/// Iteration follows window id order, which is creation order.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<WindowId, Session>,
    last_position: Option<(i32, i32)>,
    focused: Option<WindowId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: Session) -> Result<WindowId, RegistryError> {
        let id = session.id();
        if self.sessions.contains_key(&id) {
            return Err(RegistryError::DuplicateWindow(id));
        }
        self.last_position = Some(session.position);
        self.sessions.insert(id, session);
        Ok(id)
    }

    pub fn get(&self, id: WindowId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Remove a session. Unknown ids are ignored.
    pub fn remove(&mut self, id: WindowId) -> Option<Session> {
        let session = self.sessions.remove(&id)?;
        self.last_position = Some(session.position);
        if self.focused == Some(id) {
            self.focused = None;
        }
        Some(session)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WindowId, &Session)> {
        self.sessions.iter().map(|(id, session)| (*id, session))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (WindowId, &mut Session)> {
        self.sessions.iter_mut().map(|(id, session)| (*id, session))
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.sessions.keys().copied().collect()
    }

    pub fn find_by_file(&self, file: &std::path::Path) -> Option<WindowId> {
        self.iter()
            .find(|(_, session)| session.file.as_deref() == Some(file))
            .map(|(id, _)| id)
    }

    /// First session, in creation order, with an open modal.
    pub fn find_any_with_open_modal(&self) -> Option<WindowId> {
        self.iter()
            .find(|(_, session)| session.has_open_modal())
            .map(|(id, _)| id)
    }

    pub fn last_position(&self) -> Option<(i32, i32)> {
        self.last_position
    }

    /// Cascaded position for the next window, see [`cascade_position`].
    pub fn next_position(&self, work_area: Rect) -> Option<(i32, i32)> {
        cascade_position(self.last_position, work_area)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused.filter(|id| self.sessions.contains_key(id))
    }

    pub fn set_focused(&mut self, id: Option<WindowId>) {
        self.focused = id;
    }
}

/// Where to place a new window so it cascades from the last one.
///
/// Returns `None` when there is no previous window or the offset position
/// would push the default footprint past the work area.
pub fn cascade_position(last: Option<(i32, i32)>, work_area: Rect) -> Option<(i32, i32)> {
    let (last_x, last_y) = last?;
    let max_x = work_area.x + work_area.width as i32 - DEFAULT_WINDOW_FOOTPRINT.0 as i32;
    let max_y = work_area.y + work_area.height as i32 - DEFAULT_WINDOW_FOOTPRINT.1 as i32;
    let (x, y) = (last_x + WINDOW_OFFSET, last_y + WINDOW_OFFSET);
    (x < max_x && y < max_y).then_some((x, y))
}
