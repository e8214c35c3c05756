//! Window layer without a display.
//!
//! Every window is an in-memory record of what the coordinator did to it.
//! Closing and destroying windows posts the same events a real toolkit would,
//! so the full coordinator runs unchanged. Used by the JSON-lines bridge and
//! by the integration tests.

use crate::app::{AppEvent, WindowEvent};
use crate::menu::Menu;
use crate::messages::OutboundMessage;
use crate::pages::{ModalKind, StaticPage};
use crate::traits::{
    CloseAck, DesktopHost, Dialogs, ErrorNotice, ModalOptions, OpenDialog, Rect,
    ReferenceOptions, StaticOptions, WindowFactory, WindowHandle, WindowId,
};
use anyhow::{Result, bail};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Default document window size.
pub const DOCUMENT_WINDOW_SIZE: (u32, u32) = (1280, 800);

/// Where the first document window appears.
pub const DOCUMENT_WINDOW_ORIGIN: (i32, i32) = (100, 100);

/// What a headless window was created as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WindowKind {
    Document,
    Static { page: StaticPage },
    Modal { parent: WindowId, kind: ModalKind },
    Reference { parent: WindowId, image: PathBuf },
}

/// Things the host did that an observer may want to see.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum HostNotice {
    WindowCreated {
        id: WindowId,
        kind: WindowKind,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    WindowClosed {
        id: WindowId,
    },
    Sent {
        window: WindowId,
        message: OutboundMessage,
    },
    Title {
        window: WindowId,
        title: String,
    },
    ApplicationMenu {
        menu: String,
    },
    WindowMenu {
        window: WindowId,
        menu: String,
    },
    DialogRequested {
        parent: Option<WindowId>,
        extensions: Vec<String>,
        multiple: bool,
    },
    Error {
        title: String,
        message: String,
        detail: String,
    },
    Quit,
}

/// Observable state of one headless window.
#[derive(Debug, Clone, Default)]
pub struct WindowRecord {
    pub position: (i32, i32),
    pub size: (u32, u32),
    pub title: String,
    pub represented_file: Option<PathBuf>,
    pub edited: bool,
    pub menu: Option<Arc<Menu>>,
    pub sent: Vec<OutboundMessage>,
    pub visible: bool,
    pub focus_count: usize,
    pub destroyed: bool,
}

pub struct HeadlessWindow {
    id: WindowId,
    kind: WindowKind,
    record: Mutex<WindowRecord>,
    close_waiters: Mutex<Vec<oneshot::Sender<()>>>,
    shared: Weak<Shared>,
}

impl HeadlessWindow {
    pub fn kind(&self) -> &WindowKind {
        &self.kind
    }

    pub fn record(&self) -> WindowRecord {
        self.record.lock().clone()
    }

    /// Messages sent to this window so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.record.lock().sent.clone()
    }

    fn notify(&self, notice: HostNotice) {
        if let Some(shared) = self.shared.upgrade() {
            shared.notify(notice);
        }
    }
}

impl WindowHandle for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn position(&self) -> (i32, i32) {
        self.record.lock().position
    }

    fn set_position(&self, x: i32, y: i32) {
        self.record.lock().position = (x, y);
    }

    fn size(&self) -> (u32, u32) {
        self.record.lock().size
    }

    fn set_title(&self, title: &str) {
        self.record.lock().title = title.to_string();
        self.notify(HostNotice::Title {
            window: self.id,
            title: title.to_string(),
        });
    }

    fn set_represented_file(&self, path: &Path) {
        self.record.lock().represented_file = Some(path.to_path_buf());
    }

    fn set_document_edited(&self, edited: bool) {
        self.record.lock().edited = edited;
    }

    fn set_menu(&self, menu: &Arc<Menu>) {
        self.record.lock().menu = Some(Arc::clone(menu));
        self.notify(HostNotice::WindowMenu {
            window: self.id,
            menu: format!("{:?}", menu.kind),
        });
    }

    fn show(&self) {
        self.record.lock().visible = true;
    }

    fn focus(&self) {
        let mut record = self.record.lock();
        record.visible = true;
        record.focus_count += 1;
    }

    fn send(&self, message: OutboundMessage) {
        self.record.lock().sent.push(message.clone());
        self.notify(HostNotice::Sent {
            window: self.id,
            message,
        });
    }

    fn close(&self) -> CloseAck {
        if self.is_destroyed() {
            return CloseAck::done();
        }
        match self.kind {
            WindowKind::Document => {
                let (tx, ack) = CloseAck::pending();
                self.close_waiters.lock().push(tx);
                if let Some(shared) = self.shared.upgrade() {
                    shared.post(AppEvent::Window {
                        id: self.id,
                        event: WindowEvent::CloseRequested,
                    });
                }
                ack
            }
            _ => {
                self.destroy();
                CloseAck::done()
            }
        }
    }

    fn destroy(&self) {
        {
            let mut record = self.record.lock();
            if record.destroyed {
                return;
            }
            record.destroyed = true;
            record.visible = false;
        }
        for waiter in self.close_waiters.lock().drain(..) {
            let _ = waiter.send(());
        }
        if let Some(shared) = self.shared.upgrade() {
            shared.window_destroyed(self.id);
        }
    }

    fn is_destroyed(&self) -> bool {
        self.record.lock().destroyed
    }
}

struct Shared {
    next_id: AtomicU64,
    windows: Mutex<BTreeMap<WindowId, Arc<HeadlessWindow>>>,
    events: Mutex<Option<mpsc::UnboundedSender<AppEvent>>>,
    observer: Mutex<Option<mpsc::UnboundedSender<HostNotice>>>,
    work_area: Rect,
    scripted_picks: Mutex<VecDeque<Vec<PathBuf>>>,
    pending_pick: Mutex<Option<oneshot::Sender<Vec<PathBuf>>>>,
    dialog_requests: Mutex<Vec<OpenDialog>>,
    errors: Mutex<Vec<ErrorNotice>>,
    application_menu: Mutex<Option<Arc<Menu>>>,
    recent_documents: Mutex<Vec<PathBuf>>,
    fail_modals: AtomicU64,
    /// How long modal creation takes
    modal_delay: Mutex<Option<Duration>>,
    quit: AtomicBool,
}

impl Shared {
    fn post(&self, event: AppEvent) {
        if let Some(events) = self.events.lock().as_ref()
            && events.send(event).is_err()
        {
            log::debug!("Event loop gone, dropping window event");
        }
    }

    fn notify(&self, notice: HostNotice) {
        if let Some(observer) = self.observer.lock().as_ref() {
            let _ = observer.send(notice);
        }
    }

    fn window_destroyed(&self, id: WindowId) {
        self.notify(HostNotice::WindowClosed { id });
        self.post(AppEvent::Window {
            id,
            event: WindowEvent::Closed,
        });
        let any_live = self
            .windows
            .lock()
            .values()
            .any(|window| !window.is_destroyed());
        if !any_live {
            self.post(AppEvent::AllWindowsClosed);
        }
    }
}

/// In-memory window factory, dialogs and desktop host.
#[derive(Clone)]
pub struct HeadlessBackend {
    shared: Arc<Shared>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(Rect::new(0, 25, 2560, 1415))
    }
}

impl HeadlessBackend {
    pub fn new(work_area: Rect) -> Self {
        Self {
            shared: Arc::new(Shared {
                next_id: AtomicU64::new(1),
                windows: Mutex::new(BTreeMap::new()),
                events: Mutex::new(None),
                observer: Mutex::new(None),
                work_area,
                scripted_picks: Mutex::new(VecDeque::new()),
                pending_pick: Mutex::new(None),
                dialog_requests: Mutex::new(Vec::new()),
                errors: Mutex::new(Vec::new()),
                application_menu: Mutex::new(None),
                recent_documents: Mutex::new(Vec::new()),
                fail_modals: AtomicU64::new(0),
                modal_delay: Mutex::new(None),
                quit: AtomicBool::new(false),
            }),
        }
    }

    /// Deliver window events (close requests, closes) to an event loop.
    pub fn connect_events(&self, events: mpsc::UnboundedSender<AppEvent>) {
        *self.shared.events.lock() = Some(events);
    }

    /// Report host activity to `observer`. With an observer attached, file
    /// dialogs wait for [`answer_dialog`](Self::answer_dialog) instead of
    /// returning nothing.
    pub fn connect_observer(&self, observer: mpsc::UnboundedSender<HostNotice>) {
        *self.shared.observer.lock() = Some(observer);
    }

    pub fn window(&self, id: WindowId) -> Option<Arc<HeadlessWindow>> {
        self.shared.windows.lock().get(&id).cloned()
    }

    /// All windows ever created, in creation order.
    pub fn windows(&self) -> Vec<Arc<HeadlessWindow>> {
        self.shared.windows.lock().values().cloned().collect()
    }

    /// Windows that have not been destroyed.
    pub fn live_windows(&self) -> Vec<Arc<HeadlessWindow>> {
        self.windows()
            .into_iter()
            .filter(|window| !window.is_destroyed())
            .collect()
    }

    /// Queue the paths the next file dialog returns.
    pub fn script_dialog(&self, files: Vec<PathBuf>) {
        self.shared.scripted_picks.lock().push_back(files);
    }

    /// Answer the dialog currently waiting, or queue the answer for the next one.
    pub fn answer_dialog(&self, files: Vec<PathBuf>) {
        let pending = self.shared.pending_pick.lock().take();
        match pending {
            Some(tx) => {
                let _ = tx.send(files);
            }
            None => self.script_dialog(files),
        }
    }

    pub fn dialog_requests(&self) -> Vec<OpenDialog> {
        self.shared.dialog_requests.lock().clone()
    }

    pub fn errors(&self) -> Vec<ErrorNotice> {
        self.shared.errors.lock().clone()
    }

    pub fn application_menu(&self) -> Option<Arc<Menu>> {
        self.shared.application_menu.lock().clone()
    }

    pub fn recent_documents(&self) -> Vec<PathBuf> {
        self.shared.recent_documents.lock().clone()
    }

    /// Make the next `count` modal creations fail.
    pub fn fail_next_modals(&self, count: u64) {
        self.shared.fail_modals.store(count, Ordering::SeqCst);
    }

    /// Make every modal creation take `delay` before the window appears.
    pub fn delay_modals(&self, delay: Duration) {
        *self.shared.modal_delay.lock() = Some(delay);
    }

    pub fn quit_requested(&self) -> bool {
        self.shared.quit.load(Ordering::SeqCst)
    }

    /// Simulate the user moving a window.
    pub fn move_window(&self, id: WindowId, x: i32, y: i32) {
        if let Some(window) = self.window(id) {
            window.set_position(x, y);
            self.shared.post(AppEvent::Window {
                id,
                event: WindowEvent::Moved,
            });
        }
    }

    /// Simulate the user clicking a window's close button.
    pub fn request_close(&self, id: WindowId) {
        if let Some(window) = self.window(id) {
            let _ack = window.close();
        }
    }

    fn create(&self, kind: WindowKind, position: (i32, i32), size: (u32, u32)) -> Arc<HeadlessWindow> {
        let id = WindowId(self.shared.next_id.fetch_add(1, Ordering::SeqCst));
        let window = Arc::new(HeadlessWindow {
            id,
            kind: kind.clone(),
            record: Mutex::new(WindowRecord {
                position,
                size,
                visible: true,
                ..WindowRecord::default()
            }),
            close_waiters: Mutex::new(Vec::new()),
            shared: Arc::downgrade(&self.shared),
        });
        self.shared.windows.lock().insert(id, Arc::clone(&window));
        self.shared.notify(HostNotice::WindowCreated {
            id,
            kind,
            x: position.0,
            y: position.1,
            width: size.0,
            height: size.1,
        });
        window
    }

    fn centered(&self, size: (u32, u32)) -> (i32, i32) {
        let area = self.shared.work_area;
        (
            area.x + (area.width as i32 - size.0 as i32) / 2,
            area.y + (area.height as i32 - size.1 as i32) / 2,
        )
    }
}

#[async_trait]
impl WindowFactory for HeadlessBackend {
    async fn document_window(&self) -> Result<Arc<dyn WindowHandle>> {
        Ok(self.create(WindowKind::Document, DOCUMENT_WINDOW_ORIGIN, DOCUMENT_WINDOW_SIZE))
    }

    async fn static_window(&self, options: StaticOptions) -> Result<Arc<dyn WindowHandle>> {
        let size = (options.width, options.height);
        let position = self.centered(size);
        Ok(self.create(WindowKind::Static { page: options.page }, position, size))
    }

    async fn modal_window(&self, options: ModalOptions) -> Result<Arc<dyn WindowHandle>> {
        let failing = self
            .shared
            .fail_modals
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            bail!("window creation refused for {:?} modal", options.kind);
        }
        let delay = *self.shared.modal_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let parent_live = self
            .window(options.parent)
            .is_some_and(|parent| !parent.is_destroyed());
        if !parent_live {
            bail!("parent window {} is gone", options.parent);
        }
        Ok(self.create(
            WindowKind::Modal {
                parent: options.parent,
                kind: options.kind,
            },
            (options.x, options.y),
            (options.width, options.height),
        ))
    }

    async fn reference_window(&self, options: ReferenceOptions) -> Result<Arc<dyn WindowHandle>> {
        let size = (options.width, options.height);
        let position = self.centered(size);
        Ok(self.create(
            WindowKind::Reference {
                parent: options.parent,
                image: options.image,
            },
            position,
            size,
        ))
    }

    fn primary_work_area(&self) -> Rect {
        self.shared.work_area
    }
}

#[async_trait]
impl Dialogs for HeadlessBackend {
    async fn pick_files(&self, request: OpenDialog) -> Vec<PathBuf> {
        self.shared.dialog_requests.lock().push(request.clone());
        self.shared.notify(HostNotice::DialogRequested {
            parent: request.parent,
            extensions: request
                .filter
                .extensions()
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            multiple: request.multiple,
        });

        let scripted = self.shared.scripted_picks.lock().pop_front();
        let interactive = self.shared.observer.lock().is_some();
        let mut files = match scripted {
            Some(files) => files,
            None if interactive => {
                let (tx, rx) = oneshot::channel();
                *self.shared.pending_pick.lock() = Some(tx);
                rx.await.unwrap_or_default()
            }
            None => Vec::new(),
        };
        if !request.multiple {
            files.truncate(1);
        }
        files
    }

    async fn show_error(&self, notice: ErrorNotice) {
        log::warn!("{}: {}", notice.title, notice.message);
        self.shared.notify(HostNotice::Error {
            title: notice.title.clone(),
            message: notice.message.clone(),
            detail: notice.detail.clone(),
        });
        self.shared.errors.lock().push(notice);
    }
}

impl DesktopHost for HeadlessBackend {
    fn set_application_menu(&self, menu: Arc<Menu>) {
        self.shared.notify(HostNotice::ApplicationMenu {
            menu: format!("{:?}", menu.kind),
        });
        *self.shared.application_menu.lock() = Some(menu);
    }

    fn add_recent_document(&self, path: &Path) {
        self.shared.recent_documents.lock().push(path.to_path_buf());
    }

    fn quit(&self) {
        self.shared.quit.store(true, Ordering::SeqCst);
        self.shared.notify(HostNotice::Quit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FileFilter;

    #[tokio::test]
    async fn test_document_close_requests_and_destroy_confirms() {
        let backend = HeadlessBackend::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        backend.connect_events(tx);

        let window = backend.document_window().await.unwrap();
        let id = window.id();
        let ack = window.close();
        assert_eq!(
            rx.recv().await,
            Some(AppEvent::Window {
                id,
                event: WindowEvent::CloseRequested
            })
        );
        assert!(!window.is_destroyed());

        window.destroy();
        assert!(ack.wait(std::time::Duration::from_millis(10)).await);
        assert_eq!(
            rx.recv().await,
            Some(AppEvent::Window {
                id,
                event: WindowEvent::Closed
            })
        );
        assert_eq!(rx.recv().await, Some(AppEvent::AllWindowsClosed));
    }

    #[tokio::test]
    async fn test_scripted_dialog_single_selection() {
        let backend = HeadlessBackend::default();
        backend.script_dialog(vec![PathBuf::from("/a.png"), PathBuf::from("/b.png")]);
        let files = backend
            .pick_files(OpenDialog {
                parent: None,
                filter: FileFilter::Images,
                multiple: false,
            })
            .await;
        assert_eq!(files, vec![PathBuf::from("/a.png")]);
        assert!(backend.pick_files(OpenDialog {
            parent: None,
            filter: FileFilter::Images,
            multiple: true,
        })
        .await
        .is_empty());
    }

    #[tokio::test]
    async fn test_fail_next_modal() {
        let backend = HeadlessBackend::default();
        let parent = backend.document_window().await.unwrap();
        backend.fail_next_modals(1);
        let options = ModalOptions {
            parent: parent.id(),
            kind: ModalKind::Rendering,
            x: 0,
            y: 0,
            width: 200,
            height: 80,
            frame: false,
            resizable: true,
            minimizable: true,
            maximizable: true,
        };
        assert!(backend.modal_window(options.clone()).await.is_err());
        assert!(backend.modal_window(options).await.is_ok());
    }
}
