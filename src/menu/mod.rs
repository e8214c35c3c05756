//! Menu support for moebius
//!
//! Menus are plain data built by a [`MenuBuilder`]; the native menu toolkit
//! only renders them. Where they are attached depends on the platform:
//! - macOS: Global application menu bar
//! - Windows/Linux: Per-window menu bar
//!
//! The [`bar`] module holds the two attachment strategies and the [`policy`]
//! module decides which menu is active at any moment.

mod actions;
pub mod bar;
pub mod policy;

pub use actions::MenuAction;
pub use bar::{GlobalMenuBar, MenuBar, PerWindowMenuBar};
pub use policy::{ActiveMenu, MenuSituation};

use crate::traits::WindowId;
use std::path::PathBuf;
use std::sync::Arc;

/// What a menu structure is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKind {
    /// Default menu when no document is focused
    Application,
    /// Full menu of one document window
    Document(WindowId),
    /// Reduced menu while the chat input of a document has focus
    ChatInput(WindowId),
    /// Shared menu while any modal is open
    Modal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub kind: MenuKind,
    pub submenus: Vec<Submenu>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submenu {
    pub label: String,
    pub entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    /// Native item handled by the toolkit (copy, paste, quit, ...)
    Role(MenuRole),
    Submenu(Submenu),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub accelerator: Option<String>,
    pub enabled: bool,
    /// Host command, or `None` for commands routed to the renderer by id
    pub action: Option<MenuAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRole {
    About,
    Hide,
    Quit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Minimize,
    Zoom,
    ToggleDevTools,
}

impl Menu {
    /// Find the host action bound to a menu item id.
    pub fn action_for(&self, id: &str) -> Option<&MenuAction> {
        fn search<'a>(entries: &'a [MenuEntry], id: &str) -> Option<&'a MenuAction> {
            entries.iter().find_map(|entry| match entry {
                MenuEntry::Item(item) if item.id == id => item.action.as_ref(),
                MenuEntry::Submenu(sub) => search(&sub.entries, id),
                _ => None,
            })
        }
        self.submenus.iter().find_map(|sub| search(&sub.entries, id))
    }

    /// Find a submenu by label, searching nested submenus too.
    pub fn submenu(&self, label: &str) -> Option<&Submenu> {
        self.submenus.iter().find_map(|sub| {
            if sub.label == label {
                Some(sub)
            } else {
                sub.find_nested(label)
            }
        })
    }
}

impl Submenu {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            entries: Vec::new(),
        }
    }

    fn item(
        mut self,
        id: &str,
        label: &str,
        accelerator: Option<&str>,
        action: Option<MenuAction>,
    ) -> Self {
        self.entries.push(MenuEntry::Item(MenuItem {
            id: id.to_string(),
            label: label.to_string(),
            accelerator: accelerator.map(str::to_string),
            enabled: true,
            action,
        }));
        self
    }

    fn disabled(mut self, id: &str, label: &str) -> Self {
        self.entries.push(MenuEntry::Item(MenuItem {
            id: id.to_string(),
            label: label.to_string(),
            accelerator: None,
            enabled: false,
            action: None,
        }));
        self
    }

    fn role(mut self, role: MenuRole) -> Self {
        self.entries.push(MenuEntry::Role(role));
        self
    }

    fn separator(mut self) -> Self {
        self.entries.push(MenuEntry::Separator);
        self
    }

    fn submenu(mut self, submenu: Submenu) -> Self {
        self.entries.push(MenuEntry::Submenu(submenu));
        self
    }

    fn find_nested(&self, label: &str) -> Option<&Submenu> {
        self.entries.iter().find_map(|entry| match entry {
            MenuEntry::Submenu(sub) if sub.label == label => Some(sub),
            MenuEntry::Submenu(sub) => sub.find_nested(label),
            _ => None,
        })
    }

    /// Labels of the enabled items, in order.
    pub fn item_labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Item(item) if item.enabled => Some(item.label.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Global state menus are built from.
#[derive(Debug, Clone, Copy)]
pub struct MenuContext<'a> {
    pub debug: bool,
    pub recent_files: &'a [PathBuf],
}

/// Produces the menu structures the host attaches.
pub trait MenuBuilder: Send + Sync {
    fn document_menu(&self, window: WindowId, context: MenuContext<'_>) -> Menu;
    fn chat_input_menu(&self, window: WindowId, context: MenuContext<'_>) -> Menu;
    fn modal_menu(&self) -> Arc<Menu>;
    fn application_menu(&self, context: MenuContext<'_>) -> Arc<Menu>;
}

/// The stock menu layout.
#[derive(Debug)]
pub struct StandardMenuBuilder {
    modal: Arc<Menu>,
}

impl Default for StandardMenuBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardMenuBuilder {
    pub fn new() -> Self {
        let modal = Menu {
            kind: MenuKind::Modal,
            submenus: vec![
                Self::app_submenu(false),
                Submenu::new("Edit")
                    .role(MenuRole::Undo)
                    .role(MenuRole::Redo)
                    .separator()
                    .role(MenuRole::Cut)
                    .role(MenuRole::Copy)
                    .role(MenuRole::Paste)
                    .role(MenuRole::SelectAll),
            ],
        };
        Self {
            modal: Arc::new(modal),
        }
    }

    fn app_submenu(preferences_enabled: bool) -> Submenu {
        let submenu = Submenu::new("Moebius").role(MenuRole::About).separator();
        let submenu = if preferences_enabled {
            submenu.item(
                "preferences",
                "Preferences",
                Some("CmdOrCtrl+,"),
                Some(MenuAction::Preferences),
            )
        } else {
            submenu.disabled("preferences", "Preferences")
        };
        submenu.separator().role(MenuRole::Hide).role(MenuRole::Quit)
    }

    fn recent_submenu(recent_files: &[PathBuf]) -> Submenu {
        let mut submenu = Submenu::new("Open Recent");
        if recent_files.is_empty() {
            submenu = submenu.disabled("no_recent_files", "No Recent Files");
        } else {
            for (index, file) in recent_files.iter().enumerate() {
                submenu = submenu.item(
                    &format!("recent_file_{index}"),
                    &file.display().to_string(),
                    None,
                    Some(MenuAction::OpenRecent { file: file.clone() }),
                );
            }
        }
        submenu
            .separator()
            .item("clear_recent_files", "Clear Recent Files", None, Some(MenuAction::ClearRecent))
    }

    fn file_submenu(context: MenuContext<'_>) -> Submenu {
        Submenu::new("File")
            .item("new_document", "New", Some("CmdOrCtrl+N"), Some(MenuAction::NewDocument))
            .separator()
            .item("open", "Open\u{2026}", Some("CmdOrCtrl+O"), Some(MenuAction::Open))
            .item(
                "open_in_current_window",
                "Open in Current Window\u{2026}",
                Some("CmdOrCtrl+Shift+O"),
                Some(MenuAction::OpenInCurrentWindow),
            )
            .submenu(Self::recent_submenu(context.recent_files))
            .separator()
            .item("save", "Save", Some("CmdOrCtrl+S"), None)
            .item("save_as", "Save As\u{2026}", Some("CmdOrCtrl+Shift+S"), None)
            .separator()
            .item(
                "new_connection",
                "Connect to Server\u{2026}",
                Some("CmdOrCtrl+K"),
                Some(MenuAction::NewConnection),
            )
            .item(
                "open_reference_window",
                "Open Reference Image\u{2026}",
                None,
                Some(MenuAction::OpenReferenceWindow),
            )
            .separator()
            .item("close", "Close", Some("CmdOrCtrl+W"), None)
    }

    fn help_submenu() -> Submenu {
        Submenu::new("Help")
            .item("show_cheatsheet", "Cheatsheet", None, Some(MenuAction::ShowCheatsheet))
            .item(
                "show_numpad_mappings",
                "Numpad Mappings",
                None,
                Some(MenuAction::ShowNumpadMappings),
            )
            .separator()
            .item(
                "show_acknowledgements",
                "Acknowledgements",
                None,
                Some(MenuAction::ShowAcknowledgements),
            )
            .item("show_changelog", "Changelog", None, Some(MenuAction::ShowChangelog))
    }

    fn window_submenu() -> Submenu {
        Submenu::new("Window")
            .role(MenuRole::Minimize)
            .role(MenuRole::Zoom)
    }

    fn debug_submenu() -> Submenu {
        Submenu::new("Debug").role(MenuRole::ToggleDevTools)
    }
}

impl MenuBuilder for StandardMenuBuilder {
    fn document_menu(&self, window: WindowId, context: MenuContext<'_>) -> Menu {
        let mut submenus = vec![
            Self::app_submenu(true),
            Self::file_submenu(context),
            Submenu::new("Edit")
                .item("undo", "Undo", Some("CmdOrCtrl+Z"), None)
                .item("redo", "Redo", Some("CmdOrCtrl+Shift+Z"), None)
                .separator()
                .item("cut", "Cut", Some("CmdOrCtrl+X"), None)
                .item("copy", "Copy", Some("CmdOrCtrl+C"), None)
                .item("paste", "Paste", Some("CmdOrCtrl+V"), None)
                .separator()
                .item("select_all", "Select All", Some("CmdOrCtrl+A"), None),
            Submenu::new("View")
                .item("toggle_status_bar", "Show Status Bar", Some("CmdOrCtrl+/"), None)
                .item("toggle_tool_bar", "Show Tool Bar", Some("CmdOrCtrl+T"), None)
                .item("toggle_preview", "Show Preview", Some("CmdOrCtrl+Alt+P"), None),
            Self::window_submenu(),
            Self::help_submenu(),
        ];
        if context.debug {
            submenus.push(Self::debug_submenu());
        }
        Menu {
            kind: MenuKind::Document(window),
            submenus,
        }
    }

    fn chat_input_menu(&self, window: WindowId, context: MenuContext<'_>) -> Menu {
        // Editing keys belong to the text field, so only native roles remain.
        let mut submenus = vec![
            Self::app_submenu(true),
            Submenu::new("File")
                .item("new_document", "New", Some("CmdOrCtrl+N"), Some(MenuAction::NewDocument))
                .item("open", "Open\u{2026}", Some("CmdOrCtrl+O"), Some(MenuAction::Open))
                .submenu(Self::recent_submenu(context.recent_files)),
            Submenu::new("Edit")
                .role(MenuRole::Undo)
                .role(MenuRole::Redo)
                .separator()
                .role(MenuRole::Cut)
                .role(MenuRole::Copy)
                .role(MenuRole::Paste)
                .role(MenuRole::SelectAll),
            Self::window_submenu(),
            Self::help_submenu(),
        ];
        if context.debug {
            submenus.push(Self::debug_submenu());
        }
        Menu {
            kind: MenuKind::ChatInput(window),
            submenus,
        }
    }

    fn modal_menu(&self) -> Arc<Menu> {
        Arc::clone(&self.modal)
    }

    fn application_menu(&self, context: MenuContext<'_>) -> Arc<Menu> {
        Arc::new(Menu {
            kind: MenuKind::Application,
            submenus: vec![
                Self::app_submenu(true),
                Submenu::new("File")
                    .item("new_document", "New", Some("CmdOrCtrl+N"), Some(MenuAction::NewDocument))
                    .separator()
                    .item("open", "Open\u{2026}", Some("CmdOrCtrl+O"), Some(MenuAction::Open))
                    .submenu(Self::recent_submenu(context.recent_files))
                    .separator()
                    .item(
                        "new_connection",
                        "Connect to Server\u{2026}",
                        Some("CmdOrCtrl+K"),
                        Some(MenuAction::NewConnection),
                    ),
                Self::window_submenu(),
                Self::help_submenu(),
            ],
        })
    }
}
