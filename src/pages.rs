//! Renderer pages the host opens, with their fixed window geometry.

use crate::platform::Platform;
use serde::{Deserialize, Serialize};

/// Transient dialogs owned by a document session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    CanvasSize,
    SauceInfo,
    Rendering,
    Connecting,
    Loading,
    ControlCharacters,
    Warning,
    SelectAttribute,
    FunctionKeys,
}

impl ModalKind {
    /// HTML page rendered inside the modal
    pub fn page(self) -> &'static str {
        match self {
            ModalKind::CanvasSize => "app/html/resize.html",
            ModalKind::SauceInfo => "app/html/sauce.html",
            ModalKind::Rendering => "app/html/rendering.html",
            ModalKind::Connecting => "app/html/connecting.html",
            ModalKind::Loading => "app/html/loading.html",
            ModalKind::ControlCharacters => "app/html/controlcharacters.html",
            ModalKind::Warning => "app/html/warning.html",
            ModalKind::SelectAttribute => "app/html/select_attribute.html",
            ModalKind::FunctionKeys => "app/html/fkey_prefs.html",
        }
    }

    /// Default size in logical pixels.
    ///
    /// The function-key editor scales with the font; see [`function_keys_size`].
    pub fn default_size(self) -> (u32, u32) {
        match self {
            ModalKind::CanvasSize => (300, 190),
            ModalKind::SauceInfo => (600, 340),
            ModalKind::Rendering | ModalKind::Connecting => (200, 80),
            ModalKind::Loading => (300, 150),
            ModalKind::ControlCharacters => (640, 400),
            ModalKind::Warning => (480, 200),
            ModalKind::SelectAttribute => (340, 340),
            ModalKind::FunctionKeys => function_keys_size(16),
        }
    }
}

/// The function-key editor shows a 16x16 glyph grid at double scale.
pub fn function_keys_size(font_height: u32) -> (u32, u32) {
    (16 * 8 * 2, 16 * font_height * 2)
}

/// Windows with static content that are not tied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticPage {
    Preferences,
    NewConnection,
    Splash,
    Cheatsheet,
    Acknowledgements,
    NumpadMappings,
    Changelog,
}

impl StaticPage {
    pub fn page(self) -> &'static str {
        match self {
            StaticPage::Preferences => "app/html/preferences.html",
            StaticPage::NewConnection => "app/html/new_connection.html",
            StaticPage::Splash => "app/html/splash_screen.html",
            StaticPage::Cheatsheet => "app/html/cheatsheet.html",
            StaticPage::Acknowledgements => "app/html/acknowledgements.html",
            StaticPage::NumpadMappings => "app/html/numpad_mappings.html",
            StaticPage::Changelog => "app/html/changelog.html",
        }
    }

    pub fn size(self) -> (u32, u32) {
        match self {
            StaticPage::Preferences => (480, 690),
            StaticPage::NewConnection => (480, 340),
            StaticPage::Splash => (720, 600),
            StaticPage::Cheatsheet => (640, 816),
            StaticPage::Acknowledgements => (640, 688),
            StaticPage::NumpadMappings => (640, 400),
            StaticPage::Changelog => (352, 576),
        }
    }

    /// Content pages use an inset title bar on macOS and a normal frame elsewhere.
    pub fn has_frame(self, platform: Platform) -> bool {
        match self {
            StaticPage::Preferences | StaticPage::NewConnection => true,
            _ => platform != Platform::MacOs,
        }
    }
}
