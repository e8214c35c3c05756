//! Messages exchanged between renderer windows and the host.
//!
//! Both directions are closed enums with one variant per channel. On the wire
//! a message is `{"channel": "<snake_case name>", "args": {...}}`.

use crate::traits::WindowId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Options for a new document. Anything left out is filled in by the renderer
/// or, for author/group/rows, from preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewDocumentOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_9px_font: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ice_colors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_bytes: Option<Value>,
}

/// SAUCE metadata block edited by the sauce modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SauceInfo {
    pub title: String,
    pub author: String,
    pub group: String,
    pub comments: String,
}

/// Request payload for the function-key editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FkeyRequest {
    /// Key within the set, or -1 for the custom block
    pub num: i32,
    pub fkey_index: usize,
    #[serde(default)]
    pub current: Value,
    #[serde(default)]
    pub bitmask: Value,
    pub font_height: u32,
}

/// Renderer to host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "args", rename_all = "snake_case")]
pub enum InboundMessage {
    NewDocument(NewDocumentOptions),
    Open,
    OpenFile {
        file: PathBuf,
    },
    SetFile {
        id: WindowId,
        file: PathBuf,
    },
    DocumentChanged {
        id: WindowId,
    },
    Ready {
        id: WindowId,
    },
    Destroy {
        id: WindowId,
    },
    UpdatePrefs {
        key: String,
        value: Value,
    },
    Discord {
        value: bool,
    },
    Preferences,
    ShowNewConnectionWindow,
    ConnectToServer {
        server: String,
        #[serde(default)]
        pass: String,
    },
    GetCanvasSize {
        id: WindowId,
        columns: u32,
        rows: u32,
    },
    GetSauceInfo {
        id: WindowId,
        #[serde(flatten)]
        sauce: SauceInfo,
    },
    UpdateSauce {
        id: WindowId,
        #[serde(flatten)]
        sauce: SauceInfo,
    },
    SelectAttribute {
        id: WindowId,
        fg: u32,
        bg: u32,
        #[serde(default)]
        palette: Value,
    },
    FkeyPrefs {
        id: WindowId,
        #[serde(flatten)]
        request: FkeyRequest,
    },
    SetFkey {
        id: WindowId,
        num: i32,
        fkey_index: usize,
        code: u32,
    },
    ShowRenderingModal {
        id: WindowId,
    },
    ShowConnectingModal {
        id: WindowId,
    },
    #[serde(rename = "show_controlcharacters")]
    ShowControlCharacters {
        id: WindowId,
        method: String,
        #[serde(default)]
        destroy_when_done: bool,
    },
    ShowWarning {
        id: WindowId,
        title: String,
        content: String,
    },
    WarningOk {
        id: WindowId,
    },
    WarningCancel {
        id: WindowId,
    },
    ShowLoadingDialog {
        id: WindowId,
        title: String,
        message: String,
    },
    /// Modals sometimes lose track of their parent and send no id
    CloseModal {
        #[serde(default)]
        id: Option<WindowId>,
    },
    ChatInputFocus {
        id: WindowId,
    },
    ChatInputBlur {
        id: WindowId,
    },
    SetModalMenu {
        id: WindowId,
    },
    SetDocMenu {
        id: WindowId,
    },
    OpenReferenceImage {
        #[serde(default)]
        id: Option<WindowId>,
    },
}

impl InboundMessage {
    /// Channel name, for logging.
    pub fn channel(&self) -> &'static str {
        match self {
            InboundMessage::NewDocument(_) => "new_document",
            InboundMessage::Open => "open",
            InboundMessage::OpenFile { .. } => "open_file",
            InboundMessage::SetFile { .. } => "set_file",
            InboundMessage::DocumentChanged { .. } => "document_changed",
            InboundMessage::Ready { .. } => "ready",
            InboundMessage::Destroy { .. } => "destroy",
            InboundMessage::UpdatePrefs { .. } => "update_prefs",
            InboundMessage::Discord { .. } => "discord",
            InboundMessage::Preferences => "preferences",
            InboundMessage::ShowNewConnectionWindow => "show_new_connection_window",
            InboundMessage::ConnectToServer { .. } => "connect_to_server",
            InboundMessage::GetCanvasSize { .. } => "get_canvas_size",
            InboundMessage::GetSauceInfo { .. } => "get_sauce_info",
            InboundMessage::UpdateSauce { .. } => "update_sauce",
            InboundMessage::SelectAttribute { .. } => "select_attribute",
            InboundMessage::FkeyPrefs { .. } => "fkey_prefs",
            InboundMessage::SetFkey { .. } => "set_fkey",
            InboundMessage::ShowRenderingModal { .. } => "show_rendering_modal",
            InboundMessage::ShowConnectingModal { .. } => "show_connecting_modal",
            InboundMessage::ShowControlCharacters { .. } => "show_controlcharacters",
            InboundMessage::ShowWarning { .. } => "show_warning",
            InboundMessage::WarningOk { .. } => "warning_ok",
            InboundMessage::WarningCancel { .. } => "warning_cancel",
            InboundMessage::ShowLoadingDialog { .. } => "show_loading_dialog",
            InboundMessage::CloseModal { .. } => "close_modal",
            InboundMessage::ChatInputFocus { .. } => "chat_input_focus",
            InboundMessage::ChatInputBlur { .. } => "chat_input_blur",
            InboundMessage::SetModalMenu { .. } => "set_modal_menu",
            InboundMessage::SetDocMenu { .. } => "set_doc_menu",
            InboundMessage::OpenReferenceImage { .. } => "open_reference_image",
        }
    }
}

/// Host to renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "args", rename_all = "snake_case")]
pub enum OutboundMessage {
    NewDocument(NewDocumentOptions),
    OpenFile {
        file: PathBuf,
    },
    ConnectToServer {
        server: String,
        pass: String,
    },
    /// Full preference snapshot
    Prefs(Map<String, Value>),
    /// A single preference changed
    PrefChanged {
        key: String,
        value: Value,
    },
    SavedServers {
        server: String,
        pass: String,
        saved_servers: Vec<Value>,
    },
    SavedServer {
        server: String,
        pass: String,
    },
    SetCanvasSize {
        columns: u32,
        rows: u32,
    },
    SetSauceInfo(SauceInfo),
    SelectAttribute {
        fg: u32,
        bg: u32,
        palette: Value,
    },
    FkeyPrefs(FkeyRequest),
    GetSaveData {
        method: String,
        destroy_when_done: bool,
    },
    GetWarningData {
        title: String,
        content: String,
    },
    SetLoadingData {
        title: String,
        message: String,
    },
    SetReferenceImage {
        file: PathBuf,
    },
    SetCustomBlock {
        code: u32,
    },
    ToggleSmallscaleGuide(bool),
    CheckBeforeClosing,
    WarningOk,
    WarningCancel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_document_changed() {
        let msg: InboundMessage = serde_json::from_value(json!({
            "channel": "document_changed",
            "args": { "id": 4 }
        }))
        .unwrap();
        assert_eq!(msg, InboundMessage::DocumentChanged { id: WindowId(4) });
    }

    #[test]
    fn test_parse_close_modal_without_id() {
        let msg: InboundMessage = serde_json::from_value(json!({
            "channel": "close_modal",
            "args": {}
        }))
        .unwrap();
        assert_eq!(msg, InboundMessage::CloseModal { id: None });
    }

    #[test]
    fn test_parse_unit_channel_without_args() {
        let msg: InboundMessage = serde_json::from_value(json!({ "channel": "open" })).unwrap();
        assert_eq!(msg, InboundMessage::Open);
    }

    #[test]
    fn test_parse_sauce_info_flattened() {
        let msg: InboundMessage = serde_json::from_value(json!({
            "channel": "get_sauce_info",
            "args": { "id": 1, "title": "Logo", "author": "Ice", "group": "Blocktronics", "comments": "" }
        }))
        .unwrap();
        match msg {
            InboundMessage::GetSauceInfo { id, sauce } => {
                assert_eq!(id, WindowId(1));
                assert_eq!(sauce.group, "Blocktronics");
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_parse_control_characters_channel_name() {
        let msg: InboundMessage = serde_json::from_value(json!({
            "channel": "show_controlcharacters",
            "args": { "id": 2, "method": "save", "destroy_when_done": true }
        }))
        .unwrap();
        assert_eq!(msg.channel(), "show_controlcharacters");
    }

    #[test]
    fn test_outbound_wire_shape() {
        let value = serde_json::to_value(OutboundMessage::SetCanvasSize {
            columns: 80,
            rows: 25,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({ "channel": "set_canvas_size", "args": { "columns": 80, "rows": 25 } })
        );

        let value = serde_json::to_value(OutboundMessage::CheckBeforeClosing).unwrap();
        assert_eq!(value, json!({ "channel": "check_before_closing" }));
    }
}
