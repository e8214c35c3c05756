//! Which menu is showing, on global and per-window menu platforms.

mod common;

use common::Harness;
use moebius::app::{AppEvent, WindowEvent};
use moebius::menu::MenuKind;
use moebius::messages::InboundMessage;
use moebius::platform::Platform;
use moebius::traits::WindowId;
use serde_json::json;
use std::path::PathBuf;

async fn focus(h: &mut Harness, id: WindowId) {
    h.dispatch(AppEvent::Window {
        id,
        event: WindowEvent::Focused,
    })
    .await;
}

#[tokio::test]
async fn test_global_menu_follows_focus() {
    let mut h = Harness::new(Platform::MacOs);
    let first = h.new_document().await;
    let second = h.new_document().await;

    focus(&mut h, first).await;
    assert_eq!(h.global_menu(), Some(MenuKind::Document(first)));

    focus(&mut h, second).await;
    assert_eq!(h.global_menu(), Some(MenuKind::Document(second)));
}

#[tokio::test]
async fn test_global_menu_switches_for_chat_input() {
    let mut h = Harness::new(Platform::MacOs);
    let id = h.new_document().await;
    focus(&mut h, id).await;

    h.message(id, InboundMessage::ChatInputFocus { id }).await;
    assert_eq!(h.global_menu(), Some(MenuKind::ChatInput(id)));

    h.message(id, InboundMessage::ChatInputBlur { id }).await;
    assert_eq!(h.global_menu(), Some(MenuKind::Document(id)));
}

#[tokio::test]
async fn test_focus_with_open_modal_keeps_modal_menu() {
    let mut h = Harness::new(Platform::MacOs);
    let id = h.new_document().await;
    h.wm().show_canvas_size(id, 80, 25).await.unwrap();

    focus(&mut h, id).await;
    assert_eq!(h.global_menu(), Some(MenuKind::Modal));

    h.message(id, InboundMessage::ChatInputBlur { id }).await;
    assert_eq!(h.global_menu(), Some(MenuKind::Modal));
}

#[tokio::test]
async fn test_native_dialog_menu_requests() {
    let mut h = Harness::new(Platform::MacOs);
    let id = h.new_document().await;

    h.message(id, InboundMessage::SetModalMenu { id }).await;
    assert_eq!(h.global_menu(), Some(MenuKind::Modal));

    h.message(id, InboundMessage::SetDocMenu { id }).await;
    assert_eq!(h.global_menu(), Some(MenuKind::Document(id)));
}

#[tokio::test]
async fn test_open_dialog_shows_modal_menu_then_restores() {
    let mut h = Harness::new(Platform::MacOs);
    let id = h.new_document().await;
    focus(&mut h, id).await;

    h.wm().open(Some(id)).await.unwrap();
    assert_eq!(h.global_menu(), Some(MenuKind::Document(id)));
}

#[tokio::test]
async fn test_application_menu_after_last_window_on_macos() {
    let mut h = Harness::new(Platform::MacOs);
    let id = h.new_document().await;
    focus(&mut h, id).await;

    h.backend.request_close(id);
    h.pump().await;

    assert_eq!(h.global_menu(), Some(MenuKind::Application));
    assert!(!h.backend.quit_requested());
}

#[tokio::test]
async fn test_debug_preference_rebuilds_menus() {
    let mut h = Harness::new(Platform::MacOs);
    let id = h.new_document().await;
    focus(&mut h, id).await;
    let before = h.backend.application_menu().unwrap();
    assert!(before.submenu("Debug").is_none());

    h.message(
        id,
        InboundMessage::UpdatePrefs {
            key: "debug".to_string(),
            value: json!(true),
        },
    )
    .await;

    let after = h.backend.application_menu().unwrap();
    assert_eq!(after.kind, MenuKind::Document(id));
    assert!(after.submenu("Debug").is_some());
}

#[tokio::test]
async fn test_per_window_menu_attached_at_creation() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;

    assert_eq!(h.window_menu(id), Some(MenuKind::Document(id)));
    assert_eq!(h.global_menu(), None);
}

#[tokio::test]
async fn test_per_window_menus_ignore_chat_and_dialog_requests() {
    let mut h = Harness::new(Platform::Windows);
    let id = h.new_document().await;

    h.message(id, InboundMessage::ChatInputFocus { id }).await;
    h.message(id, InboundMessage::SetModalMenu { id }).await;
    h.wm().show_canvas_size(id, 80, 25).await.unwrap();

    assert_eq!(h.window_menu(id), Some(MenuKind::Document(id)));
    assert_eq!(h.global_menu(), None);
}

#[tokio::test]
async fn test_per_window_recent_files_menu_updates() {
    let mut h = Harness::new(Platform::Linux);
    let first = h.new_document().await;
    let second = h.new_document().await;

    h.message(
        first,
        InboundMessage::SetFile {
            id: first,
            file: PathBuf::from("/art/logo.ans"),
        },
    )
    .await;

    for id in [first, second] {
        let menu = h.window(id).record().menu.unwrap();
        let recent = menu.submenu("Open Recent").unwrap();
        assert_eq!(
            recent.item_labels(),
            vec!["/art/logo.ans", "Clear Recent Files"]
        );
    }
}

#[tokio::test]
async fn test_menu_requests_for_unknown_window_are_ignored() {
    let mut h = Harness::new(Platform::MacOs);
    let id = h.new_document().await;
    focus(&mut h, id).await;

    let unknown = WindowId(999);
    h.message(id, InboundMessage::SetModalMenu { id: unknown }).await;
    h.message(id, InboundMessage::ChatInputFocus { id: unknown })
        .await;
    assert_eq!(h.global_menu(), Some(MenuKind::Document(id)));

    h.message(id, InboundMessage::SetModalMenu { id }).await;
    h.message(id, InboundMessage::SetDocMenu { id: unknown }).await;
    assert_eq!(h.global_menu(), Some(MenuKind::Modal));
}
