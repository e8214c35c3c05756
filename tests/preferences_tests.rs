//! Preference updates, function keys, and the static windows that show preferences.

mod common;

use common::Harness;
use moebius::app::AppEvent;
use moebius::backend::WindowKind;
use moebius::menu::MenuAction;
use moebius::messages::{InboundMessage, OutboundMessage};
use moebius::pages::StaticPage;
use moebius::platform::Platform;
use moebius::traits::{WindowHandle, WindowId};
use moebius_config::{Preferences, PreferencesStore, defaults, keys};
use serde_json::json;

fn static_window(h: &Harness, page: StaticPage) -> Option<WindowId> {
    h.backend
        .live_windows()
        .into_iter()
        .find(|window| window.kind() == &WindowKind::Static { page })
        .map(|window| window.id())
}

#[tokio::test]
async fn test_update_prefs_persists_and_broadcasts() {
    let mut h = Harness::new(Platform::Linux);
    let first = h.new_document().await;
    let second = h.new_document().await;

    h.message(
        first,
        InboundMessage::UpdatePrefs {
            key: keys::NICK.to_string(),
            value: json!("Ice"),
        },
    )
    .await;

    assert_eq!(h.prefs.get(keys::NICK), Some(json!("Ice")));
    let expected = OutboundMessage::PrefChanged {
        key: "nick".to_string(),
        value: json!("Ice"),
    };
    assert!(h.sent(first).contains(&expected));
    assert!(h.sent(second).contains(&expected));
}

#[tokio::test]
async fn test_renderer_owned_preference_keys_are_kept() {
    let h = Harness::new(Platform::Linux);
    h.wm()
        .update_prefs("theme", json!("dark"))
        .expect("unknown keys are stored");
    assert_eq!(h.prefs.get("theme"), Some(json!("dark")));
    assert_eq!(h.prefs.get_all().get("theme"), Some(&json!("dark")));
}

#[tokio::test]
async fn test_invalid_preference_value_is_rejected() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;

    assert!(h.wm().update_prefs(keys::DEBUG, json!("yes")).is_err());

    assert_eq!(h.prefs.get(keys::DEBUG), Some(json!(false)));
    assert!(
        !h.sent(id)
            .iter()
            .any(|message| matches!(message, OutboundMessage::PrefChanged { .. }))
    );
}

#[tokio::test]
async fn test_set_fkey_updates_one_slot() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;

    h.message(
        id,
        InboundMessage::SetFkey {
            id,
            num: 2,
            fkey_index: 1,
            code: 65,
        },
    )
    .await;

    let fkeys = h.prefs.snapshot().fkeys;
    let mut expected = defaults::fkeys();
    expected[1][2] = 65;
    assert_eq!(fkeys, expected);
    assert!(h.sent(id).iter().any(|message| matches!(
        message,
        OutboundMessage::PrefChanged { key, .. } if key == keys::FKEYS
    )));
}

#[tokio::test]
async fn test_set_fkey_custom_block_goes_to_document() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;

    h.message(
        id,
        InboundMessage::SetFkey {
            id,
            num: -1,
            fkey_index: 0,
            code: 176,
        },
    )
    .await;

    assert!(h.sent(id).contains(&OutboundMessage::SetCustomBlock { code: 176 }));
    assert_eq!(h.prefs.snapshot().fkeys, defaults::fkeys());
}

#[tokio::test]
async fn test_set_fkey_out_of_range_is_ignored() {
    let h = Harness::new(Platform::Linux);
    h.wm().set_fkey(WindowId(1), 10, 0, 65).unwrap();
    h.wm().set_fkey(WindowId(1), 0, 10, 65).unwrap();
    assert_eq!(h.prefs.snapshot().fkeys, defaults::fkeys());
}

#[tokio::test]
async fn test_preferences_window_receives_snapshot() {
    let mut h = Harness::new(Platform::MacOs);
    h.dispatch(AppEvent::Menu {
        window: None,
        action: MenuAction::Preferences,
    })
    .await;

    let id = static_window(&h, StaticPage::Preferences).expect("preferences window");
    assert!(matches!(
        h.sent(id).first(),
        Some(OutboundMessage::Prefs(map)) if map.get("unsaved_changes") == Some(&json!(true))
    ));
    assert_eq!(h.window(id).size(), (480, 690));
}

#[tokio::test]
async fn test_new_connection_window_gets_saved_servers() {
    let prefs = Preferences {
        server: "blocktronics.org".to_string(),
        pass: "secret".to_string(),
        saved_servers: vec![json!({ "server": "blocktronics.org" })],
        ..Preferences::default()
    };
    let mut h = Harness::with_prefs(Platform::Linux, prefs);

    h.message(WindowId(0), InboundMessage::ShowNewConnectionWindow)
        .await;

    let id = static_window(&h, StaticPage::NewConnection).unwrap();
    assert_eq!(
        h.sent(id),
        vec![OutboundMessage::SavedServers {
            server: "blocktronics.org".to_string(),
            pass: "secret".to_string(),
            saved_servers: vec![json!({ "server": "blocktronics.org" })],
        }]
    );
}

#[tokio::test]
async fn test_new_connection_window_without_server_is_blank() {
    let h = Harness::new(Platform::Linux);
    h.wm().show_new_connection().await.unwrap();
    let id = static_window(&h, StaticPage::NewConnection).unwrap();
    assert!(h.sent(id).is_empty());
}

#[tokio::test]
async fn test_splash_gets_last_server() {
    let prefs = Preferences {
        server: "blocktronics.org".to_string(),
        ..Preferences::default()
    };
    let h = Harness::with_prefs(Platform::Linux, prefs);
    h.wm().show_splash_screen().await.unwrap();

    let splash = h.wm().splash_window().unwrap();
    assert_eq!(
        h.sent(splash.id()),
        vec![OutboundMessage::SavedServer {
            server: "blocktronics.org".to_string(),
            pass: String::new(),
        }]
    );
}

#[tokio::test]
async fn test_help_pages_open_static_windows() {
    let mut h = Harness::new(Platform::MacOs);
    for (action, page) in [
        (MenuAction::ShowCheatsheet, StaticPage::Cheatsheet),
        (MenuAction::ShowNumpadMappings, StaticPage::NumpadMappings),
        (MenuAction::ShowAcknowledgements, StaticPage::Acknowledgements),
        (MenuAction::ShowChangelog, StaticPage::Changelog),
    ] {
        h.dispatch(AppEvent::Menu {
            window: None,
            action,
        })
        .await;
        let id = static_window(&h, page).expect("help window");
        assert_eq!(h.window(id).size(), page.size());
    }
}
