//! Recent files: persisted list, reopening, and pruning of missing files.

mod common;

use common::Harness;
use moebius::app::AppEvent;
use moebius::menu::MenuAction;
use moebius::messages::OutboundMessage;
use moebius::platform::Platform;
use moebius::recent::RECENT_FILES_CAPACITY;
use moebius_config::Preferences;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

fn existing_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"\x1b[0m").expect("write test file");
    path
}

#[tokio::test]
async fn test_missing_recent_file_is_pruned_and_reported() {
    let prefs = Preferences {
        recent_files: vec!["/gone/missing.ans".to_string(), "/art/kept.ans".to_string()],
        ..Preferences::default()
    };
    let mut h = Harness::with_prefs(Platform::Linux, prefs);
    assert_eq!(h.wm().recent_files().len(), 2);

    h.dispatch(AppEvent::Menu {
        window: None,
        action: MenuAction::OpenRecent {
            file: PathBuf::from("/gone/missing.ans"),
        },
    })
    .await;

    assert_eq!(h.session_count(), 0);
    assert_eq!(h.wm().recent_files(), vec![PathBuf::from("/art/kept.ans")]);
    assert_eq!(h.prefs_recent(), vec![json!("/art/kept.ans")]);

    let errors = h.backend.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].title, "File Not Found");
    assert!(errors[0].message.contains("/gone/missing.ans"));
}

#[tokio::test]
async fn test_existing_recent_file_opens_in_new_window() {
    let dir = TempDir::new().unwrap();
    let file = existing_file(&dir, "logo.ans");
    let mut h = Harness::new(Platform::Linux);

    h.dispatch(AppEvent::Menu {
        window: None,
        action: MenuAction::OpenRecent { file: file.clone() },
    })
    .await;

    assert_eq!(h.session_count(), 1);
    let id = h.wm().registry().ids()[0];
    assert!(h.sent(id).contains(&OutboundMessage::OpenFile { file }));
    assert!(h.backend.errors().is_empty());
}

#[tokio::test]
async fn test_recent_file_loads_into_untouched_window() {
    let dir = TempDir::new().unwrap();
    let file = existing_file(&dir, "logo.ans");
    let mut h = Harness::new(Platform::MacOs);
    let id = h.new_document().await;

    h.wm().open_recent(Some(id), &file).await.unwrap();
    h.pump().await;

    assert_eq!(h.session_count(), 1);
    assert!(h.sent(id).contains(&OutboundMessage::OpenFile { file }));
}

#[tokio::test]
async fn test_recent_file_already_open_is_focused() {
    let dir = TempDir::new().unwrap();
    let file = existing_file(&dir, "logo.ans");
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;
    h.wm().set_file(id, file.clone());

    h.wm().open_recent(None, &file).await.unwrap();
    h.pump().await;

    assert_eq!(h.session_count(), 1);
    assert_eq!(h.window(id).record().focus_count, 1);
}

#[tokio::test]
async fn test_clear_recent_files() {
    let prefs = Preferences {
        recent_files: vec!["/art/a.ans".to_string(), "/art/b.ans".to_string()],
        ..Preferences::default()
    };
    let mut h = Harness::with_prefs(Platform::Linux, prefs);
    let id = h.new_document().await;

    h.dispatch(AppEvent::Menu {
        window: Some(id),
        action: MenuAction::ClearRecent,
    })
    .await;

    assert!(h.wm().recent_files().is_empty());
    assert!(h.prefs_recent().is_empty());
    let menu = h.window(id).record().menu.unwrap();
    assert!(menu.submenu("Open Recent").unwrap().item_labels() == vec!["Clear Recent Files"]);
}

#[tokio::test]
async fn test_recent_files_are_capped_most_recent_first() {
    let h = Harness::new(Platform::Linux);
    for i in 0..RECENT_FILES_CAPACITY + 2 {
        h.wm().add_to_recent(&PathBuf::from(format!("/art/{i}.ans")));
    }

    let recent = h.wm().recent_files();
    assert_eq!(recent.len(), RECENT_FILES_CAPACITY);
    assert_eq!(
        recent[0],
        PathBuf::from(format!("/art/{}.ans", RECENT_FILES_CAPACITY + 1))
    );
    assert_eq!(h.prefs_recent().len(), RECENT_FILES_CAPACITY);
}

#[tokio::test]
async fn test_renderer_update_of_recent_files_is_kept() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;

    h.wm()
        .update_prefs("recent_files", json!(["/art/x.ans"]))
        .unwrap();
    let menu = h.window(id).record().menu.unwrap();
    assert_eq!(
        menu.submenu("Open Recent").unwrap().item_labels(),
        vec!["/art/x.ans", "Clear Recent Files"]
    );

    h.wm().add_to_recent(&PathBuf::from("/art/y.ans"));

    assert_eq!(
        h.wm().recent_files(),
        vec![PathBuf::from("/art/y.ans"), PathBuf::from("/art/x.ans")]
    );
    assert_eq!(h.prefs_recent(), vec![json!("/art/y.ans"), json!("/art/x.ans")]);
}
