//! Reference image windows follow their document around.

mod common;

use common::Harness;
use moebius::app::{AppEvent, REFERENCE_WINDOW_SIZE};
use moebius::backend::WindowKind;
use moebius::menu::MenuAction;
use moebius::messages::{InboundMessage, OutboundMessage};
use moebius::platform::Platform;
use moebius::traits::{FileFilter, WindowHandle, WindowId};
use std::path::PathBuf;

async fn open_references(h: &mut Harness, parent: WindowId, images: &[&str]) -> Vec<WindowId> {
    h.backend
        .script_dialog(images.iter().map(PathBuf::from).collect());
    h.dispatch(AppEvent::Menu {
        window: Some(parent),
        action: MenuAction::OpenReferenceWindow,
    })
    .await;
    h.wm()
        .references_of(parent)
        .iter()
        .map(|link| link.window.id())
        .collect()
}

#[tokio::test]
async fn test_reference_windows_open_for_each_image() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;

    let refs = open_references(&mut h, id, &["/img/a.png", "/img/b.jpg"]).await;

    assert_eq!(refs.len(), 2);
    assert_eq!(
        h.window(refs[0]).kind(),
        &WindowKind::Reference {
            parent: id,
            image: PathBuf::from("/img/a.png")
        }
    );
    assert_eq!(h.window(refs[1]).size(), REFERENCE_WINDOW_SIZE);

    let request = &h.backend.dialog_requests()[0];
    assert_eq!(request.parent, Some(id));
    assert_eq!(request.filter, FileFilter::Images);
    assert!(request.multiple);
}

#[tokio::test]
async fn test_references_follow_their_document() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;
    let refs = open_references(&mut h, id, &["/img/a.png"]).await;
    let start = h.window(refs[0]).position();

    h.backend.move_window(id, 200, 150);
    h.pump().await;

    assert_eq!(h.window(refs[0]).position(), (start.0 + 100, start.1 + 50));
}

#[tokio::test]
async fn test_moving_a_reference_changes_its_offset() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;
    let refs = open_references(&mut h, id, &["/img/a.png"]).await;

    h.backend.move_window(refs[0], 0, 0);
    h.pump().await;
    assert_eq!(h.wm().references_of(id)[0].offset, (-100, -100));

    h.backend.move_window(id, 300, 300);
    h.pump().await;
    assert_eq!(h.window(refs[0]).position(), (200, 200));
}

#[tokio::test]
async fn test_references_close_with_their_document() {
    let mut h = Harness::new(Platform::MacOs);
    let id = h.new_document().await;
    let refs = open_references(&mut h, id, &["/img/a.png", "/img/b.png"]).await;

    h.backend.request_close(id);
    h.pump().await;

    assert!(refs.iter().all(|r| h.window(*r).is_destroyed()));
    assert!(h.wm().references_of(id).is_empty());
}

#[tokio::test]
async fn test_closed_reference_is_forgotten() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;
    let refs = open_references(&mut h, id, &["/img/a.png", "/img/b.png"]).await;

    h.window(refs[0]).destroy();
    h.pump().await;

    let remaining: Vec<WindowId> = h
        .wm()
        .references_of(id)
        .iter()
        .map(|link| link.window.id())
        .collect();
    assert_eq!(remaining, vec![refs[1]]);
    assert_eq!(h.session_count(), 1);
}

#[tokio::test]
async fn test_reference_image_is_sent_to_the_requesting_document() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;
    h.backend
        .script_dialog(vec![PathBuf::from("/img/a.png"), PathBuf::from("/img/b.png")]);

    h.message(id, InboundMessage::OpenReferenceImage { id: None })
        .await;

    assert!(!h.backend.dialog_requests()[0].multiple);
    assert!(h.sent(id).contains(&OutboundMessage::SetReferenceImage {
        file: PathBuf::from("/img/a.png")
    }));
}

#[tokio::test]
async fn test_cancelled_reference_image_sends_nothing() {
    let mut h = Harness::new(Platform::Linux);
    let id = h.new_document().await;

    h.message(id, InboundMessage::OpenReferenceImage { id: Some(id) })
        .await;

    assert!(
        !h.sent(id)
            .iter()
            .any(|message| matches!(message, OutboundMessage::SetReferenceImage { .. }))
    );
}
