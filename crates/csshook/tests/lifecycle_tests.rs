//! Host lifecycle tests: render, layout commit and unmount.

use csshook::{ClassIdAllocator, StyleError, StyleGenerator, StyleKey};
use csshook_test_utils::{DocumentCall, FailOn, MockDocument};
use std::sync::Arc;

fn colored(doc: &Arc<MockDocument>) -> StyleGenerator<String> {
    csshook_core::logging::try_init();
    StyleGenerator::builder(doc.clone())
        .allocator(Arc::new(ClassIdAllocator::new()))
        .label("colored")
        .build(|cls, color: &String| format!(".{cls}{{color:{color}}}"))
}

#[test]
fn test_first_render_is_unstyled_until_commit() {
    let doc = Arc::new(MockDocument::new());
    let generator = colored(&doc);
    let mut slot = generator.slot();

    assert_eq!(slot.render(&"red".to_string()).unwrap(), "");
    assert_eq!(doc.call_count(), 0);

    assert!(slot.commit().unwrap());
    assert_eq!(slot.render(&"red".to_string()).unwrap(), "_csshook-0");
    assert_eq!(doc.live_count(), 1);
}

#[test]
fn test_two_consumers_share_and_release() {
    let doc = Arc::new(MockDocument::new());
    let generator = colored(&doc);
    let mut first = generator.slot();
    let mut second = generator.slot();

    let a = first.sync(&"red".to_string()).unwrap().to_string();
    let b = second.sync(&"red".to_string()).unwrap().to_string();
    assert_eq!(a, b);
    assert_eq!(doc.count_appends(), 1);

    first.unmount();
    assert_eq!(doc.live_count(), 1);
    second.unmount();
    assert_eq!(doc.live_count(), 0);
}

#[test]
fn test_key_change_releases_before_attaching() {
    let doc = Arc::new(MockDocument::new());
    let generator = colored(&doc);
    let mut slot = generator.slot();

    slot.sync(&"red".to_string()).unwrap();
    doc.clear_calls();

    slot.sync(&"blue".to_string()).unwrap();
    let calls = doc.calls();
    assert!(matches!(calls[0], DocumentCall::RemoveStyleNode { .. }));
    assert!(matches!(calls[1], DocumentCall::CreateStyleNode { .. }));
    assert_eq!(
        slot.subscribed_key(),
        Some(&StyleKey::from(".{color:blue}"))
    );
    assert_eq!(doc.live_texts(), vec!["._csshook-1{color:blue}".to_string()]);
}

#[test]
fn test_key_change_keeps_shared_record() {
    let doc = Arc::new(MockDocument::new());
    let generator = colored(&doc);
    let mut stays = generator.slot();
    let mut moves = generator.slot();

    stays.sync(&"red".to_string()).unwrap();
    moves.sync(&"red".to_string()).unwrap();
    moves.sync(&"blue".to_string()).unwrap();

    assert_eq!(generator.cache().ref_count(".{color:red}"), Some(1));
    assert_eq!(generator.cache().ref_count(".{color:blue}"), Some(1));
    assert_eq!(doc.count_removes(), 0);
}

#[test]
fn test_remount_reexposes_live_class() {
    let doc = Arc::new(MockDocument::new());
    let generator = colored(&doc);
    let mut holder = generator.slot();
    holder.sync(&"red".to_string()).unwrap();

    let mut remounted = generator.slot();
    assert_eq!(remounted.render(&"red".to_string()).unwrap(), "");
    // Reusing a live record still exposes its class name.
    assert!(remounted.commit().unwrap());
    assert_eq!(remounted.class_name(), holder.class_name());
    assert_eq!(doc.count_creates(), 1);
}

#[test]
fn test_same_class_after_resubscribe_needs_no_rerender() {
    let doc = Arc::new(MockDocument::new());
    let generator = colored(&doc);
    let mut holder = generator.slot();
    let mut slot = generator.slot();

    holder.sync(&"red".to_string()).unwrap();
    slot.sync(&"red".to_string()).unwrap();
    slot.unmount();

    // Class name is still the stale value from before unmount.
    assert_eq!(slot.class_name(), "_csshook-0");
    slot.render(&"red".to_string()).unwrap();
    assert!(!slot.commit().unwrap());
    assert!(slot.is_subscribed());
}

#[test]
fn test_failed_commit_leaves_slot_unsubscribed() {
    let doc = Arc::new(MockDocument::new());
    let generator = colored(&doc);
    let mut slot = generator.slot();

    slot.sync(&"red".to_string()).unwrap();
    doc.fail_next(FailOn::SetText);

    slot.render(&"blue".to_string()).unwrap();
    let err = slot.commit().unwrap_err();
    assert!(matches!(err, StyleError::Document(_)));
    assert!(!slot.is_subscribed());
    assert_eq!(slot.class_name(), "");
    assert!(generator.cache().is_empty());
    assert_eq!(doc.live_count(), 0);
}

#[test]
fn test_dropping_slot_releases() {
    let doc = Arc::new(MockDocument::new());
    let generator = colored(&doc);

    let mut slot = generator.slot();
    slot.sync(&"red".to_string()).unwrap();
    drop(slot);

    assert_eq!(doc.count_removes(), 1);
    assert!(generator.cache().is_empty());
}
