//! End-to-end behaviour of the history service over the reference adapters.

mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use ct_app::{CaptureOutcome, MonitorState, StopOutcome};
use ct_core::clipboard::{ClipboardSnapshot, ContentType};
use ct_core::ports::{BlobStorePort, ProbeError};
use ct_core::settings::{CaptureFilters, HistorySettings, RetryConfig, SettingsError};
use support::{fast_settings, harness, harness_with_clock, png_bytes, Observed, ScriptedClock};

fn text(s: &str) -> ClipboardSnapshot {
    ClipboardSnapshot::text(s)
}

#[tokio::test]
async fn test_polled_changes_are_recorded_in_order() {
    let h = harness(fast_settings());
    h.service.start_with_settings().await.unwrap();

    for (i, word) in ["one", "two", "three"].iter().enumerate() {
        h.clipboard.set_text(word);
        assert!(h.wait_for_count(i + 1).await, "entry {word} not recorded");
    }

    assert_eq!(h.texts().await, ["three", "two", "one"]);
    assert_eq!(h.service.stop().await, StopOutcome::Graceful);
}

#[tokio::test]
async fn test_consecutive_identical_copies_record_once() {
    let h = harness(fast_settings());

    let first = h.service.capture_manual(text("same")).await.unwrap();
    let second = h.service.capture_manual(text("same")).await.unwrap();

    assert!(matches!(first, CaptureOutcome::Accepted { .. }));
    assert_eq!(second, CaptureOutcome::Duplicate);
    assert_eq!(h.count().await, 1);
}

#[tokio::test]
async fn test_repeated_content_after_another_copy_is_recorded_again() {
    let h = harness(fast_settings());

    for s in ["x", "y", "x"] {
        h.service.capture_manual(text(s)).await.unwrap();
    }

    assert_eq!(h.texts().await, ["x", "y", "x"]);
}

#[tokio::test]
async fn test_links_and_plain_text_are_classified() {
    let h = harness(fast_settings());

    let link = h
        .service
        .capture_manual(text("https://example.com/path"))
        .await
        .unwrap();
    let plain = h.service.capture_manual(text("hello world")).await.unwrap();

    assert_eq!(link.entry().unwrap().content_type, ContentType::Link);
    assert_eq!(plain.entry().unwrap().content_type, ContentType::Text);
}

#[tokio::test]
async fn test_limit_keeps_most_recent_entries() {
    let h = harness(HistorySettings {
        max_items: 5,
        ..fast_settings()
    });

    for i in 0..8 {
        h.service.capture_manual(text(&format!("item{i}"))).await.unwrap();
    }

    assert_eq!(h.count().await, 5);
    assert_eq!(h.texts().await, ["item7", "item6", "item5", "item4", "item3"]);
}

#[tokio::test]
async fn test_evicting_an_image_removes_blob_and_metadata() {
    let h = harness(HistorySettings {
        max_items: 1,
        ..fast_settings()
    });

    let image = h
        .service
        .capture_manual(ClipboardSnapshot::Image(png_bytes(1)))
        .await
        .unwrap();
    let image = image.entry().unwrap().clone();
    let blob = image.image_ref().unwrap().clone();
    assert!(h.blobs.read(&blob).await.is_ok());

    let outcome = h.service.capture_manual(text("newer")).await.unwrap();

    match outcome {
        CaptureOutcome::Accepted { evicted, .. } => assert_eq!(evicted, vec![image.id.clone()]),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(h.blobs.read(&blob).await.is_err());
    let remaining = h.service.list_history().await.unwrap();
    assert!(remaining.iter().all(|e| e.image_ref() != Some(&blob)));
    assert!(h.observer.events().contains(&Observed::Deleted(image.id)));
}

#[tokio::test]
async fn test_manual_capture_is_not_recaptured_by_polling() {
    let h = harness(fast_settings());
    h.clipboard.set_text("promoted");

    h.service.capture_manual(text("promoted")).await.unwrap();
    h.service.start_with_settings().await.unwrap();
    h.wait_for_reads(5).await;
    // Give the consumer time to process whatever the monitor emitted.
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.count().await, 1);
    h.service.stop().await;
}

#[tokio::test]
async fn test_locked_clipboard_is_retried_transparently() {
    let h = harness(fast_settings());
    h.clipboard.push(Err(ProbeError::TransientAccessDenied));
    h.clipboard.push(Err(ProbeError::TransientAccessDenied));
    h.clipboard.set_text("third attempt");

    h.service.start_with_settings().await.unwrap();

    assert!(h.wait_for_count(1).await);
    assert_eq!(h.texts().await, ["third attempt"]);
    h.service.stop().await;
}

#[tokio::test]
async fn test_stop_during_retry_returns_within_grace() {
    let settings = fast_settings();
    let grace = settings.stop_grace();
    let h = harness(settings);
    h.clipboard.set_locked();

    h.service
        .start(
            Duration::from_millis(1),
            RetryConfig::new(1_000, Duration::from_millis(50)),
            CaptureFilters::default(),
        )
        .await
        .unwrap();
    h.wait_for_reads(1).await;

    let started = Instant::now();
    let outcome = h.service.stop().await;

    assert_eq!(outcome, StopOutcome::Graceful);
    assert!(started.elapsed() < grace);
    assert_eq!(h.service.monitor_state(), MonitorState::Stopped);
    assert_eq!(h.count().await, 0);
}

#[tokio::test]
async fn test_start_and_stop_are_idempotent() {
    let h = harness(fast_settings());

    assert_eq!(h.service.stop().await, StopOutcome::AlreadyStopped);
    h.service.start_with_settings().await.unwrap();
    h.service.start_with_settings().await.unwrap();
    assert_eq!(h.service.monitor_state(), MonitorState::Running);

    h.clipboard.set_text("only once");
    assert!(h.wait_for_count(1).await);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.count().await, 1);

    assert_eq!(h.service.stop().await, StopOutcome::Graceful);
    assert_eq!(h.service.stop().await, StopOutcome::AlreadyStopped);

    // Restart picks up new changes again.
    h.service.start_with_settings().await.unwrap();
    h.clipboard.set_text("after restart");
    assert!(h.wait_for_count(2).await);
    h.service.stop().await;
}

#[tokio::test]
async fn test_start_rejects_zero_poll_interval() {
    let h = harness(fast_settings());
    let result = h
        .service
        .start(Duration::ZERO, RetryConfig::new(3, Duration::ZERO), CaptureFilters::default())
        .await;
    assert!(result.is_err());
    assert_eq!(h.service.monitor_state(), MonitorState::Stopped);
}

#[tokio::test]
async fn test_disabled_content_types_are_discarded() {
    let h = harness(HistorySettings {
        capture_links: false,
        ..fast_settings()
    });

    let outcome = h
        .service
        .capture_manual(text("https://example.com"))
        .await
        .unwrap();
    assert_eq!(outcome, CaptureOutcome::Filtered(ContentType::Link));
    assert_eq!(h.count().await, 0);

    h.service.update_filters(CaptureFilters::default()).await;
    assert_eq!(h.service.filters().await, CaptureFilters::default());

    // A filtered capture never touched LastSeen, so the same link is accepted now.
    let outcome = h
        .service
        .capture_manual(text("https://example.com"))
        .await
        .unwrap();
    assert!(matches!(outcome, CaptureOutcome::Accepted { .. }));
}

#[tokio::test]
async fn test_lowering_the_limit_evicts_immediately() {
    let h = harness(fast_settings());
    for i in 0..5 {
        h.service.capture_manual(text(&format!("n{i}"))).await.unwrap();
    }

    let report = h.service.set_max_items(2).await.unwrap();

    assert_eq!(report.evicted.len(), 3);
    assert_eq!(h.service.max_items().await, 2);
    assert_eq!(h.texts().await, ["n4", "n3"]);

    assert!(matches!(
        h.service.set_max_items(0).await,
        Err(SettingsError::MaxItemsOutOfRange { value: 0, .. })
    ));
    assert!(h.service.set_max_items(10_001).await.is_err());
    assert_eq!(h.service.max_items().await, 2);
}

#[tokio::test]
async fn test_deleting_the_latest_entry_allows_recapture() {
    let h = harness(fast_settings());
    let outcome = h.service.capture_manual(text("oops")).await.unwrap();
    let id = outcome.entry().unwrap().id.clone();

    h.service.delete_entry(&id).await.unwrap();

    assert_eq!(h.count().await, 0);
    assert!(h.observer.events().contains(&Observed::Deleted(id.clone())));
    assert!(h.service.delete_entry(&id).await.is_err());

    let again = h.service.capture_manual(text("oops")).await.unwrap();
    assert!(matches!(again, CaptureOutcome::Accepted { .. }));
}

#[tokio::test]
async fn test_deleting_an_image_entry_removes_its_blob() {
    let h = harness(fast_settings());
    let outcome = h
        .service
        .capture_manual(ClipboardSnapshot::Image(png_bytes(7)))
        .await
        .unwrap();
    let entry = outcome.entry().unwrap().clone();
    let blob = entry.image_ref().unwrap().clone();

    h.service.delete_entry(&entry.id).await.unwrap();

    assert!(h.blobs.read(&blob).await.is_err());
}

#[tokio::test]
async fn test_clear_history_removes_everything() {
    let h = harness(fast_settings());
    h.service.capture_manual(text("a")).await.unwrap();
    let image = h
        .service
        .capture_manual(ClipboardSnapshot::Image(png_bytes(3)))
        .await
        .unwrap();
    let blob = image.entry().unwrap().image_ref().unwrap().clone();

    assert_eq!(h.service.clear_history().await.unwrap(), 2);

    assert_eq!(h.count().await, 0);
    assert!(h.blobs.read(&blob).await.is_err());
    assert_eq!(h.observer.events().last(), Some(&Observed::Cleared));

    // LastSeen was reset with the history.
    let again = h
        .service
        .capture_manual(ClipboardSnapshot::Image(png_bytes(3)))
        .await
        .unwrap();
    assert!(matches!(again, CaptureOutcome::Accepted { .. }));
}

#[tokio::test]
async fn test_search_history_ignores_case() {
    let h = harness(fast_settings());
    for s in ["Meeting notes", "https://docs.rs/tokio", "lunch"] {
        h.service.capture_manual(text(s)).await.unwrap();
    }

    let hits = h.service.search_history("MEETING").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text_content(), Some("Meeting notes"));

    assert_eq!(h.service.search_history("").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_empty_and_unreadable_snapshots_are_skipped() {
    let h = harness(fast_settings());
    assert_eq!(
        h.service.capture_manual(ClipboardSnapshot::Empty).await.unwrap(),
        CaptureOutcome::Skipped
    );
    assert_eq!(
        h.service
            .capture_manual(ClipboardSnapshot::Unreadable)
            .await
            .unwrap(),
        CaptureOutcome::Skipped
    );
    assert_eq!(h.count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_captures_insert_once() {
    let h = harness(fast_settings());

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let service = Arc::clone(&h.service);
            tokio::spawn(async move { service.capture_manual(text("race")).await.unwrap() })
        })
        .collect();

    let mut accepted = 0;
    for task in tasks {
        if matches!(task.await.unwrap(), CaptureOutcome::Accepted { .. }) {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(h.count().await, 1);
}

#[tokio::test]
async fn test_capture_times_never_go_backwards() {
    let clock = Arc::new(ScriptedClock::new(&[1_000, 900, 1_200]));
    let h = harness_with_clock(fast_settings(), clock);

    let mut stamps = Vec::new();
    for s in ["a", "b", "c"] {
        let outcome = h.service.capture_manual(text(s)).await.unwrap();
        stamps.push(outcome.entry().unwrap().captured_at_ms);
    }

    assert_eq!(stamps, [1_000, 1_000, 1_200]);
}

#[tokio::test]
async fn test_observer_sees_additions_in_capture_order() {
    let h = harness(fast_settings());
    let mut ids = Vec::new();
    for s in ["first", "second"] {
        let outcome = h.service.capture_manual(text(s)).await.unwrap();
        ids.push(outcome.entry().unwrap().id.clone());
    }

    assert_eq!(
        h.observer.events(),
        ids.into_iter().map(Observed::Added).collect::<Vec<_>>()
    );
}
