use fastimage::testing::{mock_sources, mock_uri, MockBehavior, MockLoader};
use fastimage::{ImageSource, PreloadSummary, Preloader, Priority};
use std::time::Duration;

#[tokio::test]
async fn test_preload_all_succeed() {
    let preloader = Preloader::with_concurrency(MockLoader::new(), 4);

    let summary = preloader.preload(mock_sources(5)).await.unwrap();

    assert_eq!(summary, PreloadSummary::new(5, 0));
    assert_eq!(preloader.loader().load_count(), 5);
}

#[tokio::test]
async fn test_preload_mixed_outcomes() {
    let loader = MockLoader::new()
        .fail(mock_uri(1), "404 Not Found")
        .fail(mock_uri(4), "decode error");
    let preloader = Preloader::with_concurrency(loader, 8);

    let summary = preloader.preload(mock_sources(6)).await.unwrap();

    assert_eq!(summary, PreloadSummary::new(4, 2));
}

#[tokio::test]
async fn test_preload_nothing_resolves_immediately() {
    let preloader = Preloader::with_concurrency(MockLoader::new(), 1);

    let summary = preloader.preload(Vec::new()).await.unwrap();

    assert_eq!(summary, PreloadSummary::new(0, 0));
    assert_eq!(preloader.loader().load_count(), 0);
}

#[tokio::test]
async fn test_panicking_load_counts_as_skipped() {
    let loader = MockLoader::new().script(mock_uri(0), MockBehavior::Panic);
    let preloader = Preloader::with_concurrency(loader, 2);

    let summary = preloader.preload(mock_sources(3)).await.unwrap();

    assert_eq!(summary, PreloadSummary::new(2, 1));
}

#[tokio::test]
async fn test_hanging_load_keeps_batch_open() {
    let loader = MockLoader::new().script(mock_uri(2), MockBehavior::Hang);
    let preloader = Preloader::with_concurrency(loader, 4);

    let handle = preloader.preload(mock_sources(3));
    let result = tokio::time::timeout(Duration::from_millis(100), handle).await;

    assert!(result.is_err(), "batch must wait for every load");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_limit_is_respected() {
    let loader = MockLoader::new().with_delay(Duration::from_millis(20));
    let preloader = Preloader::with_concurrency(loader, 3);

    let summary = preloader.preload(mock_sources(12)).await.unwrap();

    assert_eq!(summary, PreloadSummary::new(12, 0));
    assert!(preloader.loader().max_in_flight() <= 3);
    assert!(preloader.loader().max_in_flight() >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_preloads_are_isolated() {
    let loader = MockLoader::new()
        .with_delay(Duration::from_millis(5))
        .fail("mock://other/0", "gone")
        .fail("mock://other/1", "gone");
    let preloader = Preloader::with_concurrency(loader, 16);

    let first = preloader.preload(mock_sources(7));
    let second = preloader.preload(
        (0..4)
            .map(|i| ImageSource::new(format!("mock://other/{}", i)))
            .collect(),
    );
    assert_ne!(first.batch_id(), second.batch_id());

    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap(), PreloadSummary::new(7, 0));
    assert_eq!(second.unwrap(), PreloadSummary::new(2, 2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_preloads() {
    let preloader = Preloader::with_concurrency(MockLoader::new(), 32);

    let handles: Vec<_> = (0..50)
        .map(|n| {
            let preloader = preloader.clone();
            tokio::spawn(async move { (n, preloader.preload(mock_sources(n)).await) })
        })
        .collect();

    for handle in handles {
        let (n, result) = handle.await.unwrap();
        assert_eq!(result.unwrap(), PreloadSummary::new(n, 0));
    }
}

#[tokio::test]
async fn test_dropped_handle_does_not_stop_loads() {
    let loader = MockLoader::new().with_delay(Duration::from_millis(10));
    let preloader = Preloader::with_concurrency(loader, 4);

    drop(preloader.preload(mock_sources(4)));
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(preloader.loader().load_count(), 4);
}

#[tokio::test]
async fn test_high_priority_sources_start_first() {
    let loader = MockLoader::new().with_delay(Duration::from_millis(5));
    let preloader = Preloader::with_concurrency(loader, 1);

    let mut sources: Vec<ImageSource> = (0..4)
        .map(|i| ImageSource::new(format!("low{}", i)).with_priority(Priority::Low))
        .collect();
    sources.push(ImageSource::new("normal"));
    sources.push(ImageSource::new("high").with_priority(Priority::High));

    let summary = preloader.preload(sources).await.unwrap();

    assert_eq!(summary, PreloadSummary::new(6, 0));
    assert_eq!(
        preloader.loader().started_uris(),
        vec!["high", "normal", "low0", "low1", "low2", "low3"]
    );
}

#[tokio::test]
async fn test_closed_preloader_skips_pending_loads() {
    let preloader = Preloader::with_concurrency(MockLoader::new(), 2);
    preloader.close();
    assert!(preloader.is_closed());

    let summary = preloader.preload(mock_sources(3)).await.unwrap();

    assert_eq!(summary, PreloadSummary::new(0, 3));
    assert_eq!(preloader.loader().load_count(), 0);
}

#[tokio::test]
async fn test_close_skips_loads_waiting_for_a_permit() {
    let loader = MockLoader::new().with_delay(Duration::from_millis(50));
    let preloader = Preloader::with_concurrency(loader, 1);

    let handle = preloader.preload(mock_sources(3));
    // Let the first load take the only permit
    tokio::time::sleep(Duration::from_millis(10)).await;
    preloader.close();

    assert_eq!(handle.await.unwrap(), PreloadSummary::new(1, 2));
    assert_eq!(preloader.loader().load_count(), 1);
}

#[tokio::test]
async fn test_clear_caches_delegate_to_loader() {
    let preloader = Preloader::with_concurrency(MockLoader::new(), 1);

    preloader.clear_memory_cache().await.unwrap();
    preloader.clear_disk_cache().await.unwrap();
    preloader.clear_disk_cache().await.unwrap();

    assert_eq!(preloader.loader().memory_clears(), 1);
    assert_eq!(preloader.loader().disk_clears(), 2);
}

#[tokio::test]
async fn test_summary_json_shape() {
    let loader = MockLoader::new().fail(mock_uri(0), "nope");
    let preloader = Preloader::with_concurrency(loader, 2);

    let summary = preloader.preload(mock_sources(2)).await.unwrap();

    assert_eq!(
        serde_json::to_value(summary).unwrap(),
        serde_json::json!({"finishedCount": 1, "skippedCount": 1})
    );
}
