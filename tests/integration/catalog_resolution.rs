use crate::integration::support::{entries, GatedFetcher, ScriptedFetcher};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use xibe_bridge::catalog::{builtin_templates, CacheSource, TemplateAggregator, TtlResourceCache};
use xibe_bridge::clock::ManualClock;
use xibe_bridge::error::{ErrorKind, FetchError};

const TTL: Duration = Duration::from_secs(300);

fn outage() -> FetchError {
    FetchError::Transport("connection refused".to_string())
}

#[tokio::test]
async fn ttl_window_reflects_one_fetch_then_degrades_to_stale() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        Ok(entries(&["gpt", "claude"])),
        Err(outage()),
    ]));
    let clock = Arc::new(ManualClock::new(0));
    let cache = TtlResourceCache::new("language-models", fetcher.clone(), clock.clone(), TTL);

    let first = cache.get().await;
    for _ in 0..3 {
        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get().await, first);
    }
    assert_eq!(fetcher.calls(), 1);

    clock.advance(Duration::from_secs(120));
    let lookup = cache.lookup().await;
    assert_eq!(lookup.value, first);
    assert!(matches!(lookup.source, CacheSource::Stale(_)));
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn cold_cache_outage_is_empty_not_an_error() {
    let fetcher = Arc::new(ScriptedFetcher::new(vec![Err(outage())]));
    let cache = TtlResourceCache::new(
        "language-models",
        fetcher,
        Arc::new(ManualClock::new(0)),
        TTL,
    );
    let lookup = cache.lookup().await;
    assert!(lookup.value.is_empty());
    assert!(matches!(lookup.source, CacheSource::Unavailable(_)));
}

#[tokio::test]
async fn builtin_templates_precede_remote_in_source_order() {
    let remote = Arc::new(ScriptedFetcher::new(vec![Ok(entries(&["z-remote", "a-remote"]))]));
    let aggregator = TemplateAggregator::with_builtin(remote);

    let ids: Vec<String> = aggregator
        .get_all()
        .await
        .into_iter()
        .map(|entry| entry.id)
        .collect();
    let mut expected: Vec<String> = builtin_templates().into_iter().map(|e| e.id).collect();
    expected.extend(["z-remote".to_string(), "a-remote".to_string()]);
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn simultaneous_template_requests_share_one_remote_call() {
    let remote = Arc::new(GatedFetcher::new(Ok(entries(&["remote-astro"]))));
    let aggregator = Arc::new(TemplateAggregator::with_builtin(remote.clone()));

    let callers = (0..8).map(|_| {
        let aggregator = Arc::clone(&aggregator);
        async move { aggregator.get_all().await }
    });
    let release = async {
        tokio::task::yield_now().await;
        remote.release(8);
    };
    let (results, ()) = tokio::join!(join_all(callers), release);

    assert_eq!(remote.calls(), 1);
    for result in &results {
        assert_eq!(result.last().map(|e| e.id.as_str()), Some("remote-astro"));
    }

    // Settled fetch clears the marker; the next request goes out again.
    aggregator.fetch_dynamic().await;
    assert_eq!(remote.calls(), 2);
}

#[tokio::test]
async fn unknown_template_id_is_named_in_not_found() {
    let remote = Arc::new(ScriptedFetcher::new(vec![Err(outage())]));
    let aggregator = TemplateAggregator::with_builtin(remote);

    let err = aggregator.resolve_or_fail("nonexistent-id").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("nonexistent-id"));

    let react = aggregator.resolve_or_fail("react").await.unwrap();
    assert_eq!(react.id, "react");
}
