use anyhow::Result;
use edgecap::application::catalogue::{ChartCatalogue, STRESS_CHART};
use edgecap::application::chart_cache::ChartCache;
use edgecap::application::live_series::{ChartSource, LiveSeriesService, ViewHandle};
use edgecap::domain::errors::SheetError;
use edgecap::domain::fund_returns::PerformanceRow;
use edgecap::domain::series::FlatPathPolicy;
use edgecap::infrastructure::mock::MockPerformanceSource;
use std::sync::Arc;
use std::time::Duration;

fn cache() -> Arc<ChartCache> {
    Arc::new(ChartCache::build(&ChartCatalogue::builtin(), FlatPathPolicy::Fail).unwrap())
}

fn stress_row(label: &str, base: f64) -> PerformanceRow {
    serde_json::from_value(serde_json::json!({
        "week": label,
        "volPrem": base,
        "corr": base,
        "msci": base,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_slow_fetch_times_out_to_fallback() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let source = MockPerformanceSource::with_rows(vec![stress_row("Jan 1", 50.0)])
        .delayed(Duration::from_millis(500));
    let service = LiveSeriesService::new(cache(), Arc::new(source), Duration::from_millis(20));

    let displayed = service.resolve(STRESS_CHART).await?;
    assert!(matches!(
        displayed.source,
        ChartSource::Fallback { ref reason } if reason.contains("timed out")
    ));
    assert_eq!(displayed.points.len(), 52);
    assert_eq!(displayed.points[0].label, "Jan 1");
    Ok(())
}

#[tokio::test]
async fn test_empty_sheet_falls_back() -> Result<()> {
    let source = MockPerformanceSource::failing(SheetError::NoData);
    let service = LiveSeriesService::new(cache(), Arc::new(source), Duration::from_secs(1));

    let displayed = service.resolve(STRESS_CHART).await?;
    let synthetic = cache().get(STRESS_CHART)?;
    assert_eq!(displayed.values("msci"), synthetic.values("msci"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_chart_is_an_error() {
    let source = MockPerformanceSource::with_rows(Vec::new());
    let probe = source.clone();
    let service = LiveSeriesService::new(cache(), Arc::new(source), Duration::from_secs(1));

    assert!(service.resolve("quarterly").await.is_err());
    assert_eq!(probe.calls(), 0);
}

#[tokio::test]
async fn test_late_result_for_unmounted_view_is_dropped() {
    let source = MockPerformanceSource::with_rows(vec![stress_row("Jan 1", 50.0)])
        .delayed(Duration::from_millis(100));
    let service = Arc::new(LiveSeriesService::new(
        cache(),
        Arc::new(source),
        Duration::from_secs(5),
    ));

    let view = ViewHandle::mount();
    let token = view.token();
    let task = {
        let service = service.clone();
        tokio::spawn(async move { service.resolve_for_view(STRESS_CHART, token).await })
    };

    drop(view);
    let outcome = task.await.unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn test_mounted_view_receives_live_result() {
    let source = MockPerformanceSource::with_rows(vec![
        stress_row("Jan 1", 50.0),
        stress_row("Jan 8", 55.0),
    ]);
    let service = LiveSeriesService::new(cache(), Arc::new(source), Duration::from_secs(5));

    let view = ViewHandle::mount();
    let displayed = service
        .resolve_for_view(STRESS_CHART, view.token())
        .await
        .unwrap()
        .unwrap();

    assert!(displayed.source.is_live());
    assert_eq!(displayed.points.len(), 2);
    assert_eq!(displayed.points[0].values["corr"], 100.0);
}
