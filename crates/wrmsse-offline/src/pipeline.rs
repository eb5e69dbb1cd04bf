use tracing::info;
use wrmsse_aggregate::aggregate;
use wrmsse_core::{CalendarDay, EvalConfig, Result, SellPrice, SeriesTable, WrmsseError};
use wrmsse_store::FsArtifactStore;

use crate::scales::build_scales;
use crate::weights::build_weights;

/// What one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub bottom_series: usize,
    pub aggregate_series: usize,
    pub train_days: usize,
    pub horizon: usize,
}

/// Derive and persist the four scoring artifacts for one dataset release.
///
/// `sales` is the full history including the final `horizon` evaluation
/// days. Runs once per release; the online scorer only ever reads the
/// result.
pub fn generate_artifacts(
    sales: &SeriesTable,
    calendar: &[CalendarDay],
    prices: &[SellPrice],
    config: &EvalConfig,
    store: &FsArtifactStore,
) -> Result<ArtifactSummary> {
    let horizon = config.horizon;
    let n = sales.days.len();
    if horizon == 0 || n <= 2 * horizon {
        return Err(WrmsseError::DataUnavailable(format!(
            "dataset spans {n} days; need more than {} for a {horizon}-day horizon",
            2 * horizon
        )));
    }

    info!(
        series = sales.ids.len(),
        days = n,
        horizon,
        "running artifact pipeline"
    );

    info!("building series identifier artifact");
    store.save(wrmsse_store::SALES_IDS, &sales.ids)?;

    info!("building aggregated actuals artifact");
    let eval = sales.day_range(n - horizon..n)?;
    let test_agg = aggregate(&eval)?;
    let aggregate_series = test_agg.rows.len();
    store.save(wrmsse_store::TEST_AGG, &test_agg)?;

    info!("building error scale artifact");
    let train = sales.day_range(0..n - horizon)?;
    let scales = build_scales(&train)?;
    store.save(wrmsse_store::TRAIN_MSE, &scales)?;

    info!("building weight artifact");
    let weights = build_weights(sales, calendar, prices, horizon)?;
    store.save(wrmsse_store::WEIGHTS, &weights)?;

    Ok(ArtifactSummary {
        bottom_series: sales.ids.len(),
        aggregate_series,
        train_days: n - horizon,
        horizon,
    })
}
