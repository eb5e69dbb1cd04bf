use tracing::{debug, info};
use wrmsse_aggregate::aggregate;
use wrmsse_core::{naive_error_scale, Result, SeriesTable, SeriesValue};

/// Naive one-step-ahead error scale for every aggregated series.
///
/// `train` must already exclude the evaluation horizon; the scale is the
/// denominator of the scaled error and may not see held-out days. Series
/// whose zero-trimmed history is shorter than two days get a `0.0`
/// sentinel and are excluded from the weighted sum at scoring time.
pub fn build_scales(train: &SeriesTable) -> Result<Vec<SeriesValue>> {
    let agg = aggregate(train)?;

    let mut degenerate = 0usize;
    let scales: Vec<SeriesValue> = agg
        .rows
        .into_iter()
        .map(|row| {
            let value = naive_error_scale(&row.values);
            if value == 0.0 {
                degenerate += 1;
            }
            SeriesValue {
                level: row.level,
                key: row.key,
                value,
            }
        })
        .collect();

    if degenerate > 0 {
        debug!(series = degenerate, "series with degenerate error scale");
    }
    info!(series = scales.len(), "built error scales");
    Ok(scales)
}
