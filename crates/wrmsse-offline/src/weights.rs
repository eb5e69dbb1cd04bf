use std::collections::HashMap;

use tracing::{info, warn};
use wrmsse_aggregate::aggregate;
use wrmsse_core::{CalendarDay, Result, SellPrice, SeriesTable, SeriesValue, WrmsseError};

/// Revenue-share weights for every aggregated series.
///
/// The reference window is the `horizon` days immediately preceding the
/// held-out evaluation horizon at the end of `sales`. Each bottom-level
/// series' revenue over that window is its quantity times the weekly unit
/// price resolved through the calendar; shares of total revenue are then
/// rolled up through all 12 levels and scaled by 1/12, so the weights of
/// each level sum to 1/12 and the full vector sums to 1.
pub fn build_weights(
    sales: &SeriesTable,
    calendar: &[CalendarDay],
    prices: &[SellPrice],
    horizon: usize,
) -> Result<Vec<SeriesValue>> {
    let n = sales.days.len();
    if horizon == 0 || n < 2 * horizon {
        return Err(WrmsseError::DataUnavailable(format!(
            "need at least {} day columns for a {horizon}-day reference window, got {n}",
            2 * horizon
        )));
    }
    let window = sales.day_range(n - 2 * horizon..n - horizon)?;

    // Resolve each window day to its price week. A gap in the calendar is
    // structural and fails the build.
    let week_of_day: HashMap<&str, u32> =
        calendar.iter().map(|c| (c.d.as_str(), c.wm_yr_wk)).collect();
    let mut weeks = Vec::with_capacity(window.days.len());
    for d in &window.days {
        let week = week_of_day.get(d.as_str()).copied().ok_or_else(|| {
            WrmsseError::DataUnavailable(format!("calendar has no entry for day {d}"))
        })?;
        weeks.push(week);
    }

    let price_of: HashMap<(&str, &str, u32), f64> = prices
        .iter()
        .map(|p| {
            (
                (p.store_id.as_str(), p.item_id.as_str(), p.wm_yr_wk),
                p.sell_price,
            )
        })
        .collect();

    // Per-series window revenue. Days without a listed price sell nothing;
    // a series priced on no window day keeps zero revenue and drops out of
    // the normalization.
    let mut revenue = Vec::with_capacity(window.ids.len());
    let mut unpriced = 0usize;
    for (id, row) in window.ids.iter().zip(&window.values) {
        let mut total = 0.0;
        let mut priced_days = 0usize;
        for (qty, week) in row.iter().zip(&weeks) {
            if let Some(price) =
                price_of.get(&(id.store_id.as_str(), id.item_id.as_str(), *week))
            {
                total += qty * price;
                priced_days += 1;
            }
        }
        if priced_days == 0 {
            unpriced += 1;
        }
        revenue.push(total);
    }
    if unpriced > 0 {
        warn!(
            series = unpriced,
            "series without price coverage in the reference window; assigned zero revenue"
        );
    }

    let total_revenue: f64 = revenue.iter().sum();
    if total_revenue <= 0.0 {
        return Err(WrmsseError::DataUnavailable(
            "total reference-window revenue is not positive".into(),
        ));
    }

    // Roll the shares up through all 12 levels; same grouping as the
    // quantity aggregation, summing shares instead.
    let shares = SeriesTable {
        ids: window.ids.clone(),
        days: vec!["revenue_share".into()],
        values: revenue.iter().map(|r| vec![r / total_revenue]).collect(),
    };
    let agg = aggregate(&shares)?;

    let mut weights: Vec<SeriesValue> = agg
        .rows
        .into_iter()
        .map(|row| SeriesValue {
            level: row.level,
            key: row.key,
            value: row.values[0] / 12.0,
        })
        .collect();

    // The grand total is one whole series, not a sum of shares.
    if let Some(first) = weights.first_mut() {
        debug_assert_eq!(first.level, 1);
        first.value = 1.0 / 12.0;
    }

    info!(series = weights.len(), "built revenue weights");
    Ok(weights)
}

#[cfg(test)]
mod tests;
