use chrono::NaiveDate;
use wrmsse_core::{CalendarDay, SellPrice, SeriesId, SeriesTable};

/// Cardinalities of a synthetic M5-shaped dataset.
#[derive(Debug, Clone)]
pub struct FixtureSpec {
    pub states: usize,
    pub stores_per_state: usize,
    pub cats: usize,
    pub depts_per_cat: usize,
    pub items_per_dept: usize,
    /// Total day columns, evaluation horizon included.
    pub days: usize,
    pub horizon: usize,
}

impl Default for FixtureSpec {
    fn default() -> Self {
        Self {
            states: 2,
            stores_per_state: 2,
            cats: 2,
            depts_per_cat: 2,
            items_per_dept: 4,
            days: 120,
            horizon: 28,
        }
    }
}

/// A complete synthetic dataset plus the counts tests assert against.
#[derive(Debug, Clone)]
pub struct HierarchyFixture {
    pub sales: SeriesTable,
    pub calendar: Vec<CalendarDay>,
    pub prices: Vec<SellPrice>,
    pub horizon: usize,
    pub bottom_series: usize,
    /// Closed-form row count of the 12-level roll-up.
    pub aggregate_series: usize,
}

impl HierarchyFixture {
    /// The held-out actuals as forecast rows, in sales row order.
    pub fn exact_forecast_rows(&self) -> Vec<Vec<f64>> {
        let n = self.sales.days.len();
        self.sales
            .values
            .iter()
            .map(|row| row[n - self.horizon..].to_vec())
            .collect()
    }
}

/// Deterministic pseudo-random fraction in 0..1 (LCG, Numerical Recipes).
fn lcg_frac(state: &mut u64) -> f64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
    ((*state >> 33) as f64) / (u32::MAX as f64)
}

/// Generate a dataset with every item sold at every store. Demands are
/// small integers, prices multiples of 0.25, so group sums stay exact
/// regardless of summation order.
pub fn generate(spec: &FixtureSpec) -> HierarchyFixture {
    let stores = spec.states * spec.stores_per_state;
    let depts = spec.cats * spec.depts_per_cat;
    let items = depts * spec.items_per_dept;
    let bottom_series = items * stores;
    let aggregate_series = 1
        + spec.states
        + stores
        + spec.cats
        + depts
        + spec.states * spec.cats
        + spec.states * depts
        + stores * spec.cats
        + stores * depts
        + items
        + items * spec.states
        + bottom_series;

    let start = NaiveDate::from_ymd_opt(2011, 1, 29).expect("valid fixture start date");
    let calendar: Vec<CalendarDay> = (0..spec.days)
        .map(|i| CalendarDay {
            d: format!("d_{}", i + 1),
            date: start + chrono::Days::new(i as u64),
            wm_yr_wk: 11101 + (i / 7) as u32,
        })
        .collect();

    let mut item_names = Vec::with_capacity(items);
    for cat in 0..spec.cats {
        for dept in 0..spec.depts_per_cat {
            for item in 0..spec.items_per_dept {
                item_names.push((
                    format!("CAT{cat}"),
                    format!("CAT{cat}_{dept}"),
                    format!("CAT{cat}_{dept}_{item:03}"),
                ));
            }
        }
    }

    let mut ids = Vec::with_capacity(bottom_series);
    let mut values = Vec::with_capacity(bottom_series);
    let mut series_index = 0usize;
    for state in 0..spec.states {
        for store in 0..spec.stores_per_state {
            let state_id = format!("ST{state}");
            let store_id = format!("ST{state}_{store}");
            for (cat_id, dept_id, item_id) in &item_names {
                ids.push(SeriesId {
                    id: format!("{item_id}_{store_id}"),
                    item_id: item_id.clone(),
                    dept_id: dept_id.clone(),
                    cat_id: cat_id.clone(),
                    store_id: store_id.clone(),
                    state_id: state_id.clone(),
                });

                // A few series start late to exercise zero trimming.
                let lead_zeros = if series_index % 7 == 3 {
                    (spec.days / 6).min(14)
                } else {
                    0
                };
                let base = 1 + series_index % 5;
                let mut state_lcg = 0x5DEECE66D ^ (series_index as u64);
                let row: Vec<f64> = (0..spec.days)
                    .map(|day| {
                        if day < lead_zeros {
                            0.0
                        } else {
                            (base + (lcg_frac(&mut state_lcg) * 4.0) as usize) as f64
                        }
                    })
                    .collect();
                values.push(row);
                series_index += 1;
            }
        }
    }

    let weeks = spec.days.div_ceil(7);
    let mut prices = Vec::with_capacity(stores * items * weeks);
    for state in 0..spec.states {
        for store in 0..spec.stores_per_state {
            let store_id = format!("ST{state}_{store}");
            let store_index = state * spec.stores_per_state + store;
            for (item_index, (_, _, item_id)) in item_names.iter().enumerate() {
                for week in 0..weeks {
                    prices.push(SellPrice {
                        store_id: store_id.clone(),
                        item_id: item_id.clone(),
                        wm_yr_wk: 11101 + week as u32,
                        sell_price: 1.5
                            + (item_index % 8) as f64 * 0.75
                            + (store_index % 3) as f64 * 0.25,
                    });
                }
            }
        }
    }

    let days = (1..=spec.days).map(|i| format!("d_{i}")).collect();
    let sales = SeriesTable {
        ids,
        days,
        values,
    };

    HierarchyFixture {
        sales,
        calendar,
        prices,
        horizon: spec.horizon,
        bottom_series,
        aggregate_series,
    }
}
