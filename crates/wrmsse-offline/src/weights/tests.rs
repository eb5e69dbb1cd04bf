use super::*;
use wrmsse_core::{NaiveDate, SeriesId};

fn make_id(item: &str) -> SeriesId {
    SeriesId {
        id: format!("{item}_CA_1"),
        item_id: item.into(),
        dept_id: "FOODS_1".into(),
        cat_id: "FOODS".into(),
        store_id: "CA_1".into(),
        state_id: "CA".into(),
    }
}

fn make_calendar(days: usize) -> Vec<CalendarDay> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 29).unwrap();
    (0..days)
        .map(|i| CalendarDay {
            d: format!("d_{}", i + 1),
            date: start + chrono::Days::new(i as u64),
            wm_yr_wk: 11101 + (i / 7) as u32,
        })
        .collect()
}

fn make_price(item: &str, price: f64) -> SellPrice {
    SellPrice {
        store_id: "CA_1".into(),
        item_id: item.into(),
        wm_yr_wk: 11101,
        sell_price: price,
    }
}

/// Two items at one store, six days, horizon 2: the reference window is
/// d_3..d_4. Window revenue: item 001 = 10 * 2.0 = 20, item 002 = 10 * 3.0
/// = 30, so the shares are 0.4 and 0.6.
fn make_sales() -> SeriesTable {
    SeriesTable::new(
        vec![make_id("FOODS_1_001"), make_id("FOODS_1_002")],
        (1..=6).map(|i| format!("d_{i}")).collect(),
        vec![
            vec![100.0, 1.0, 5.0, 5.0, 50.0, 1.0],
            vec![0.0, 0.0, 5.0, 5.0, 0.0, 0.0],
        ],
    )
    .unwrap()
}

fn make_prices() -> Vec<SellPrice> {
    vec![make_price("FOODS_1_001", 2.0), make_price("FOODS_1_002", 3.0)]
}

fn level_sum(weights: &[SeriesValue], level: u8) -> f64 {
    weights
        .iter()
        .filter(|w| w.level == level)
        .map(|w| w.value)
        .sum()
}

#[test]
fn test_weight_sums() {
    let weights = build_weights(&make_sales(), &make_calendar(6), &make_prices(), 2).unwrap();

    let total: f64 = weights.iter().map(|w| w.value).sum();
    assert!((total - 1.0).abs() < 1e-9, "total weight = {total}");
    for level in 1..=12u8 {
        let sum = level_sum(&weights, level);
        assert!(
            (sum - 1.0 / 12.0).abs() < 1e-9,
            "level {level} weight sum = {sum}"
        );
    }
}

#[test]
fn test_bottom_level_revenue_shares() {
    let weights = build_weights(&make_sales(), &make_calendar(6), &make_prices(), 2).unwrap();

    let bottom: Vec<&SeriesValue> = weights.iter().filter(|w| w.level == 12).collect();
    assert_eq!(bottom.len(), 2);
    assert_eq!(bottom[0].key, vec!["FOODS_1_001_CA_1".to_string()]);
    assert!((bottom[0].value - 0.4 / 12.0).abs() < 1e-12);
    assert_eq!(bottom[1].key, vec!["FOODS_1_002_CA_1".to_string()]);
    assert!((bottom[1].value - 0.6 / 12.0).abs() < 1e-12);
}

#[test]
fn test_sales_outside_window_are_ignored() {
    let mut sales = make_sales();
    // Perturb days outside the d_3..d_4 window, including the horizon.
    sales.values[0][0] = 9999.0;
    sales.values[0][4] = 9999.0;
    sales.values[1][5] = 9999.0;

    let base = build_weights(&make_sales(), &make_calendar(6), &make_prices(), 2).unwrap();
    let perturbed = build_weights(&sales, &make_calendar(6), &make_prices(), 2).unwrap();
    assert_eq!(base, perturbed);
}

#[test]
fn test_unpriced_series_gets_zero_weight() {
    let prices = vec![make_price("FOODS_1_001", 2.0)];
    let weights = build_weights(&make_sales(), &make_calendar(6), &prices, 2).unwrap();

    let bottom: Vec<&SeriesValue> = weights.iter().filter(|w| w.level == 12).collect();
    assert!((bottom[0].value - 1.0 / 12.0).abs() < 1e-12);
    assert_eq!(bottom[1].value, 0.0);

    // The remaining series absorbs the full share; the invariants hold.
    let total: f64 = weights.iter().map(|w| w.value).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!((level_sum(&weights, 10) - 1.0 / 12.0).abs() < 1e-9);
}

#[test]
fn test_calendar_gap_in_window_fails() {
    let mut calendar = make_calendar(6);
    calendar.retain(|c| c.d != "d_3");
    let err = build_weights(&make_sales(), &calendar, &make_prices(), 2).unwrap_err();
    assert!(matches!(err, WrmsseError::DataUnavailable(_)));
}

#[test]
fn test_too_few_days_fails() {
    let sales = make_sales().day_range(0..3).unwrap();
    let err = build_weights(&sales, &make_calendar(6), &make_prices(), 2).unwrap_err();
    assert!(matches!(err, WrmsseError::DataUnavailable(_)));
}

#[test]
fn test_zero_total_revenue_fails() {
    let err = build_weights(&make_sales(), &make_calendar(6), &[], 2).unwrap_err();
    assert!(matches!(err, WrmsseError::DataUnavailable(_)));
}
