use super::*;
use wrmsse_offline::build_scales;

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

/// Two series over ten days; the final two days are the horizon.
fn make_sales() -> SeriesTable {
    SeriesTable::new(
        vec![make_id("FOODS_1_001"), make_id("FOODS_1_002")],
        (1..=10).map(|i| format!("d_{i}")).collect(),
        vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            vec![2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0, 5.0, 6.0, 6.0],
        ],
    )
    .unwrap()
}

/// Equal weight for every series of a level; each level sums to 1/12.
fn uniform_weights(actuals: &AggregatedTable) -> Vec<SeriesValue> {
    let mut counts = [0usize; 12];
    for row in &actuals.rows {
        counts[(row.level - 1) as usize] += 1;
    }
    actuals
        .rows
        .iter()
        .map(|row| SeriesValue {
            level: row.level,
            key: row.key.clone(),
            value: 1.0 / (12.0 * counts[(row.level - 1) as usize] as f64),
        })
        .collect()
}

fn make_artifacts_for(sales: &SeriesTable) -> ScoreArtifacts {
    let n = sales.days.len();
    let eval = sales.day_range(n - 2..n).unwrap();
    let actuals = aggregate(&eval).unwrap();
    let train = sales.day_range(0..n - 2).unwrap();
    let scales = build_scales(&train).unwrap();
    let weights = uniform_weights(&actuals);
    ScoreArtifacts {
        ids: sales.ids.clone(),
        actuals,
        scales,
        weights,
    }
}

fn exact_forecast(sales: &SeriesTable) -> ForecastMatrix {
    let n = sales.days.len();
    let eval = sales.day_range(n - 2..n).unwrap();
    ForecastMatrix::from_rows(eval.values).unwrap()
}

#[test]
fn test_exact_forecast_scores_zero() {
    let sales = make_sales();
    let engine = ScoreEngine::new(make_artifacts_for(&sales)).unwrap();
    let score = engine.score(&exact_forecast(&sales)).unwrap();
    assert_eq!(score, 0.0);
}

#[test]
fn test_score_is_idempotent() {
    let sales = make_sales();
    let engine = ScoreEngine::new(make_artifacts_for(&sales)).unwrap();
    let forecast = ForecastMatrix::filled(2, 2, 3.0).unwrap();
    let first = engine.score(&forecast).unwrap();
    let second = engine.score(&forecast).unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn test_wrong_shape_is_rejected() {
    let sales = make_sales();
    let engine = ScoreEngine::new(make_artifacts_for(&sales)).unwrap();

    let wrong_rows = ForecastMatrix::filled(1, 2, 0.0).unwrap();
    assert!(matches!(
        engine.score(&wrong_rows),
        Err(WrmsseError::InputShape(_))
    ));

    let wrong_cols = ForecastMatrix::filled(2, 3, 0.0).unwrap();
    assert!(matches!(
        engine.score(&wrong_cols),
        Err(WrmsseError::InputShape(_))
    ));

    let non_finite = ForecastMatrix::from_rows(vec![vec![1.0, f64::NAN], vec![1.0, 1.0]]).unwrap();
    assert!(matches!(
        engine.score(&non_finite),
        Err(WrmsseError::InputShape(_))
    ));
}

#[test]
fn test_perturbed_forecast_scores_worse() {
    let sales = make_sales();
    let engine = ScoreEngine::new(make_artifacts_for(&sales)).unwrap();

    let exact = exact_forecast(&sales);
    let exact_score = engine.score(&exact).unwrap();

    let mut rows: Vec<Vec<f64>> = (0..exact.rows()).map(|i| exact.row(i).to_vec()).collect();
    rows[0][1] += 2.5;
    let perturbed = ForecastMatrix::from_rows(rows).unwrap();
    let perturbed_score = engine.score(&perturbed).unwrap();

    assert!(perturbed_score > exact_score);
}

#[test]
fn test_breakdown_levels_sum_to_score() {
    let sales = make_sales();
    let engine = ScoreEngine::new(make_artifacts_for(&sales)).unwrap();
    let forecast = ForecastMatrix::filled(2, 2, 0.0).unwrap();
    let breakdown = engine.score_breakdown(&forecast).unwrap();

    let level_sum: f64 = breakdown.levels.iter().map(|l| l.weighted_rmsse).sum();
    assert!((breakdown.score - level_sum).abs() < 1e-12);
    assert_eq!(
        breakdown.levels.iter().map(|l| l.series).sum::<usize>(),
        engine.actuals.len()
    );
}

#[test]
fn test_zero_scale_series_are_excluded() {
    // Second series is constant through training: its bottom-level rows
    // have a degenerate scale, while aggregates that include the first
    // series stay scoreable.
    let sales = SeriesTable::new(
        vec![make_id("FOODS_1_001"), make_id("FOODS_1_002")],
        (1..=10).map(|i| format!("d_{i}")).collect(),
        vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            vec![2.0; 10],
        ],
    )
    .unwrap();
    let engine = ScoreEngine::new(make_artifacts_for(&sales)).unwrap();

    let breakdown = engine.score_breakdown(&exact_forecast(&sales)).unwrap();
    // Levels 10, 11 and 12 each carry one row made of the constant
    // series alone.
    assert_eq!(breakdown.degenerate_series, 3);
    assert!(breakdown.score.is_finite());
    assert_eq!(breakdown.score, 0.0);
}

#[test]
fn test_inconsistent_artifacts_are_rejected() {
    let sales = make_sales();

    let mut artifacts = make_artifacts_for(&sales);
    artifacts.weights.pop();
    assert!(matches!(
        ScoreEngine::new(artifacts),
        Err(WrmsseError::Alignment(_))
    ));

    let mut artifacts = make_artifacts_for(&sales);
    artifacts.scales[0].value = -1.0;
    assert!(matches!(
        ScoreEngine::new(artifacts),
        Err(WrmsseError::Alignment(_))
    ));

    let mut artifacts = make_artifacts_for(&sales);
    artifacts.actuals.rows[0].values.pop();
    assert!(matches!(
        ScoreEngine::new(artifacts),
        Err(WrmsseError::Alignment(_))
    ));
}

#[test]
fn test_missing_artifacts_fail_loading() {
    let dir = std::env::temp_dir().join(format!("wrmsse-engine-missing-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let store = FsArtifactStore::new(&dir);
    assert!(matches!(
        ScoreEngine::from_store(&store),
        Err(WrmsseError::MissingArtifact(_))
    ));
}
