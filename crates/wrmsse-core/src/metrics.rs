/// Root Mean Squared Scaled Error of one series over the horizon.
///
/// `scale` is the naive one-step-ahead squared-error scale from training
/// history (see [`naive_error_scale`]). Callers are expected to exclude
/// degenerate series (`scale == 0`) before calling; dividing by a zero
/// scale is undefined.
///
/// # Panics
/// Panics if `actual` and `forecast` have different lengths or are empty.
pub fn rmsse(actual: &[f64], forecast: &[f64], scale: f64) -> f64 {
    assert_eq!(
        actual.len(),
        forecast.len(),
        "actual and forecast must have the same length"
    );
    assert!(!actual.is_empty(), "horizon must not be empty");

    let n = actual.len() as f64;
    let mse = actual
        .iter()
        .zip(forecast)
        .map(|(a, f)| (a - f).powi(2))
        .sum::<f64>()
        / n;
    (mse / scale).sqrt()
}

/// Naive one-step-ahead squared-error scale of a training history:
/// the mean squared successive difference of the zero-trimmed values.
///
/// Leading and trailing zero spans are outside the series' life and are
/// trimmed before differencing. A trimmed history of length <= 1 has no
/// differences; it yields `0.0` rather than NaN, and the scorer excludes
/// such series from the weighted sum.
pub fn naive_error_scale(history: &[f64]) -> f64 {
    let trimmed = trim_zeros(history);
    if trimmed.len() <= 1 {
        return 0.0;
    }
    let sum: f64 = trimmed.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    sum / (trimmed.len() - 1) as f64
}

/// Strip leading and trailing exact zeros; interior zeros are kept.
pub fn trim_zeros(values: &[f64]) -> &[f64] {
    let Some(start) = values.iter().position(|v| *v != 0.0) else {
        return &[];
    };
    let end = values.iter().rposition(|v| *v != 0.0).unwrap_or(start);
    &values[start..=end]
}
