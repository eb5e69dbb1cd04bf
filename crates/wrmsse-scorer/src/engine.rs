use std::collections::BTreeMap;

use tracing::{info, warn};
use wrmsse_aggregate::aggregate;
use wrmsse_core::{
    rmsse, AggregatedTable, ForecastMatrix, Result, SeriesId, SeriesTable, SeriesValue,
    WrmsseError, LEVELS,
};
use wrmsse_store::FsArtifactStore;

type RowKey = (u8, Vec<String>);

fn describe(level: u8, key: &[String]) -> String {
    if key.is_empty() {
        format!("level {level} total")
    } else {
        format!("level {level} [{}]", key.join("/"))
    }
}

/// The four persisted artifacts the engine scores against.
#[derive(Debug, Clone)]
pub struct ScoreArtifacts {
    pub ids: Vec<SeriesId>,
    pub actuals: AggregatedTable,
    pub scales: Vec<SeriesValue>,
    pub weights: Vec<SeriesValue>,
}

impl ScoreArtifacts {
    /// Load all four artifacts from a store.
    pub fn load(store: &FsArtifactStore) -> Result<Self> {
        Ok(Self {
            ids: store.load(wrmsse_store::SALES_IDS)?,
            actuals: store.load(wrmsse_store::TEST_AGG)?,
            scales: store.load(wrmsse_store::TRAIN_MSE)?,
            weights: store.load(wrmsse_store::WEIGHTS)?,
        })
    }
}

/// Weighted contribution of one aggregation level to the total score.
#[derive(Debug, Clone)]
pub struct LevelContribution {
    pub level: u8,
    pub name: &'static str,
    pub series: usize,
    pub weighted_rmsse: f64,
}

/// A score together with its per-level decomposition.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub levels: Vec<LevelContribution>,
    /// Series excluded from the sum because their error scale is zero.
    pub degenerate_series: usize,
}

/// Read-only scoring engine. All lookups are keyed by (level, group key),
/// never by row position, so a misaligned artifact fails loudly instead
/// of silently scoring the wrong series. Safe to share across threads.
pub struct ScoreEngine {
    ids: Vec<SeriesId>,
    days: Vec<String>,
    horizon: usize,
    actuals: BTreeMap<RowKey, Vec<f64>>,
    scales: BTreeMap<RowKey, f64>,
    weights: BTreeMap<RowKey, f64>,
}

impl ScoreEngine {
    /// Build an engine from explicit artifacts, validating their mutual
    /// consistency up front.
    pub fn new(artifacts: ScoreArtifacts) -> Result<Self> {
        let ScoreArtifacts {
            ids,
            actuals,
            scales,
            weights,
        } = artifacts;

        if ids.is_empty() {
            return Err(WrmsseError::Alignment(
                "series identifier artifact is empty".into(),
            ));
        }
        let AggregatedTable { days, rows } = actuals;
        if days.is_empty() {
            return Err(WrmsseError::Alignment(
                "aggregated actuals carry no day columns".into(),
            ));
        }
        let horizon = days.len();

        let mut actual_map: BTreeMap<RowKey, Vec<f64>> = BTreeMap::new();
        for row in rows {
            if row.values.len() != horizon {
                return Err(WrmsseError::Alignment(format!(
                    "{} has {} days of actuals, expected {horizon}",
                    describe(row.level, &row.key),
                    row.values.len()
                )));
            }
            let key = (row.level, row.key);
            if actual_map.contains_key(&key) {
                return Err(WrmsseError::Alignment(format!(
                    "duplicate actuals for {}",
                    describe(key.0, &key.1)
                )));
            }
            actual_map.insert(key, row.values);
        }

        let scale_map = keyed_map(scales, "error scale")?;
        let weight_map = keyed_map(weights, "weight")?;

        for (key, value) in &scale_map {
            if !value.is_finite() || *value < 0.0 {
                return Err(WrmsseError::Alignment(format!(
                    "invalid error scale {value} for {}",
                    describe(key.0, &key.1)
                )));
            }
        }
        for (key, value) in &weight_map {
            if !value.is_finite() || *value < 0.0 {
                return Err(WrmsseError::Alignment(format!(
                    "invalid weight {value} for {}",
                    describe(key.0, &key.1)
                )));
            }
        }

        let bottom_rows = actual_map.keys().filter(|k| k.0 == 12).count();
        if bottom_rows != ids.len() {
            return Err(WrmsseError::Alignment(format!(
                "{} bottom-level actuals but {} series identifiers",
                bottom_rows,
                ids.len()
            )));
        }

        for (name, map) in [("error scale", &scale_map), ("weight", &weight_map)] {
            if map.len() != actual_map.len() {
                return Err(WrmsseError::Alignment(format!(
                    "{} series in actuals but {} {name} entries",
                    actual_map.len(),
                    map.len()
                )));
            }
            if let Some(key) = actual_map.keys().find(|k| !map.contains_key(*k)) {
                return Err(WrmsseError::Alignment(format!(
                    "no {name} for {}",
                    describe(key.0, &key.1)
                )));
            }
        }

        info!(
            series = actual_map.len(),
            bottom = ids.len(),
            horizon,
            "score engine ready"
        );
        Ok(Self {
            ids,
            days,
            horizon,
            actuals: actual_map,
            scales: scale_map,
            weights: weight_map,
        })
    }

    /// Load the artifacts from a store and build the engine.
    pub fn from_store(store: &FsArtifactStore) -> Result<Self> {
        Self::new(ScoreArtifacts::load(store)?)
    }

    /// Number of bottom-level series a forecast must cover.
    pub fn bottom_series(&self) -> usize {
        self.ids.len()
    }

    /// Evaluation horizon in days.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// WRMSSE of a `bottom_series x horizon` forecast.
    pub fn score(&self, forecast: &ForecastMatrix) -> Result<f64> {
        Ok(self.score_breakdown(forecast)?.score)
    }

    /// Score a forecast and return the per-level decomposition with it.
    pub fn score_breakdown(&self, forecast: &ForecastMatrix) -> Result<ScoreBreakdown> {
        self.validate_shape(forecast)?;

        let table = SeriesTable {
            ids: self.ids.clone(),
            days: self.days.clone(),
            values: (0..forecast.rows())
                .map(|i| forecast.row(i).to_vec())
                .collect(),
        };
        let forecast_agg = aggregate(&table)?;
        if forecast_agg.rows.len() != self.actuals.len() {
            return Err(WrmsseError::Alignment(format!(
                "forecast aggregates to {} series but the artifacts describe {}",
                forecast_agg.rows.len(),
                self.actuals.len()
            )));
        }

        let mut levels: Vec<LevelContribution> = LEVELS
            .iter()
            .map(|l| LevelContribution {
                level: l.number,
                name: l.name,
                series: 0,
                weighted_rmsse: 0.0,
            })
            .collect();

        let mut score = 0.0;
        let mut degenerate = 0usize;
        for row in &forecast_agg.rows {
            let key = (row.level, row.key.clone());
            let actual = self.actuals.get(&key).ok_or_else(|| {
                WrmsseError::Alignment(format!(
                    "forecast aggregate produced unknown series {}",
                    describe(key.0, &key.1)
                ))
            })?;
            let scale = *self.scales.get(&key).ok_or_else(|| {
                WrmsseError::Alignment(format!("no error scale for {}", describe(key.0, &key.1)))
            })?;
            let weight = *self.weights.get(&key).ok_or_else(|| {
                WrmsseError::Alignment(format!("no weight for {}", describe(key.0, &key.1)))
            })?;

            let entry = &mut levels[(row.level - 1) as usize];
            entry.series += 1;

            if scale == 0.0 {
                degenerate += 1;
                continue;
            }
            let contribution = weight * rmsse(actual, &row.values, scale);
            score += contribution;
            entry.weighted_rmsse += contribution;
        }

        if degenerate > 0 {
            warn!(
                series = degenerate,
                "excluded series with zero error scale from the weighted sum"
            );
        }

        Ok(ScoreBreakdown {
            score,
            levels,
            degenerate_series: degenerate,
        })
    }

    fn validate_shape(&self, forecast: &ForecastMatrix) -> Result<()> {
        if forecast.rows() != self.ids.len() {
            return Err(WrmsseError::InputShape(format!(
                "forecast must have {} rows, got {}",
                self.ids.len(),
                forecast.rows()
            )));
        }
        if forecast.cols() != self.horizon {
            return Err(WrmsseError::InputShape(format!(
                "forecast must have {} day columns, got {}",
                self.horizon,
                forecast.cols()
            )));
        }
        if let Some(pos) = forecast.as_slice().iter().position(|v| !v.is_finite()) {
            return Err(WrmsseError::InputShape(format!(
                "non-finite forecast value at row {}, column {}",
                pos / forecast.cols(),
                pos % forecast.cols()
            )));
        }
        Ok(())
    }
}

fn keyed_map(values: Vec<SeriesValue>, what: &str) -> Result<BTreeMap<RowKey, f64>> {
    let mut map = BTreeMap::new();
    for entry in values {
        let key = (entry.level, entry.key);
        if map.contains_key(&key) {
            return Err(WrmsseError::Alignment(format!(
                "duplicate {what} entry for {}",
                describe(key.0, &key.1)
            )));
        }
        map.insert(key, entry.value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests;
