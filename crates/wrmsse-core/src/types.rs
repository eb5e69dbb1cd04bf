use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{Result, WrmsseError};
use crate::hierarchy::IdField;

/// Identifier tuple of one bottom-level item/store series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesId {
    pub id: String,
    pub item_id: String,
    pub dept_id: String,
    pub cat_id: String,
    pub store_id: String,
    pub state_id: String,
}

impl SeriesId {
    /// Value of one identifier field.
    pub fn field(&self, field: IdField) -> &str {
        match field {
            IdField::Id => &self.id,
            IdField::Item => &self.item_id,
            IdField::Dept => &self.dept_id,
            IdField::Cat => &self.cat_id,
            IdField::Store => &self.store_id,
            IdField::State => &self.state_id,
        }
    }
}

/// A table of identified daily series: one row per bottom-level series,
/// one numeric column per day. Row order is the dataset's original order
/// and is never sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    pub ids: Vec<SeriesId>,
    /// Day column labels (`d_1`, `d_2`, ...).
    pub days: Vec<String>,
    /// Row-major daily values; `values[i]` belongs to `ids[i]`.
    pub values: Vec<Vec<f64>>,
}

impl SeriesTable {
    /// Build a table, rejecting malformed input up front.
    pub fn new(ids: Vec<SeriesId>, days: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self> {
        let table = Self { ids, days, values };
        table.validate()?;
        Ok(table)
    }

    /// Check the table invariants: non-empty, id/value row counts match,
    /// every value row as wide as the day header.
    pub fn validate(&self) -> Result<()> {
        if self.ids.is_empty() {
            return Err(WrmsseError::Schema("table has no rows".into()));
        }
        if self.days.is_empty() {
            return Err(WrmsseError::Schema("table has no day columns".into()));
        }
        if self.ids.len() != self.values.len() {
            return Err(WrmsseError::Schema(format!(
                "{} identifier rows but {} value rows",
                self.ids.len(),
                self.values.len()
            )));
        }
        for (i, row) in self.values.iter().enumerate() {
            if row.len() != self.days.len() {
                return Err(WrmsseError::Schema(format!(
                    "row {i} has {} day columns, expected {}",
                    row.len(),
                    self.days.len()
                )));
            }
        }
        Ok(())
    }

    /// Sub-table over a contiguous range of day columns.
    pub fn day_range(&self, range: Range<usize>) -> Result<SeriesTable> {
        if range.start > range.end || range.end > self.days.len() {
            return Err(WrmsseError::Schema(format!(
                "day range {}..{} out of bounds for {} columns",
                range.start,
                range.end,
                self.days.len()
            )));
        }
        let mut values = Vec::with_capacity(self.values.len());
        for (i, row) in self.values.iter().enumerate() {
            let slice = row.get(range.clone()).ok_or_else(|| {
                WrmsseError::Schema(format!(
                    "row {i} has {} day columns, expected {}",
                    row.len(),
                    self.days.len()
                ))
            })?;
            values.push(slice.to_vec());
        }
        Ok(SeriesTable {
            ids: self.ids.clone(),
            days: self.days[range].to_vec(),
            values,
        })
    }
}

/// One calendar row: day label, date and price week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub d: String,
    pub date: NaiveDate,
    pub wm_yr_wk: u32,
}

/// Weekly unit price of an item at a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellPrice {
    pub store_id: String,
    pub item_id: String,
    pub wm_yr_wk: u32,
    pub sell_price: f64,
}

/// One aggregated series. The level and group key travel with the values
/// so every downstream combination joins by key instead of trusting
/// positional order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub level: u8,
    /// Values of the level's grouping fields; empty for the grand total.
    pub key: Vec<String>,
    pub values: Vec<f64>,
}

/// Concatenation of the 12 levels' group sums, level order 1 -> 12,
/// ascending key order within a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTable {
    pub days: Vec<String>,
    pub rows: Vec<AggregateRow>,
}

/// A per-series scalar (a revenue weight or an error scale), keyed like
/// an `AggregateRow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesValue {
    pub level: u8,
    pub key: Vec<String>,
    pub value: f64,
}

/// Dense row-major forecast matrix handed to the scorer. Transient input,
/// owned by the caller for the duration of one scoring call.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ForecastMatrix {
    /// Wrap a flat row-major buffer.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(WrmsseError::InputShape(
                "forecast must have at least one row and one column".into(),
            ));
        }
        if data.len() != rows * cols {
            return Err(WrmsseError::InputShape(format!(
                "expected {} values for a {rows}x{cols} forecast, got {}",
                rows * cols,
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows; every row must have the same width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let count = rows.len();
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(WrmsseError::InputShape(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
        }
        Self::new(count, cols, rows.into_iter().flatten().collect())
    }

    /// Matrix with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self> {
        Self::new(rows, cols, vec![value; rows * cols])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
