use std::collections::BTreeMap;

use tracing::debug;
use wrmsse_core::{AggregateRow, AggregatedTable, Result, SeriesTable, LEVELS};

/// Roll a table of identified daily series up through all 12 levels.
///
/// Output rows are the concatenation of the levels' group sums in level
/// order; within a level, groups are emitted in ascending key order. The
/// result is a pure function of the level table and the input row set:
/// shuffling input rows does not change the output.
pub fn aggregate(table: &SeriesTable) -> Result<AggregatedTable> {
    table.validate()?;

    let width = table.days.len();
    let mut rows = Vec::new();

    for level in &LEVELS {
        match level.keys {
            None => {
                let mut total = vec![0.0; width];
                for row in &table.values {
                    for (acc, v) in total.iter_mut().zip(row) {
                        *acc += v;
                    }
                }
                rows.push(AggregateRow {
                    level: level.number,
                    key: Vec::new(),
                    values: total,
                });
            }
            Some(fields) => {
                let mut groups: BTreeMap<Vec<String>, Vec<f64>> = BTreeMap::new();
                for (id, row) in table.ids.iter().zip(&table.values) {
                    let key: Vec<String> =
                        fields.iter().map(|f| id.field(*f).to_string()).collect();
                    let sums = groups.entry(key).or_insert_with(|| vec![0.0; width]);
                    for (acc, v) in sums.iter_mut().zip(row) {
                        *acc += v;
                    }
                }
                rows.extend(groups.into_iter().map(|(key, values)| AggregateRow {
                    level: level.number,
                    key,
                    values,
                }));
            }
        }
    }

    debug!(rows = rows.len(), days = width, "aggregated series table");
    Ok(AggregatedTable {
        days: table.days.clone(),
        rows,
    })
}
