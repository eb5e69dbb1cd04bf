use serde::{Deserialize, Serialize};

/// Bottom-level series count in the reference M5 dataset.
pub const M5_BOTTOM_SERIES: usize = 30490;

/// Total series after the 12-level roll-up of the reference M5 dataset.
pub const M5_AGGREGATE_SERIES: usize = 42840;

/// Evaluation horizon of the M5 benchmark, in days.
pub const M5_HORIZON: usize = 28;

/// Identifier fields of a bottom-level series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdField {
    Id,
    Item,
    Dept,
    Cat,
    Store,
    State,
}

/// One of the 12 aggregation levels: a name and the identifier fields to
/// group by. `None` groups everything into a single grand-total row.
#[derive(Debug, Clone, Copy)]
pub struct AggregationLevel {
    pub number: u8,
    pub name: &'static str,
    pub keys: Option<&'static [IdField]>,
}

/// The 12 levels of the M5 hierarchy, in roll-up order.
///
/// This table is the single source of truth for both the offline artifact
/// pipeline and the online scorer. The two paths must group identically or
/// the persisted artifacts no longer describe the forecast aggregate.
pub const LEVELS: [AggregationLevel; 12] = [
    AggregationLevel {
        number: 1,
        name: "total",
        keys: None,
    },
    AggregationLevel {
        number: 2,
        name: "state",
        keys: Some(&[IdField::State]),
    },
    AggregationLevel {
        number: 3,
        name: "store",
        keys: Some(&[IdField::Store]),
    },
    AggregationLevel {
        number: 4,
        name: "category",
        keys: Some(&[IdField::Cat]),
    },
    AggregationLevel {
        number: 5,
        name: "department",
        keys: Some(&[IdField::Dept]),
    },
    AggregationLevel {
        number: 6,
        name: "state_category",
        keys: Some(&[IdField::State, IdField::Cat]),
    },
    AggregationLevel {
        number: 7,
        name: "state_department",
        keys: Some(&[IdField::State, IdField::Dept]),
    },
    AggregationLevel {
        number: 8,
        name: "store_category",
        keys: Some(&[IdField::Store, IdField::Cat]),
    },
    AggregationLevel {
        number: 9,
        name: "store_department",
        keys: Some(&[IdField::Store, IdField::Dept]),
    },
    AggregationLevel {
        number: 10,
        name: "item",
        keys: Some(&[IdField::Item]),
    },
    AggregationLevel {
        number: 11,
        name: "item_state",
        keys: Some(&[IdField::Item, IdField::State]),
    },
    AggregationLevel {
        number: 12,
        name: "series",
        keys: Some(&[IdField::Id]),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_numbers_are_sequential() {
        for (i, level) in LEVELS.iter().enumerate() {
            assert_eq!(level.number as usize, i + 1);
        }
    }

    #[test]
    fn test_only_first_level_is_total() {
        assert!(LEVELS[0].keys.is_none());
        for level in &LEVELS[1..] {
            assert!(level.keys.is_some(), "level {} has no keys", level.number);
        }
    }

    #[test]
    fn test_bottom_level_groups_by_id() {
        assert_eq!(LEVELS[11].keys, Some(&[IdField::Id][..]));
    }
}
