//! Synthetic hierarchy fixtures and score reporting, for tests and
//! benchmarks.

pub mod data_generator;
pub mod reporter;

pub use data_generator::{generate, FixtureSpec, HierarchyFixture};
pub use reporter::print_score_report;
