//! Offline artifact pipeline: derives the weights, error scales,
//! aggregated actuals and identifier table from one dataset release.

pub mod pipeline;
pub mod scales;
pub mod weights;

pub use pipeline::{generate_artifacts, ArtifactSummary};
pub use scales::build_scales;
pub use weights::build_weights;
