//! Online WRMSSE scoring engine: combines a caller-supplied forecast with
//! the persisted artifacts into a single scalar score.

mod engine;

pub use engine::{LevelContribution, ScoreArtifacts, ScoreBreakdown, ScoreEngine};
