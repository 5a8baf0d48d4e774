//! zbib-ranker: Applicant fit/competency scoring and field benchmark ranking.

pub mod weights;
pub mod normalise;
pub mod scorer;
pub mod assessment;
pub mod influence;
pub mod benchmark;

pub use weights::ScoreWeights;
pub use scorer::{ApplicantRawStats, ScoreCard, ScoreEngine, ScoringParams, SubScores};
pub use assessment::{Quadrant, SubMetric, Weakness, WeaknessThresholds};
pub use influence::{influence_index, PaperImpact};
pub use benchmark::{metrics, FieldBenchmark};
