pub mod config;
pub mod engine;
pub mod factors;
pub mod footprint;
pub mod sequestration;
pub mod validation;

pub use config::*;
pub use engine::{
    assess, calculate_scores, calculate_scores_with_breakdown, Assessment, Element,
    ElementalScores, ScoreContribution, ScoreResult,
};
pub use footprint::{calculate_footprint, Footprint};
pub use sequestration::calculate_sequestration;
pub use validation::validate_scoring;
