pub mod config;
pub mod engine;
pub mod validation;
pub mod vector;

pub use config::*;
pub use engine::{
    calculate_score, RemainderCredit, RuleMatch, ScoreBreakdown, ScoreResult, ScoringEngine,
};
pub use validation::validate_scoring;
pub use vector::ScoreVector;
