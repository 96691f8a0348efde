use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// One or more pillars do not resolve to a pair in the sexagenary cycle.
    #[error("Invalid chart: {}", .slots.join("; "))]
    InvalidChart { slots: Vec<String> },

    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfiguration(Vec<String>),
}
