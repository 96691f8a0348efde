//! Element scoring for Four Pillars charts.
//!
//! A chart's four stem/branch pairs are resolved against the sexagenary
//! cycle, matched against a configurable library of combination rules and
//! turned into a per-element score.

pub mod chart;
pub mod config;
pub mod cycle;
pub mod error;
pub mod output;
pub mod scoring;

pub use error::ScoreError;
