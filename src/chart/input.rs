use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Raw labels for one pillar, before resolution against the cycle.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PillarInput {
    pub stem: String,
    pub branch: String,
}

impl PillarInput {
    pub fn new(stem: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            branch: branch.into(),
        }
    }

    /// Parse the "stem:branch" shorthand used on the command line, e.g. "gui:you".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((stem, branch)) if !stem.trim().is_empty() && !branch.trim().is_empty() => {
                Ok(Self::new(stem.trim(), branch.trim()))
            }
            _ => bail!("expected 'stem:branch', got '{}'", s),
        }
    }
}

/// Four-pillar chart as supplied by the caller.
///
/// Example YAML:
/// ```yaml
/// year:  { stem: gui, branch: you }
/// month: { stem: jia, branch: chen }
/// day:   { stem: jia, branch: yin }
/// hour:  { stem: ding, branch: mao }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChartInput {
    pub year: PillarInput,
    pub month: PillarInput,
    pub day: PillarInput,
    pub hour: PillarInput,
}

impl ChartInput {
    /// Load a chart from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read chart file at {}", path.display()))?;
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse chart: invalid YAML in {}", path.display()))
    }
}
