use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;

use super::input::{ChartInput, PillarInput};
use crate::cycle::{LabelField, StemBranchPair, CYCLE};
use crate::error::ScoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarPosition {
    pub const ALL: [PillarPosition; 4] = [
        PillarPosition::Year,
        PillarPosition::Month,
        PillarPosition::Day,
        PillarPosition::Hour,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PillarPosition::Year => "year",
            PillarPosition::Month => "month",
            PillarPosition::Day => "day",
            PillarPosition::Hour => "hour",
        }
    }
}

impl fmt::Display for PillarPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which half of a pillar a rule term looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotType {
    Stem,
    Branch,
}

impl SlotType {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "stem" => Ok(SlotType::Stem),
            "branch" => Ok(SlotType::Branch),
            other => bail!("slot must be 'stem' or 'branch', got '{}'", other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SlotType::Stem => "stem",
            SlotType::Branch => "branch",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pillar {
    pub position: PillarPosition,
    pub pair: StemBranchPair,
    /// Set once a firing rule consumes this pillar.
    pub used: bool,
}

impl Pillar {
    pub fn new(position: PillarPosition, pair: StemBranchPair) -> Self {
        Self {
            position,
            pair,
            used: false,
        }
    }

    pub fn slot_value(&self, slot: SlotType, field: LabelField) -> &'static str {
        match slot {
            SlotType::Stem => self.pair.stem.label(field),
            SlotType::Branch => self.pair.branch.label(field),
        }
    }
}

/// Four resolved pillars in year, month, day, hour order.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pillars: [Pillar; 4],
}

impl Chart {
    /// Resolve raw labels against the cycle. Every slot is checked so the error
    /// lists all bad pillars, not only the first.
    pub fn resolve(input: &ChartInput, field: LabelField) -> Result<Self, ScoreError> {
        let raw: [&PillarInput; 4] = [&input.year, &input.month, &input.day, &input.hour];

        let mut errors = Vec::new();
        let mut pairs = Vec::with_capacity(4);
        for (position, pillar) in PillarPosition::ALL.iter().zip(raw) {
            match CYCLE.find_by_label(field, &pillar.stem, &pillar.branch) {
                Some(pair) => pairs.push(pair),
                None => errors.push(format!(
                    "{}: '{}' + '{}' is not a valid stem/branch pair",
                    position, pillar.stem, pillar.branch
                )),
            }
        }

        if !errors.is_empty() {
            return Err(ScoreError::InvalidChart { slots: errors });
        }

        Ok(Self::from_pairs([pairs[0], pairs[1], pairs[2], pairs[3]]))
    }

    /// Build a chart from pairs that are already resolved.
    pub fn from_pairs(pairs: [StemBranchPair; 4]) -> Self {
        let [year, month, day, hour] = pairs;
        Self {
            pillars: [
                Pillar::new(PillarPosition::Year, year),
                Pillar::new(PillarPosition::Month, month),
                Pillar::new(PillarPosition::Day, day),
                Pillar::new(PillarPosition::Hour, hour),
            ],
        }
    }

    pub fn pillars(&self) -> &[Pillar; 4] {
        &self.pillars
    }

    pub(crate) fn pillars_mut(&mut self) -> &mut [Pillar; 4] {
        &mut self.pillars
    }

    /// Number of pillars whose `slot` carries `label`.
    pub fn count(&self, slot: SlotType, label: &str, field: LabelField) -> usize {
        self.pillars
            .iter()
            .filter(|p| p.slot_value(slot, field) == label)
            .count()
    }
}
