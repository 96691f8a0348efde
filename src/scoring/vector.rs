use serde::Serialize;
use std::collections::BTreeMap;

use crate::cycle::Element;

/// Accumulated score per element. All five elements are always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreVector {
    scores: BTreeMap<Element, f64>,
}

impl Default for ScoreVector {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreVector {
    pub fn new() -> Self {
        Self {
            scores: Element::ALL.iter().map(|&e| (e, 0.0)).collect(),
        }
    }

    pub fn get(&self, element: Element) -> f64 {
        self.scores.get(&element).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, element: Element, points: f64) {
        *self.scores.entry(element).or_insert(0.0) += points;
    }

    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }

    /// Elements in wood, fire, earth, metal, water order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        self.scores.iter().map(|(&e, &v)| (e, v))
    }
}
