use serde::{Deserialize, Serialize};

use crate::cycle::LabelField;

/// Main scoring configuration.
///
/// Rule sets are evaluated in order. A rule set fires when every one of its
/// terms appears somewhere in the chart; its score is multiplied by how often
/// each term's label repeats and credited to its element. Pillars left
/// untouched by every firing rule credit `remainder_value` to each element of
/// their branch.
///
/// Example YAML:
/// ```yaml
/// label_field: english
/// remainder_value: 10
/// rule_sets:
///   - name: seasonal wood
///     element: wood
///     score: 100
///     terms:
///       - { slot: branch, target: yin }
///       - { slot: branch, target: mao }
///       - { slot: branch, target: chen }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Label representation rule targets and chart input are written in (default: english)
    #[serde(default)]
    pub label_field: LabelField,

    /// Points credited per element of an unused pillar's branch (default: 10.0)
    #[serde(default = "default_remainder_value")]
    pub remainder_value: f64,

    #[serde(default)]
    pub rule_sets: Vec<RuleSet>,
}

fn default_remainder_value() -> f64 {
    10.0
}

/// A named combination of labels that awards points to one element.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    pub name: String,

    /// Target element: wood, fire, earth, metal or water
    pub element: String,

    /// Points awarded when the rule fires, before multiplicity
    pub score: f64,

    pub terms: Vec<RuleTerm>,
}

/// One label that must be present in the chart.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleTerm {
    /// "stem" or "branch"
    pub slot: String,

    /// Label compared against the pillar's slot in the configured label field
    pub target: String,
}

impl RuleTerm {
    pub fn branch(target: &str) -> Self {
        Self {
            slot: "branch".to_string(),
            target: target.to_string(),
        }
    }

    pub fn stem(target: &str) -> Self {
        Self {
            slot: "stem".to_string(),
            target: target.to_string(),
        }
    }
}

impl RuleSet {
    /// Rule set whose terms are all branch labels.
    pub fn branches(name: &str, element: &str, score: f64, targets: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            score,
            terms: targets.iter().map(|t| RuleTerm::branch(t)).collect(),
        }
    }
}

impl Default for ScoringConfig {
    /// The built-in branch combination library.
    fn default() -> Self {
        let rule_sets = vec![
            // Seasonal (directional) triads
            RuleSet::branches("seasonal wood", "wood", 100.0, &["yin", "mao", "chen"]),
            RuleSet::branches("seasonal fire", "fire", 100.0, &["si", "wu", "wei"]),
            RuleSet::branches("seasonal metal", "metal", 100.0, &["shen", "you", "xu"]),
            RuleSet::branches("seasonal water", "water", 100.0, &["hai", "zi", "chou"]),
            // Three harmonies
            RuleSet::branches("water harmony", "water", 75.0, &["shen", "zi", "chen"]),
            RuleSet::branches("wood harmony", "wood", 75.0, &["hai", "mao", "wei"]),
            RuleSet::branches("fire harmony", "fire", 75.0, &["yin", "wu", "xu"]),
            RuleSet::branches("metal harmony", "metal", 75.0, &["si", "you", "chou"]),
            RuleSet::branches("earth storehouses", "earth", 75.0, &["chen", "xu", "chou", "wei"]),
            // Half harmonies
            RuleSet::branches("water half harmony shen-zi", "water", 50.0, &["shen", "zi"]),
            RuleSet::branches("water half harmony zi-chen", "water", 50.0, &["zi", "chen"]),
            RuleSet::branches("wood half harmony hai-mao", "wood", 50.0, &["hai", "mao"]),
            RuleSet::branches("wood half harmony mao-wei", "wood", 50.0, &["mao", "wei"]),
            RuleSet::branches("fire half harmony yin-wu", "fire", 50.0, &["yin", "wu"]),
            RuleSet::branches("fire half harmony wu-xu", "fire", 50.0, &["wu", "xu"]),
            RuleSet::branches("metal half harmony si-you", "metal", 50.0, &["si", "you"]),
            RuleSet::branches("metal half harmony you-chou", "metal", 50.0, &["you", "chou"]),
            // Six combinations
            RuleSet::branches("zi-chou combination", "earth", 50.0, &["zi", "chou"]),
            RuleSet::branches("yin-hai combination", "wood", 50.0, &["yin", "hai"]),
            RuleSet::branches("mao-xu combination", "fire", 50.0, &["mao", "xu"]),
            RuleSet::branches("chen-you combination", "metal", 50.0, &["chen", "you"]),
            RuleSet::branches("si-shen combination", "water", 50.0, &["si", "shen"]),
            RuleSet::branches("wu-wei combination", "fire", 50.0, &["wu", "wei"]),
        ];

        Self {
            label_field: LabelField::English,
            remainder_value: default_remainder_value(),
            rule_sets,
        }
    }
}
