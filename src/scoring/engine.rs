use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

use super::config::ScoringConfig;
use super::validation::validate_scoring;
use super::vector::ScoreVector;
use crate::chart::{Chart, ChartInput, PillarPosition, SlotType};
use crate::cycle::{Branch, Element, LabelField};
use crate::error::ScoreError;

/// A rule set that fired during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleMatch {
    pub name: String,
    pub element: Element,
    pub score: f64,
    /// Product of each term's repeat count across the four pillars
    pub multiplier: u64,
    pub points: f64,
}

/// Points credited to an unused pillar's branch elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemainderCredit {
    pub position: PillarPosition,
    pub branch: Branch,
    pub points: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub matches: Vec<RuleMatch>,
    pub remainders: Vec<RemainderCredit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub scores: ScoreVector,
    pub breakdown: ScoreBreakdown,
}

/// Rule set with its element and slots already parsed.
#[derive(Debug, Clone)]
struct CompiledRule {
    name: String,
    element: Element,
    score: f64,
    terms: Vec<(SlotType, String)>,
}

/// Scores one chart against one configuration.
///
/// `calculate` clears every pillar's `used` flag before evaluating, so an
/// engine can be evaluated any number of times with identical results.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    chart: Chart,
    label_field: LabelField,
    remainder_value: f64,
    rules: Vec<CompiledRule>,
}

/// How many pillars carry each label, per slot. Built once per evaluation.
#[derive(Debug, Default)]
struct RepeatCounts {
    counts: HashMap<SlotType, HashMap<&'static str, u64>>,
}

impl RepeatCounts {
    fn record(&mut self, slot: SlotType, label: &'static str) {
        *self.counts.entry(slot).or_default().entry(label).or_insert(0) += 1;
    }

    fn get(&self, slot: SlotType, label: &str) -> u64 {
        self.counts
            .get(&slot)
            .and_then(|labels| labels.get(label))
            .copied()
            .unwrap_or(0)
    }
}

impl ScoringEngine {
    /// Validate the configuration and resolve the chart. Fails with
    /// `InvalidConfiguration` or `InvalidChart`; no engine is built in either case.
    pub fn new(input: &ChartInput, config: &ScoringConfig) -> Result<Self, ScoreError> {
        let rules = compile_rules(config)?;
        let chart = Chart::resolve(input, config.label_field)?;
        Ok(Self::from_parts(chart, config, rules))
    }

    /// Build an engine over an already-resolved chart.
    pub fn with_chart(chart: Chart, config: &ScoringConfig) -> Result<Self, ScoreError> {
        let rules = compile_rules(config)?;
        Ok(Self::from_parts(chart, config, rules))
    }

    fn from_parts(chart: Chart, config: &ScoringConfig, rules: Vec<CompiledRule>) -> Self {
        Self {
            chart,
            label_field: config.label_field,
            remainder_value: config.remainder_value,
            rules,
        }
    }

    /// The chart, including `used` flags from the most recent evaluation.
    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn calculate(&mut self) -> ScoreVector {
        self.evaluate().scores
    }

    /// Score the chart and keep a record of which rules fired and which
    /// pillars earned remainder credit.
    pub fn evaluate(&mut self) -> ScoreResult {
        let field = self.label_field;
        for pillar in self.chart.pillars_mut() {
            pillar.used = false;
        }

        let repeats = self.repeat_counts();
        let mut scores = ScoreVector::new();
        let mut breakdown = ScoreBreakdown::default();

        for rule in &self.rules {
            let presence = is_present(rule, &repeats);
            trace!(rule = %rule.name, ?presence, "presence");
            if presence.is_empty() || !presence.values().all(|&found| found) {
                continue;
            }

            let multiplier: u64 = rule
                .terms
                .iter()
                .map(|(slot, target)| repeats.get(*slot, target))
                .product();
            let points = rule.score * multiplier as f64;
            scores.add(rule.element, points);

            for pillar in self.chart.pillars_mut() {
                if rule
                    .terms
                    .iter()
                    .any(|(slot, target)| pillar.slot_value(*slot, field) == target)
                {
                    pillar.used = true;
                }
            }

            debug!(
                rule = %rule.name,
                element = %rule.element,
                multiplier,
                points,
                "rule fired"
            );
            breakdown.matches.push(RuleMatch {
                name: rule.name.clone(),
                element: rule.element,
                score: rule.score,
                multiplier,
                points,
            });
        }

        for pillar in self.chart.pillars().iter().filter(|p| !p.used) {
            let branch = pillar.pair.branch;
            for &element in branch.elements() {
                scores.add(element, self.remainder_value);
            }

            debug!(
                pillar = %pillar.position,
                branch = branch.label(field),
                points = self.remainder_value,
                "remainder credited"
            );
            breakdown.remainders.push(RemainderCredit {
                position: pillar.position,
                branch,
                points: self.remainder_value,
            });
        }

        ScoreResult { scores, breakdown }
    }

    fn repeat_counts(&self) -> RepeatCounts {
        let mut counts = RepeatCounts::default();
        for pillar in self.chart.pillars() {
            for slot in [SlotType::Stem, SlotType::Branch] {
                counts.record(slot, pillar.slot_value(slot, self.label_field));
            }
        }
        counts
    }
}

/// Presence of each term in the chart, keyed "slot:label".
fn is_present(rule: &CompiledRule, repeats: &RepeatCounts) -> BTreeMap<String, bool> {
    rule.terms
        .iter()
        .map(|(slot, target)| {
            let found = repeats.get(*slot, target) > 0;
            (format!("{}:{}", slot.name(), target), found)
        })
        .collect()
}

fn compile_rules(config: &ScoringConfig) -> Result<Vec<CompiledRule>, ScoreError> {
    validate_scoring(config).map_err(ScoreError::InvalidConfiguration)?;

    let mut rules = Vec::with_capacity(config.rule_sets.len());
    for rule in &config.rule_sets {
        let element = Element::parse(&rule.element)
            .map_err(|e| ScoreError::InvalidConfiguration(vec![e.to_string()]))?;
        let terms = rule
            .terms
            .iter()
            .map(|t| {
                SlotType::parse(&t.slot)
                    .map(|slot| (slot, t.target.clone()))
                    .map_err(|e| ScoreError::InvalidConfiguration(vec![e.to_string()]))
            })
            .collect::<Result<Vec<_>, _>>()?;

        rules.push(CompiledRule {
            name: rule.name.clone(),
            element,
            score: rule.score,
            terms,
        });
    }
    Ok(rules)
}

/// Score a chart in one call.
pub fn calculate_score(input: &ChartInput, config: &ScoringConfig) -> Result<ScoreResult, ScoreError> {
    Ok(ScoringEngine::new(input, config)?.evaluate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PillarInput;
    use crate::cycle::{Stem, CYCLE};
    use crate::scoring::{RuleSet, RuleTerm};

    fn sample_chart() -> ChartInput {
        ChartInput {
            year: PillarInput::new("gui", "you"),
            month: PillarInput::new("jia", "chen"),
            day: PillarInput::new("jia", "yin"),
            hour: PillarInput::new("ding", "mao"),
        }
    }

    fn wood_rule() -> RuleSet {
        RuleSet::branches("test name, wood 100", "wood", 100.0, &["yin", "chen", "mao"])
    }

    fn metal_rule() -> RuleSet {
        RuleSet::branches("chen-you metal", "metal", 50.0, &["chen", "you"])
    }

    /// Rules that do not fire on the sample chart.
    fn idle_rules() -> Vec<RuleSet> {
        vec![
            RuleSet::branches("fire triad", "fire", 100.0, &["si", "wu", "wei"]),
            RuleSet::branches("water triad", "water", 100.0, &["hai", "zi", "chou"]),
            RuleSet::branches("metal triad", "metal", 100.0, &["shen", "you", "xu"]),
            RuleSet::branches("earth storehouses", "earth", 75.0, &["chen", "xu", "chou", "wei"]),
        ]
    }

    fn config(rule_sets: Vec<RuleSet>) -> ScoringConfig {
        ScoringConfig {
            label_field: LabelField::English,
            remainder_value: 10.0,
            rule_sets,
        }
    }

    fn assert_scores(scores: &ScoreVector, expected: [f64; 5]) {
        for (element, want) in Element::ALL.iter().zip(expected) {
            assert_eq!(scores.get(*element), want, "{}", element);
        }
    }

    fn pair(stem: Stem, branch: Branch) -> crate::cycle::StemBranchPair {
        CYCLE.find(stem, branch).unwrap()
    }

    #[test]
    fn test_both_rules_fire_and_consume_every_pillar() {
        let mut rules = vec![wood_rule(), metal_rule()];
        rules.extend(idle_rules());
        let mut engine = ScoringEngine::new(&sample_chart(), &config(rules)).unwrap();

        let scores = engine.calculate();
        // wood, fire, earth, metal, water
        assert_scores(&scores, [100.0, 0.0, 0.0, 50.0, 0.0]);
        assert!(engine.chart().pillars().iter().all(|p| p.used));
    }

    #[test]
    fn test_unused_pillar_earns_remainder() {
        let mut rules = vec![wood_rule()];
        rules.extend(idle_rules());
        let mut engine = ScoringEngine::new(&sample_chart(), &config(rules)).unwrap();

        let result = engine.evaluate();
        assert_scores(&result.scores, [100.0, 0.0, 0.0, 10.0, 0.0]);

        assert_eq!(result.breakdown.matches.len(), 1);
        assert_eq!(result.breakdown.remainders.len(), 1);
        assert_eq!(result.breakdown.remainders[0].position, PillarPosition::Year);
        assert_eq!(result.breakdown.remainders[0].branch, Branch::You);
        assert!(!engine.chart().pillars()[0].used);
    }

    #[test]
    fn test_no_rules_credits_every_branch_element() {
        let mut engine = ScoringEngine::new(&sample_chart(), &config(vec![])).unwrap();
        let scores = engine.calculate();

        // you [metal], chen [earth, wood, water], yin [wood, fire, earth], mao [wood]
        assert_scores(&scores, [30.0, 10.0, 20.0, 10.0, 10.0]);
        assert!(engine.chart().pillars().iter().all(|p| !p.used));
    }

    #[test]
    fn test_default_library_on_sample_chart() {
        let result = calculate_score(&sample_chart(), &ScoringConfig::default()).unwrap();
        assert_scores(&result.scores, [100.0, 0.0, 0.0, 50.0, 0.0]);

        let fired: Vec<_> = result.breakdown.matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(fired, vec!["seasonal wood", "chen-you combination"]);
    }

    #[test]
    fn test_multiplier_is_product_of_repeats() {
        // yin twice and wu twice: 2 * 2 = 4
        let chart = Chart::from_pairs([
            pair(Stem::Jia, Branch::Yin),
            pair(Stem::Bing, Branch::Yin),
            pair(Stem::Jia, Branch::Wu),
            pair(Stem::Geng, Branch::Wu),
        ]);
        let rules = vec![RuleSet::branches("yin-wu", "fire", 50.0, &["yin", "wu"])];
        let mut engine = ScoringEngine::with_chart(chart, &config(rules)).unwrap();

        let result = engine.evaluate();
        assert_eq!(result.breakdown.matches[0].multiplier, 4);
        assert_scores(&result.scores, [0.0, 200.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_multiplier_with_single_repeat() {
        // chen twice, you once: 2 * 1 = 2 (a sum would give 3)
        let chart = Chart::from_pairs([
            pair(Stem::Gui, Branch::You),
            pair(Stem::Jia, Branch::Chen),
            pair(Stem::Jia, Branch::Chen),
            pair(Stem::Ding, Branch::Mao),
        ]);
        let mut engine =
            ScoringEngine::with_chart(chart, &config(vec![metal_rule()])).unwrap();

        let scores = engine.calculate();
        // metal: 50 * 2; mao pillar unused -> wood +10
        assert_scores(&scores, [10.0, 0.0, 0.0, 100.0, 0.0]);
    }

    #[test]
    fn test_stem_terms() {
        let rules = vec![RuleSet {
            name: "jia-gui".to_string(),
            element: "water".to_string(),
            score: 20.0,
            terms: vec![RuleTerm::stem("jia"), RuleTerm::stem("gui")],
        }];
        let mut engine = ScoringEngine::new(&sample_chart(), &config(rules)).unwrap();
        let result = engine.evaluate();

        // jia appears twice
        assert_eq!(result.breakdown.matches[0].multiplier, 2);
        // hour pillar (ding:mao) stays unused -> wood +10
        assert_scores(&result.scores, [10.0, 0.0, 0.0, 0.0, 40.0]);
    }

    #[test]
    fn test_stem_label_does_not_match_branch_slot() {
        // "wu" is a stem label too, but no pillar has the wu branch.
        let chart = Chart::from_pairs([
            pair(Stem::Wu, Branch::Chen),
            pair(Stem::Jia, Branch::Yin),
            pair(Stem::Jia, Branch::Yin),
            pair(Stem::Jia, Branch::Yin),
        ]);
        let rules = vec![RuleSet::branches("yin-wu", "fire", 50.0, &["yin", "wu"])];
        let mut engine = ScoringEngine::with_chart(chart, &config(rules)).unwrap();
        let result = engine.evaluate();

        assert!(result.breakdown.matches.is_empty());
        assert_eq!(result.breakdown.remainders.len(), 4);
    }

    #[test]
    fn test_unmatchable_target_never_fires() {
        let rules = vec![RuleSet::branches("ghost", "earth", 500.0, &["yin", "dragon"])];
        let mut engine = ScoringEngine::new(&sample_chart(), &config(rules)).unwrap();
        let scores = engine.calculate();
        assert_eq!(scores.get(Element::Earth), 20.0);
    }

    #[test]
    fn test_rule_order_does_not_change_totals() {
        let forward = vec![wood_rule(), metal_rule()];
        let backward = vec![metal_rule(), wood_rule()];

        let mut a = ScoringEngine::new(&sample_chart(), &config(forward)).unwrap();
        let mut b = ScoringEngine::new(&sample_chart(), &config(backward)).unwrap();

        assert_eq!(a.calculate(), b.calculate());
        assert_eq!(a.chart(), b.chart());
    }

    #[test]
    fn test_repeated_calculate_is_stable() {
        let mut engine =
            ScoringEngine::new(&sample_chart(), &config(vec![wood_rule()])).unwrap();
        let first = engine.calculate();
        let second = engine.calculate();
        assert_eq!(first, second);
        assert_eq!(first.get(Element::Metal), 10.0);
    }

    #[test]
    fn test_fresh_engines_agree() {
        let config = ScoringConfig::default();
        let a = calculate_score(&sample_chart(), &config).unwrap();
        let b = calculate_score(&sample_chart(), &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_chart_is_rejected() {
        let mut input = sample_chart();
        input.month = PillarInput::new("jia", "mao");
        let err = ScoringEngine::new(&input, &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidChart { .. }));
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let rules = vec![RuleSet::branches("empty", "wood", 10.0, &[])];
        let err = ScoringEngine::new(&sample_chart(), &config(rules)).unwrap_err();
        match err {
            ScoreError::InvalidConfiguration(errors) => {
                assert!(errors[0].contains("must not be empty"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_configuration_checked_before_chart() {
        let mut input = sample_chart();
        input.year = PillarInput::new("gui", "zi");
        let rules = vec![RuleSet::branches("bad", "wind", 10.0, &["zi", "chou"])];
        let err = ScoringEngine::new(&input, &config(rules)).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_chinese_label_field() {
        let input = ChartInput {
            year: PillarInput::new("癸", "酉"),
            month: PillarInput::new("甲", "辰"),
            day: PillarInput::new("甲", "寅"),
            hour: PillarInput::new("丁", "卯"),
        };
        let config = ScoringConfig {
            label_field: LabelField::Chinese,
            remainder_value: 10.0,
            rule_sets: vec![RuleSet::branches("木方", "Wood", 100.0, &["寅", "卯", "辰"])],
        };
        let scores = calculate_score(&input, &config).unwrap().scores;
        assert_scores(&scores, [100.0, 0.0, 0.0, 10.0, 0.0]);
    }

    #[test]
    fn test_zero_remainder() {
        let config = ScoringConfig {
            remainder_value: 0.0,
            ..config(vec![])
        };
        let scores = calculate_score(&sample_chart(), &config).unwrap().scores;
        assert_eq!(scores.total(), 0.0);
    }

    #[test]
    fn test_is_present_map() {
        let engine = ScoringEngine::new(&sample_chart(), &config(vec![])).unwrap();
        let repeats = engine.repeat_counts();
        let rule = CompiledRule {
            name: "probe".to_string(),
            element: Element::Fire,
            score: 1.0,
            terms: vec![
                (SlotType::Branch, "yin".to_string()),
                (SlotType::Branch, "wu".to_string()),
                (SlotType::Stem, "ding".to_string()),
            ],
        };

        let presence = is_present(&rule, &repeats);
        assert_eq!(presence.get("branch:yin"), Some(&true));
        assert_eq!(presence.get("branch:wu"), Some(&false));
        assert_eq!(presence.get("stem:ding"), Some(&true));
    }
}
