use std::collections::HashSet;

use super::config::ScoringConfig;
use crate::chart::SlotType;
use crate::cycle::Element;

/// Validate scoring configuration before any chart is scored.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.remainder_value < 0.0 || !config.remainder_value.is_finite() {
        errors.push("remainder_value: must be a non-negative number".to_string());
    }

    let mut names = HashSet::new();
    for (i, rule) in config.rule_sets.iter().enumerate() {
        if !names.insert(rule.name.as_str()) {
            errors.push(format!(
                "rule_sets[{}].name: duplicate rule set name '{}'",
                i, rule.name
            ));
        }

        if let Err(e) = Element::parse(&rule.element) {
            errors.push(format!("rule_sets[{}].element: {}", i, e));
        }

        if rule.score < 0.0 || !rule.score.is_finite() {
            errors.push(format!(
                "rule_sets[{}].score: must be a non-negative number",
                i
            ));
        }

        if rule.terms.is_empty() {
            errors.push(format!("rule_sets[{}].terms: must not be empty", i));
        }

        let mut seen = HashSet::new();
        for (j, term) in rule.terms.iter().enumerate() {
            match SlotType::parse(&term.slot) {
                Ok(slot) => {
                    if !seen.insert((slot, term.target.as_str())) {
                        errors.push(format!(
                            "rule_sets[{}].terms[{}]: duplicate term {} '{}'",
                            i, j, term.slot, term.target
                        ));
                    }
                }
                Err(e) => errors.push(format!("rule_sets[{}].terms[{}].slot: {}", i, j, e)),
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
