use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;

use crate::cycle::{LabelField, SexagenaryCycle};
use crate::scoring::{ScoreBreakdown, ScoreResult, ScoreVector};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score without a trailing ".0" for whole numbers (100, 12.5)
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        let formatted = format!("{:.2}", score);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Format a score vector as one right-aligned line per element plus a total.
pub fn format_score_table(scores: &ScoreVector, use_colors: bool) -> String {
    let score_width = 7;

    let mut lines: Vec<String> = scores
        .iter()
        .map(|(element, value)| {
            let value_str = format!("{:>width$}", format_score(value), width = score_width);
            if use_colors && value > 0.0 {
                format!("{:<6}{}", element.name(), value_str.bold())
            } else if use_colors {
                format!("{:<6}{}", element.name(), value_str.dimmed())
            } else {
                format!("{:<6}{}", element.name(), value_str)
            }
        })
        .collect();

    let total = format!(
        "{:<6}{:>width$}",
        "total",
        format_score(scores.total()),
        width = score_width
    );
    if use_colors {
        lines.push(total.underline().to_string());
    } else {
        lines.push(total);
    }

    lines.join("\n")
}

/// Format a score vector as tab-separated values for scripting
/// Columns: element, score (no headers, no colors)
pub fn format_tsv(scores: &ScoreVector) -> String {
    scores
        .iter()
        .map(|(element, value)| format!("{}\t{}", element.name(), format_score(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty JSON with the scores and the breakdown.
pub fn format_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Explain where each point came from, for verbose mode.
pub fn format_breakdown(breakdown: &ScoreBreakdown, field: LabelField, use_colors: bool) -> String {
    let mut lines = Vec::new();

    if breakdown.matches.is_empty() {
        lines.push("No rule sets matched.".to_string());
    }
    for m in &breakdown.matches {
        let name = if use_colors {
            m.name.cyan().to_string()
        } else {
            m.name.clone()
        };
        lines.push(format!(
            "  {} -> {} {} x{} = {}",
            name,
            m.element,
            format_score(m.score),
            m.multiplier,
            format_score(m.points)
        ));
    }

    for credit in &breakdown.remainders {
        let elements = credit
            .branch
            .elements()
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>()
            .join(", ");
        let line = format!(
            "  {} ({}) unused -> +{} to {}",
            credit.position,
            credit.branch.label(field),
            format_score(credit.points),
            elements
        );
        if use_colors {
            lines.push(line.yellow().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Format a full score result, optionally followed by its breakdown.
pub fn format_result(
    result: &ScoreResult,
    field: LabelField,
    verbose: bool,
    use_colors: bool,
) -> String {
    let table = format_score_table(&result.scores, use_colors);
    if verbose {
        format!(
            "{}\n\n{}",
            table,
            format_breakdown(&result.breakdown, field, use_colors)
        )
    } else {
        table
    }
}

/// One line per cycle position: index, name in the chosen labels, Chinese name.
pub fn format_cycle(cycle: &SexagenaryCycle, field: LabelField) -> String {
    cycle
        .iter()
        .map(|pair| {
            format!(
                "{:>2}. {:<10} {}{}",
                pair.index + 1,
                pair.name(field),
                pair.stem.chinese(),
                pair.branch.chinese()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
