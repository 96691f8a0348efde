pub mod formatter;

pub use formatter::{
    format_breakdown, format_cycle, format_json, format_result, format_score,
    format_score_table, format_tsv, should_use_colors,
};
