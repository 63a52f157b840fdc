pub mod formatter;

pub use formatter::{
    format_breakdown, format_footprint, format_history, format_radar, format_scores_table,
    format_score, format_sequestration, should_use_colors,
};
