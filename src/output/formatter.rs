use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::history::LogEntry;
use crate::inputs::TreeSpecies;
use crate::radar::RadarChart;
use crate::scoring::{Element, ElementalScores, Footprint, ScoreResult};

const MAX_BAR_WIDTH: usize = 30;
const PIPE_BAR_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 6;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with at most one decimal, dropping a trailing ".0"
/// ("7.5", "10", "348.7").
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    match formatted.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}

/// Bar width that fits the terminal, or a fixed width for pipes
fn bar_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => (w as usize)
            .saturating_sub(LABEL_WIDTH + 12)
            .clamp(5, MAX_BAR_WIDTH),
        None => PIPE_BAR_WIDTH,
    }
}

fn render_bar(score: f64, scale: f64, width: usize) -> String {
    let filled = if scale > 0.0 {
        ((score / scale) * width as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(width);
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

fn paint(element: Element, text: &str) -> String {
    match element {
        Element::Earth => text.green().to_string(),
        Element::Water => text.blue().to_string(),
        Element::Fire => text.red().to_string(),
        Element::Air => text.cyan().to_string(),
        Element::Space => text.magenta().to_string(),
    }
}

/// One row per element: name, score, and a bar scaled to the larger of 10
/// and the highest score (Earth can exceed 10).
pub fn format_scores_table(scores: &ElementalScores, use_colors: bool) -> String {
    format_scores_with_width(scores, use_colors, bar_width())
}

fn format_scores_with_width(scores: &ElementalScores, use_colors: bool, width: usize) -> String {
    let scale = scores
        .entries()
        .iter()
        .map(|(_, score)| *score)
        .fold(10.0, f64::max);

    scores
        .entries()
        .iter()
        .map(|(element, score)| {
            let label = format!("{:<width$}", element.name(), width = LABEL_WIDTH);
            let value = format!("{:>5}", format_score(*score));
            let bar = render_bar(*score, scale, width);
            if use_colors {
                format!("{} {}  {}", label.bold(), value, paint(*element, &bar))
            } else {
                format!("{} {}  {}", label, value, bar)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Show how each score was reached (verbose mode)
pub fn format_breakdown(result: &ScoreResult) -> String {
    result
        .breakdown
        .iter()
        .map(|c| {
            let floored = if c.raw < 0.0 {
                format!(" (raw {}, floored at 0)", format_score(c.raw))
            } else {
                String::new()
            };
            format!(
                "  {:<width$} {:>5}  {}{}",
                c.element.name(),
                format_score(c.score),
                c.description,
                floored,
                width = LABEL_WIDTH
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_footprint(footprint: &Footprint, use_colors: bool) -> String {
    let eco = format!("{}/100", format_score(footprint.eco_score));
    let eco = if !use_colors {
        eco
    } else if footprint.eco_score >= 70.0 {
        eco.green().bold().to_string()
    } else if footprint.eco_score >= 40.0 {
        eco.yellow().bold().to_string()
    } else {
        eco.red().bold().to_string()
    };

    format!(
        "Commute emissions: {} kg CO2\nEnergy consumed:   {} kWh\nAI emissions:      {} kg CO2\nEco score:         {}",
        format_score(footprint.commute_emissions_kg),
        format_score(footprint.energy_consumed_kwh),
        format_score(footprint.ai_emissions_kg),
        eco
    )
}

pub fn format_sequestration(species: TreeSpecies, age_years: f64, kg_per_year: f64) -> String {
    format!(
        "A {}-year-old {} absorbs about {} kg CO2 per year",
        format_score(age_years),
        species,
        format_score(kg_per_year)
    )
}

/// Radar vertices as "label angle radius (x, y)" lines
pub fn format_radar(chart: &RadarChart) -> String {
    chart
        .vertices
        .iter()
        .map(|v| {
            format!(
                "{:<width$} {:>6.1}°  r={:<5} ({:.2}, {:.2})",
                v.label,
                v.angle.to_degrees(),
                format_score(v.radius),
                v.x,
                v.y,
                width = LABEL_WIDTH
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format logged days as a table with a header row
pub fn format_history(entries: &[LogEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No entries logged yet.".to_string();
    }

    let header = format!(
        "{:<10}  {:>5} {:<9} {:>5} {:>5} {:>5} {:>5}  {:>5} {:>5} {:>5} {:>5} {:>5}",
        "Date", "Waste", "Transport", "kWh", "Water", "Hours", "Trees", "Earth", "Water", "Fire", "Air", "Space"
    );
    let header = if use_colors {
        header.dimmed().to_string()
    } else {
        header
    };

    let rows = entries.iter().map(|e| {
        let scores = e
            .scores()
            .entries()
            .iter()
            .map(|(_, score)| format!("{:>5}", format_score(*score)))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "{:<10}  {:>5} {:<9} {:>5} {:>5} {:>5} {:>5}  {}",
            e.date.format("%Y-%m-%d").to_string(),
            format_score(e.plastic_waste_grams),
            e.transport_mode.name(),
            format_score(e.electricity_kwh),
            format_score(e.water_used_litres),
            format_score(e.screen_time_hours),
            e.trees_planted_today,
            scores
        )
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}
