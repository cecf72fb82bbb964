//! Report generation.
//!
//! This module renders a stats bundle as JSON or as a Markdown summary.

use crate::stats::{
    ByTimeClass, DrawBreakdown, FinishBreakdown, GameRecord, StatsBundle, StatsResource,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

/// Generate a JSON report (the bundle as-is).
pub fn generate_json_report(bundle: &StatsBundle) -> Result<String> {
    serde_json::to_string_pretty(bundle).map_err(Into::into)
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(username: &str, bundle: &StatsBundle) -> String {
    generate_markdown_report_at(username, bundle, Utc::now())
}

fn generate_markdown_report_at(
    username: &str,
    bundle: &StatsBundle,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Chess Stats: {}\n\n", username));
    output.push_str(&generate_metadata_section(username, generated_at));

    output.push_str(&generate_games_section(&bundle.game_stats));
    output.push_str(&generate_finish_section(
        "Wins",
        StatsResource::Win,
        &bundle.win_stats,
    ));
    output.push_str(&generate_finish_section(
        "Losses",
        StatsResource::Loss,
        &bundle.loss_stats,
    ));
    output.push_str(&generate_draws_section(&bundle.draw_stats));

    output.push_str("---\n\n*Report generated by chesstats*\n");

    output
}

fn generate_metadata_section(username: &str, generated_at: DateTime<Utc>) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Username:** {}\n", username));
    section.push_str(&format!(
        "- **Generated:** {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    section
}

/// Decode a payload into its typed view, if it has the expected shape.
fn typed<T: DeserializeOwned>(payload: &Value) -> Option<ByTimeClass<T>> {
    serde_json::from_value(payload.clone()).ok()
}

/// Fallback for payloads that don't match the known shape.
fn raw_block(payload: &Value) -> String {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    format!("```json\n{}\n```\n\n", pretty)
}

fn generate_games_section(payload: &Value) -> String {
    let mut section = String::from("## Games\n\n");

    let Some(records) = typed::<GameRecord>(payload) else {
        section.push_str(&raw_block(payload));
        return section;
    };

    if records.is_empty() {
        section.push_str("No games recorded.\n\n");
        return section;
    }

    section.push_str("| Time Class | Wins | Losses | Draws | Total | Win Rate |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|\n");

    let mut overall = GameRecord::default();
    for (time_class, record) in &records {
        section.push_str(&game_row(time_class, record));
        overall.wins += record.wins;
        overall.losses += record.losses;
        overall.draws += record.draws;
        overall.total += record.total;
    }
    section.push_str(&game_row("**All**", &overall));
    section.push('\n');

    section
}

fn game_row(label: &str, record: &GameRecord) -> String {
    format!(
        "| {} | {} | {} | {} | {} | {:.1}% |\n",
        label,
        record.wins,
        record.losses,
        record.draws,
        record.total,
        record.win_rate()
    )
}

fn generate_finish_section(title: &str, resource: StatsResource, payload: &Value) -> String {
    let mut section = format!("## {}\n\n", title);

    let Some(breakdowns) = typed::<FinishBreakdown>(payload) else {
        section.push_str(&raw_block(payload));
        return section;
    };

    if breakdowns.is_empty() {
        section.push_str(&format!("No {} recorded.\n\n", resource));
        return section;
    }

    section.push_str("| Time Class | Resignation | Checkmate | Abandoned | Timeout | Total |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|\n");
    for (time_class, b) in &breakdowns {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            time_class, b.resigns, b.checkmates, b.abandons, b.timeouts, b.total
        ));
    }
    section.push('\n');

    section
}

fn generate_draws_section(payload: &Value) -> String {
    let mut section = String::from("## Draws\n\n");

    let Some(breakdowns) = typed::<DrawBreakdown>(payload) else {
        section.push_str(&raw_block(payload));
        return section;
    };

    if breakdowns.is_empty() {
        section.push_str("No draws recorded.\n\n");
        return section;
    }

    section.push_str(
        "| Time Class | Repetition | Insufficient | Timeout vs Insufficient | Stalemate | Agreed | 50-Move | Total |\n",
    );
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    for (time_class, b) in &breakdowns {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            time_class,
            b.repetitions,
            b.insufficients,
            b.timeout_vs_insufficients,
            b.stalemates,
            b.agrees,
            b.fifty_move_rules,
            b.total
        ));
    }
    section.push('\n');

    section
}

/// Write a rendered report to a file.
pub fn save_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
