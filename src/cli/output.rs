// Human-readable rendering of construction stages

use std::io::IsTerminal;
use crate::models::ConstructionStage;
use crate::utils::{format_duration, format_strict_utc};

/// Narrowest the name column is allowed to get
const MIN_NAME_WIDTH: usize = 10;

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate, with fallback to the COLUMNS environment
/// variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

/// Truncate to `width` characters, marking the cut with `..`
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(2)).collect();
    format!("{}..", kept)
}

fn format_end(stage: &ConstructionStage) -> String {
    stage
        .end_date
        .as_ref()
        .map(format_strict_utc)
        .unwrap_or_else(|| "-".to_string())
}

/// Format a stage list as a table sized to `width` columns
pub fn format_stage_table(stages: &[ConstructionStage], width: usize) -> String {
    if stages.is_empty() {
        return "No construction stages found.".to_string();
    }

    let durations: Vec<String> = stages
        .iter()
        .map(|s| format_duration(s.duration, s.duration_unit))
        .collect();
    let id_width = stages
        .iter()
        .map(|s| s.id.to_string().len())
        .max()
        .unwrap_or(2)
        .max(2);
    let duration_width = durations.iter().map(|d| d.len()).max().unwrap_or(8).max(8);

    // id + start + end + duration + status, plus single-space separators
    let fixed = id_width + 20 + 20 + duration_width + 7 + 5;
    let longest_name = stages.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
    let name_width = width
        .saturating_sub(fixed)
        .max(MIN_NAME_WIDTH)
        .min(longest_name.max(4));

    let mut output = String::new();
    let header = format!(
        "{:<iw$} {:<nw$} {:<20} {:<20} {:<dw$} {:<7}",
        "ID", "Name", "Start", "End", "Duration", "Status",
        iw = id_width, nw = name_width, dw = duration_width,
    );
    output.push_str(header.trim_end());
    output.push('\n');
    output.push_str(&"-".repeat(header.trim_end().len()));
    output.push('\n');

    for (stage, duration) in stages.iter().zip(&durations) {
        let line = format!(
            "{:<iw$} {:<nw$} {:<20} {:<20} {:<dw$} {:<7}",
            stage.id,
            truncate(&stage.name, name_width),
            format_strict_utc(&stage.start_date),
            format_end(stage),
            duration,
            stage.status.as_str(),
            iw = id_width, nw = name_width, dw = duration_width,
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// Format a single stage as a detail block
pub fn format_stage_summary(stage: &ConstructionStage) -> String {
    let mut output = String::new();

    let header = format!("Stage {}: {}", stage.id, stage.name);
    output.push_str(&header);
    output.push('\n');
    output.push_str(&"=".repeat(header.chars().count().max(40)));
    output.push_str("\n\n");

    output.push_str(&format!("Status:      {}\n", stage.status));
    output.push_str(&format!("Start:       {}\n", format_strict_utc(&stage.start_date)));
    output.push_str(&format!("End:         {}\n", format_end(stage)));
    output.push_str(&format!("Duration:    {}\n", format_duration(stage.duration, stage.duration_unit)));
    output.push_str(&format!("Color:       {}\n", stage.color.as_deref().unwrap_or("-")));
    output.push_str(&format!("External ID: {}\n", stage.external_id.as_deref().unwrap_or("-")));

    output
}
