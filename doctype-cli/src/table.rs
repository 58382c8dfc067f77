//! Table rendering for command output.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// Width used when stdout is not a terminal, so piped output is stable.
pub const FALLBACK_WIDTH: u16 = 120;

fn output_width() -> u16 {
    match crossterm::terminal::size() {
        Ok((width, _)) if width > 0 => width,
        _ => FALLBACK_WIDTH,
    }
}

/// A table with `header`, wrapping cells to fit the terminal.
pub fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(output_width())
        .set_header(header.to_vec());
    table
}

/// Optional description text for a cell, cut to `max` characters with "...".
pub fn description_cell(text: Option<&str>, max: usize) -> String {
    let text = text.map(str::trim).unwrap_or_default();
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some(_) => {
            let keep = max.saturating_sub(3);
            let cut = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
            format!("{}...", &text[..cut])
        }
    }
}

/// Render a yes/no cell.
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
