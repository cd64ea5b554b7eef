use terminal_size::{Width, Height, terminal_size};

use super::connectivity::{Cell, ResultSet};

/// Printed instead of a table when a query returns no rows.
pub const NO_RESULTS: &str = "Sin resultados";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Grid,
    Json,
}

impl OutputMode {
    /// `TIENDA_OUTPUT=json` forces JSON output; anything else keeps the grid.
    pub fn from_env() -> Self {
        if std::env::var("TIENDA_OUTPUT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false) {
            OutputMode::Json
        } else {
            OutputMode::Grid
        }
    }
}

// Render a result set for the terminal.
// Grid mode degrades to NO_RESULTS on an empty result; JSON mode always emits the document.
pub fn render_result(rs: &ResultSet, mode: OutputMode, max_width: usize) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(rs)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
        OutputMode::Grid if rs.is_empty() => NO_RESULTS.to_string(),
        OutputMode::Grid => render_grid(rs, max_width),
    }
}

/// Grid table in the style of:
///
/// ```text
/// +--------+---------+
/// | nombre | correo  |
/// +========+=========+
/// | Ana    | a@x.com |
/// +--------+---------+
/// ```
///
/// Cells longer than `max_width` are cut with an ellipsis. Numeric cells are
/// right aligned.
pub fn render_grid(rs: &ResultSet, max_width: usize) -> String {
    let max_width = max_width.max(1);
    let ncols = rs.columns.len();
    let rows: Vec<Vec<(String, bool)>> = rs
        .rows
        .iter()
        .map(|r| {
            (0..ncols)
                .map(|i| match r.get(i) {
                    Some(c) => (c.to_string(), c.is_numeric()),
                    None => (Cell::Null.to_string(), false),
                })
                .collect()
        })
        .collect();

    // Compute widths
    let mut widths: Vec<usize> = rs.columns.iter().map(|s| display_len(s).min(max_width)).collect();
    for r in &rows {
        for (i, (cell, _)) in r.iter().enumerate() {
            let w = display_len(cell);
            if w > widths[i] { widths[i] = w.min(max_width); }
        }
    }

    let sep = build_separator(&widths, '-');
    let mut lines: Vec<String> = Vec::with_capacity(rows.len() * 2 + 3);
    lines.push(sep.clone());
    let header: Vec<(String, bool)> = rs.columns.iter().map(|c| (c.clone(), false)).collect();
    lines.push(build_row(&header, &widths));
    lines.push(build_separator(&widths, '='));
    for r in &rows {
        lines.push(build_row(r, &widths));
        lines.push(sep.clone());
    }
    lines.join("\n")
}

fn display_len(s: &str) -> usize { s.chars().count() }

fn build_separator(widths: &[usize], fill: char) -> String {
    let mut s = String::new();
    s.push('+');
    for w in widths {
        s.extend(std::iter::repeat(fill).take(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[(String, bool)], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let (cell, align_right) = cells.get(i).cloned().unwrap_or_default();
        let text = truncate(&cell, *w);
        let pad = " ".repeat(w.saturating_sub(display_len(&text)));
        s.push(' ');
        if align_right {
            s.push_str(&pad);
            s.push_str(&text);
        } else {
            s.push_str(&text);
            s.push_str(&pad);
        }
        s.push(' ');
        s.push('|');
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    let take = max - 1;
    s.chars().take(take).collect::<String>() + "…"
}

/// Per-cell width budget derived from the terminal, 80 when not attached to one.
pub fn terminal_width() -> usize {
    if let Some((Width(w), Height(_h))) = terminal_size() {
        return (w as usize).saturating_sub(4).max(10);
    }
    80
}
