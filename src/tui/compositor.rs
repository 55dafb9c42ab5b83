//! Compositor - merges the particle canvas over the content text
//!
//! Cells are matched by character position within each row. A non-space
//! particle glyph wins, otherwise the content character shows through;
//! rows missing on either side count as spaces.

use ratatui::style::Style;
use ratatui::text::{Line, Text};
use unicode_width::UnicodeWidthChar;

use super::particles::{Canvas, CanvasCell};
use super::viewport::SpanRun;

/// Overlay `canvas` onto `base`.
///
/// Returns `base` untouched when the canvas holds no glyphs.
pub fn overlay(base: Text<'static>, canvas: &Canvas) -> Text<'static> {
    if canvas.is_blank() {
        return base;
    }

    let rows: Vec<&[CanvasCell]> = canvas.rows().collect();
    let row_count = base.lines.len().max(rows.len());
    let blank = Line::default();

    let lines = (0..row_count)
        .map(|i| {
            let base_line = base.lines.get(i).unwrap_or(&blank);
            let row = rows.get(i).copied().unwrap_or(&[]);
            combine_line(base_line, row)
        })
        .collect::<Vec<_>>();

    let mut text = Text::from(lines).style(base.style);
    if let Some(alignment) = base.alignment {
        text = text.alignment(alignment);
    }
    text
}

/// Merge one text row with one canvas row
fn combine_line(base: &Line<'_>, row: &[CanvasCell]) -> Line<'static> {
    let base_cells: Vec<(char, Style)> = base
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |c| (c, span.style)))
        .collect();

    let len = base_cells.len().max(row.len());
    let mut run = SpanRun::default();

    for i in 0..len {
        let (ch, style) = match row.get(i) {
            Some(cell) if !cell.is_blank() => (cell.symbol, cell.style),
            _ => base_cells
                .get(i)
                .copied()
                .unwrap_or((' ', Style::default())),
        };
        run.push(ch, ch.width().unwrap_or(0), style);
    }

    run.finish(base)
}
