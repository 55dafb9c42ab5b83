//! Viewport - scrollable window over wrapped text
//!
//! Content is replaced wholesale, hard-wrapped to the viewport width by
//! display width, and shown `height` lines at a time. The scroll offset is
//! clamped so the window never runs past the last line.

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    content: Text<'static>,
    /// `content` wrapped to `width`
    lines: Vec<Line<'static>>,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Wrapped line count
    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn content(&self) -> &Text<'static> {
        &self.content
    }

    /// Replace the content. Returns false when the text is unchanged.
    pub fn set_content(&mut self, text: Text<'static>) -> bool {
        if text == self.content {
            return false;
        }
        self.content = text;
        self.rewrap();
        true
    }

    /// Change the visible window, keeping content and re-clamping the offset
    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        let rewrap = width != self.width;
        self.width = width;
        self.height = height;
        if rewrap {
            self.rewrap();
        } else {
            self.clamp();
        }
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(usize::from(self.height))
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    fn rewrap(&mut self) {
        let width = usize::from(self.width);
        self.lines = self
            .content
            .lines
            .iter()
            .flat_map(|line| wrap_line(line, width))
            .collect();
        self.clamp();
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(usize::from(self.height.max(1)));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(usize::from(self.height.max(1)));
    }

    pub fn goto_top(&mut self) {
        self.offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn at_top(&self) -> bool {
        self.offset == 0
    }

    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Scroll position in 0.0..=1.0
    pub fn scroll_percent(&self) -> f64 {
        let max = self.max_offset();
        if max == 0 {
            return 1.0;
        }
        self.offset as f64 / max as f64
    }

    /// The visible slice of wrapped lines
    pub fn view(&self) -> Text<'static> {
        let end = (self.offset + usize::from(self.height)).min(self.lines.len());
        Text::from(self.lines[self.offset.min(end)..end].to_vec())
    }
}

/// Hard-wrap one styled line to `width` display columns.
///
/// Always yields at least one line so blank lines survive wrapping.
fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    let mut rows = Vec::new();
    if width == 0 {
        rows.push(Line::default());
        return rows;
    }

    let mut row = SpanRun::default();
    for span in &line.spans {
        for ch in span.content.chars() {
            let (ch, repeat) = if ch == '\t' { (' ', TAB_WIDTH) } else { (ch, 1) };
            let w = ch.width().unwrap_or(0);
            for _ in 0..repeat {
                if row.width + w > width && row.width > 0 {
                    rows.push(row.finish(line));
                }
                row.push(ch, w, span.style);
            }
        }
    }
    rows.push(row.finish(line));
    rows
}

/// Accumulates characters into spans, merging neighbours with the same style
#[derive(Debug, Default)]
pub(crate) struct SpanRun {
    spans: Vec<Span<'static>>,
    text: String,
    style: Style,
    /// Display width of the current row
    pub(crate) width: usize,
}

impl SpanRun {
    pub(crate) fn push(&mut self, ch: char, width: usize, style: Style) {
        if style != self.style && !self.text.is_empty() {
            self.flush();
        }
        self.style = style;
        self.text.push(ch);
        self.width += width;
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.spans.push(Span::styled(text, self.style));
        }
    }

    /// Close the row, carrying over the line-level style and alignment of `like`
    pub(crate) fn finish(&mut self, like: &Line<'_>) -> Line<'static> {
        self.flush();
        self.width = 0;
        let mut line = Line::from(std::mem::take(&mut self.spans)).style(like.style);
        if let Some(alignment) = like.alignment {
            line = line.alignment(alignment);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn numbered(n: usize) -> Text<'static> {
        Text::from((0..n).map(|i| Line::from(format!("line {i}"))).collect::<Vec<_>>())
    }

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_view_shows_height_lines() {
        let mut vp = Viewport::new(20, 3);
        vp.set_content(numbered(10));
        assert_eq!(plain(&vp.view()), ["line 0", "line 1", "line 2"]);
    }

    #[test]
    fn test_set_content_idempotent() {
        let mut vp = Viewport::new(20, 3);
        assert!(vp.set_content(numbered(10)));
        vp.scroll_down(4);
        assert!(!vp.set_content(numbered(10)));
        assert_eq!(vp.offset(), 4);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut vp = Viewport::new(20, 3);
        vp.set_content(numbered(10));

        vp.scroll_up(5);
        assert!(vp.at_top());

        vp.scroll_down(100);
        assert_eq!(vp.offset(), 7);
        assert!(vp.at_bottom());
        assert_eq!(plain(&vp.view()), ["line 7", "line 8", "line 9"]);
    }

    #[test]
    fn test_short_content_does_not_scroll() {
        let mut vp = Viewport::new(20, 5);
        vp.set_content(numbered(2));
        vp.scroll_down(3);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.view().lines.len(), 2);
        assert_eq!(vp.scroll_percent(), 1.0);
    }

    #[test]
    fn test_resize_reclamps_offset() {
        let mut vp = Viewport::new(20, 3);
        vp.set_content(numbered(10));
        vp.goto_bottom();
        vp.resize(20, 8);
        assert_eq!(vp.offset(), 2);
        assert_eq!(vp.total_lines(), 10);
    }

    #[test]
    fn test_wraps_long_lines() {
        let mut vp = Viewport::new(4, 10);
        vp.set_content(Text::from("abcdefghij"));
        assert_eq!(plain(&vp.view()), ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_counts_wide_chars() {
        let mut vp = Viewport::new(4, 10);
        vp.set_content(Text::from("🚀🚀🚀"));
        assert_eq!(plain(&vp.view()), ["🚀🚀", "🚀"]);
    }

    #[test]
    fn test_wrap_keeps_styles_and_blank_lines() {
        let red = Style::default().fg(Color::Red);
        let text = Text::from(vec![
            Line::from(vec![Span::raw("ab"), Span::styled("cd", red)]),
            Line::default(),
        ]);
        let mut vp = Viewport::new(3, 10);
        vp.set_content(text);

        let view = vp.view();
        assert_eq!(view.lines.len(), 3);
        assert_eq!(view.lines[0].spans[1], Span::styled("c", red));
        assert_eq!(view.lines[1].spans[0], Span::styled("d", red));
        assert_eq!(view.lines[2].to_string(), "");
    }

    #[test]
    fn test_tabs_expand() {
        let mut vp = Viewport::new(20, 1);
        vp.set_content(Text::from("\tx"));
        assert_eq!(plain(&vp.view()), ["    x"]);
    }

    #[test]
    fn test_page_navigation() {
        let mut vp = Viewport::new(20, 4);
        vp.set_content(numbered(10));
        vp.page_down();
        assert_eq!(vp.offset(), 4);
        vp.page_down();
        assert_eq!(vp.offset(), 6);
        vp.page_up();
        assert_eq!(vp.offset(), 2);
        vp.goto_top();
        assert_eq!(vp.offset(), 0);
    }
}
