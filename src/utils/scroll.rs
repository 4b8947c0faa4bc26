//! Transcript scrolling and pre-wrapping.
//!
//! Lines are wrapped here rather than by ratatui so the number of rows the
//! transcript occupies is known before rendering, which the scroll limits
//! depend on.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Scroll position of the transcript.
///
/// While `auto_scroll` is on the view follows the newest line. Scrolling up
/// turns it off; reaching the bottom again turns it back on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    offset: u16,
    max_offset: u16,
    auto_scroll: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            max_offset: 0,
            auto_scroll: true,
        }
    }
}

impl ScrollState {
    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    /// Record how far the transcript can scroll for the last rendered size.
    pub fn set_max_offset(&mut self, max_offset: u16) {
        self.max_offset = max_offset;
        if self.auto_scroll || self.offset > max_offset {
            self.offset = max_offset;
        }
    }

    pub fn max_offset(&self) -> u16 {
        self.max_offset
    }

    /// Offset to render with, given the current maximum.
    pub fn effective_offset(&self, max_offset: u16) -> u16 {
        if self.auto_scroll {
            max_offset
        } else {
            self.offset.min(max_offset)
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        if self.auto_scroll {
            self.offset = self.max_offset;
        }
        let next = self.offset.saturating_sub(lines);
        if next < self.max_offset {
            self.auto_scroll = false;
        }
        self.offset = next;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset);
        if self.offset >= self.max_offset {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.auto_scroll = self.max_offset == 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset;
        self.auto_scroll = true;
    }
}

/// Maximum scroll offset for `total_lines` rows in a viewport of `height`.
pub fn max_scroll_offset(total_lines: usize, height: u16) -> u16 {
    let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
    total.saturating_sub(height)
}

/// Wrap styled lines to `width` columns, breaking at spaces where possible
/// and inside long words otherwise.
pub fn prewrap_lines(lines: &[Line<'_>], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        if width == 0 || line.spans.is_empty() {
            out.push(to_owned_line(line));
            continue;
        }
        wrap_line(line, width, &mut out);
    }

    out
}

fn to_owned_line(line: &Line<'_>) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .iter()
        .map(|s| Span::styled(s.content.to_string(), s.style))
        .collect();
    Line::from(spans).style(line.style)
}

fn push_char(spans: &mut Vec<Span<'static>>, ch: char, style: Style) {
    if let Some(last) = spans.last_mut() {
        if last.style == style {
            last.content.to_mut().push(ch);
            return;
        }
    }
    spans.push(Span::styled(ch.to_string(), style));
}

fn wrap_line(line: &Line<'_>, width: usize, out: &mut Vec<Line<'static>>) {
    let chars: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();

    if chars.is_empty() {
        out.push(Line::from("").style(line.style));
        return;
    }

    let mut start = 0;
    while start < chars.len() {
        // Find the furthest index that fits.
        let mut used = 0;
        let mut end = start;
        let mut last_space = None;
        while end < chars.len() {
            let w = chars[end].0.width().unwrap_or(0);
            if used + w > width && end > start {
                break;
            }
            if chars[end].0 == ' ' {
                last_space = Some(end);
            }
            used += w;
            end += 1;
        }

        let (row_end, next_start) = if end < chars.len() {
            if chars[end].0 == ' ' {
                (end, end + 1)
            } else {
                match last_space {
                    Some(space) if space > start => (space, space + 1),
                    _ => (end, end),
                }
            }
        } else {
            (end, end)
        };

        let mut spans: Vec<Span<'static>> = Vec::new();
        for &(ch, style) in &chars[start..row_end] {
            push_char(&mut spans, ch, style);
        }
        out.push(Line::from(spans).style(line.style));
        start = next_start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Style};

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = vec![Line::from("the quick brown fox")];
        let wrapped = prewrap_lines(&lines, 10);
        let rows: Vec<String> = wrapped.iter().map(text).collect();
        assert_eq!(rows, vec!["the quick", "brown fox"]);
    }

    #[test]
    fn breaks_long_words() {
        let lines = vec![Line::from("abcdefghij")];
        let wrapped = prewrap_lines(&lines, 4);
        let rows: Vec<String> = wrapped.iter().map(text).collect();
        assert_eq!(rows, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn keeps_styles_across_rows() {
        let red = Style::default().fg(Color::Red);
        let lines = vec![Line::from(vec![
            Span::raw("plain "),
            Span::styled("red words", red),
        ])];
        let wrapped = prewrap_lines(&lines, 9);
        assert_eq!(wrapped.len(), 2);
        assert_eq!(text(&wrapped[0]), "plain red");
        assert_eq!(wrapped[1].spans[0].style, red);
        assert_eq!(text(&wrapped[1]), "words");
    }

    #[test]
    fn empty_lines_survive() {
        let lines = vec![Line::from(""), Line::from("x")];
        assert_eq!(prewrap_lines(&lines, 5).len(), 2);
    }

    #[test]
    fn wide_characters_count_double() {
        let lines = vec![Line::from("日本語テキスト")];
        let wrapped = prewrap_lines(&lines, 6);
        let rows: Vec<String> = wrapped.iter().map(text).collect();
        assert_eq!(rows, vec!["日本語", "テキス", "ト"]);
    }

    #[test]
    fn auto_scroll_follows_growth() {
        let mut scroll = ScrollState::default();
        scroll.set_max_offset(5);
        assert_eq!(scroll.effective_offset(5), 5);
        scroll.set_max_offset(9);
        assert_eq!(scroll.effective_offset(9), 9);
    }

    #[test]
    fn scrolling_up_suspends_follow_until_bottom() {
        let mut scroll = ScrollState::default();
        scroll.set_max_offset(10);
        scroll.scroll_up(3);
        assert!(!scroll.auto_scroll());
        assert_eq!(scroll.effective_offset(10), 7);

        scroll.set_max_offset(20);
        assert_eq!(scroll.effective_offset(20), 7);

        scroll.scroll_down(20);
        assert!(scroll.auto_scroll());
        assert_eq!(scroll.effective_offset(20), 20);
    }

    #[test]
    fn scroll_up_without_overflow_keeps_following() {
        let mut scroll = ScrollState::default();
        scroll.set_max_offset(0);
        scroll.scroll_up(1);
        assert!(scroll.auto_scroll());
    }

    #[test]
    fn max_offset_saturates() {
        assert_eq!(max_scroll_offset(3, 10), 0);
        assert_eq!(max_scroll_offset(30, 10), 20);
    }
}
