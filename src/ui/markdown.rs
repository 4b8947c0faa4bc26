//! Markdown to styled terminal lines.
//!
//! Output is unwrapped; the transcript pre-wraps every line afterwards so the
//! scroll limits stay exact.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

struct MarkdownRenderer<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    blockquote_depth: usize,
    in_code_block: bool,
    link_targets: Vec<String>,
}

impl<'t> MarkdownRenderer<'t> {
    fn new(theme: &'t Theme, base_style: Style) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            spans: Vec::new(),
            style_stack: vec![base_style],
            list_stack: Vec::new(),
            blockquote_depth: 0,
            in_code_block: false,
            link_targets: Vec::new(),
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.current_style().patch(patch);
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        // The base style stays at the bottom.
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if self.spans.is_empty() && self.blockquote_depth > 0 {
            self.spans.push(Span::styled(
                "│ ".repeat(self.blockquote_depth),
                self.theme.md_blockquote_style,
            ));
        }
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn push_empty_line(&mut self) {
        self.flush();
        if self
            .lines
            .last()
            .is_some_and(|line| line.spans.iter().any(|s| !s.content.is_empty()))
        {
            self.lines.push(Line::from(""));
        }
    }

    fn list_indent(&self) -> String {
        "  ".repeat(self.list_stack.len().saturating_sub(1))
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        for event in Parser::new_ext(content, options) {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag_end) => self.end_tag(tag_end),
                Event::Text(text) => {
                    if self.in_code_block {
                        self.push_code_text(&text);
                    } else {
                        let style = self.current_style();
                        self.push_text(&text, style);
                    }
                }
                Event::Code(code) => {
                    let style = self.theme.md_code_style;
                    self.push_text(&code, style);
                }
                Event::SoftBreak | Event::HardBreak => self.flush(),
                Event::Rule => {
                    self.flush();
                    self.lines.push(Line::from(Span::styled(
                        "─".repeat(20),
                        self.theme.md_blockquote_style,
                    )));
                    self.push_empty_line();
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    let style = self.theme.md_list_marker_style;
                    self.push_text(marker, style);
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    let style = self.current_style();
                    self.push_text(html.trim_end_matches('\n'), style);
                }
                _ => {}
            }
        }

        self.flush();
        while self
            .lines
            .last()
            .is_some_and(|line| line.spans.iter().all(|s| s.content.is_empty()))
        {
            self.lines.pop();
        }
        self.lines
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                let style = self.theme.md_heading_style;
                self.push_text(&format!("{} ", "#".repeat(level as usize)), style);
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.blockquote_depth += 1;
                self.push_style(self.theme.md_blockquote_style);
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines.push(Line::from(Span::styled(
                            format!("```{lang}"),
                            self.theme.md_blockquote_style,
                        )));
                    }
                }
            }
            Tag::List(start) => {
                self.flush();
                self.list_stack.push(match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Unordered,
                });
            }
            Tag::Item => {
                self.flush();
                let marker = match self.list_stack.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        let current = *n;
                        *n += 1;
                        format!("{current}. ")
                    }
                    _ => "- ".to_string(),
                };
                let indent = self.list_indent();
                let style = self.theme.md_list_marker_style;
                self.push_text(&format!("{indent}{marker}"), style);
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_targets.push(dest_url.to_string());
                self.push_style(self.theme.md_link_style);
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => {
                self.flush();
                if self.list_stack.is_empty() {
                    self.push_empty_line();
                }
            }
            TagEnd::Heading(_) => {
                self.pop_style();
                self.push_empty_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.blockquote_depth = self.blockquote_depth.saturating_sub(1);
                self.pop_style();
            }
            TagEnd::CodeBlock => {
                self.flush();
                self.in_code_block = false;
                self.push_empty_line();
            }
            TagEnd::List(_) => {
                self.flush();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.push_empty_line();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_targets.pop() {
                    let style = self.theme.md_blockquote_style;
                    self.push_text(&format!(" ({url})"), style);
                }
            }
            _ => {}
        }
    }

    fn push_code_text(&mut self, text: &str) {
        let style = self.theme.md_code_style;
        for (i, line) in text.split('\n').enumerate() {
            // Blank code lines are kept, unlike blank prose lines.
            if i > 0 {
                self.lines.push(Line::from(std::mem::take(&mut self.spans)));
            }
            if !line.is_empty() {
                self.spans.push(Span::styled(format!("  {line}"), style));
            }
        }
    }
}

/// Render Markdown `content` into styled lines. Unstyled text takes
/// `base_style`.
pub fn render_markdown(content: &str, base_style: Style, theme: &Theme) -> Vec<Line<'static>> {
    MarkdownRenderer::new(theme, base_style).render(content)
}

/// Split `content` into lines verbatim.
pub fn render_plain(content: &str, style: Style) -> Vec<Line<'static>> {
    content
        .split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn paragraphs_are_separated_by_one_blank_line() {
        let theme = Theme::dark_default();
        let lines = render_markdown("first\n\nsecond", Style::default(), &theme);
        assert_eq!(texts(&lines), vec!["first", "", "second"]);
    }

    #[test]
    fn emphasis_and_code_are_styled() {
        let theme = Theme::dark_default();
        let lines = render_markdown("a **b** `c`", Style::default(), &theme);
        assert_eq!(texts(&lines), vec!["a b c"]);
        let spans = &lines[0].spans;
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].style, theme.md_code_style);
    }

    #[test]
    fn lists_get_markers_and_numbers() {
        let theme = Theme::dark_default();
        let lines = render_markdown("- one\n- two\n\n3. x\n4. y", Style::default(), &theme);
        assert_eq!(
            texts(&lines),
            vec!["- one", "- two", "", "3. x", "4. y"]
        );
    }

    #[test]
    fn nested_lists_are_indented() {
        let theme = Theme::dark_default();
        let lines = render_markdown("- outer\n  - inner", Style::default(), &theme);
        assert_eq!(texts(&lines), vec!["- outer", "  - inner"]);
    }

    #[test]
    fn code_blocks_keep_lines() {
        let theme = Theme::dark_default();
        let lines = render_markdown(
            "```rust\nfn main() {}\n\nlet x = 1;\n```",
            Style::default(),
            &theme,
        );
        assert_eq!(
            texts(&lines),
            vec!["```rust", "  fn main() {}", "", "  let x = 1;"]
        );
    }

    #[test]
    fn headings_and_links() {
        let theme = Theme::dark_default();
        let lines = render_markdown(
            "## Title\n\nsee [docs](https://x.test)",
            Style::default(),
            &theme,
        );
        assert_eq!(
            texts(&lines),
            vec!["## Title", "", "see docs (https://x.test)"]
        );
    }

    #[test]
    fn blockquotes_get_a_gutter() {
        let theme = Theme::dark_default();
        let lines = render_markdown("> quoted", Style::default(), &theme);
        assert_eq!(texts(&lines), vec!["│ quoted"]);
    }

    #[test]
    fn plain_rendering_is_verbatim() {
        let lines = render_plain("**not bold**\n\nnext", Style::default());
        assert_eq!(texts(&lines), vec!["**not bold**", "", "next"]);
    }
}
