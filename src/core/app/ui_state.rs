use crate::core::message::Message;
use crate::ui::renderer::{greeting_line, message_lines};
use crate::ui::theme::Theme;
use crate::utils::scroll::{prewrap_lines, ScrollState};
use ratatui::prelude::Size;
use ratatui::text::Line;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Instant;
use tui_textarea::{CursorMove, TextArea};

/// Everything the renderer reads besides the turn machinery.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Insertion-ordered transcript; entries are never removed.
    pub messages: Vec<Message>,
    textarea: TextArea<'static>,
    pub scroll: ScrollState,
    pub theme: Theme,
    pub markdown_enabled: bool,
    pub pulse_start: Instant,
    pub exit_requested: bool,
    pub last_term_size: Size,
    prewrap_cache: Option<PrewrapCache>,
}

/// Wrapped transcript lines from the last frame.
///
/// Everything before `last_start` belongs to settled messages; only the tail
/// is rebuilt while the newest message changes.
#[derive(Debug, Clone)]
struct PrewrapCache {
    width: u16,
    markdown_enabled: bool,
    messages_len: usize,
    last_msg_hash: u64,
    lines: Vec<Line<'static>>,
    last_start: usize,
}

impl UiState {
    pub fn new(theme: Theme, markdown_enabled: bool) -> Self {
        let mut ui = Self {
            messages: Vec::new(),
            textarea: TextArea::default(),
            scroll: ScrollState::default(),
            theme,
            markdown_enabled,
            pulse_start: Instant::now(),
            exit_requested: false,
            last_term_size: Size::default(),
            prewrap_cache: None,
        };
        ui.configure_textarea();
        ui
    }

    fn configure_textarea(&mut self) {
        self.textarea.set_style(self.theme.input_text_style);
        self.textarea
            .set_cursor_line_style(ratatui::style::Style::default());
        self.textarea.set_cursor_style(self.theme.input_cursor_style);
        self.textarea
            .set_placeholder_text("Type your message...");
        self.textarea
            .set_placeholder_style(self.theme.placeholder_style);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_input_text(&mut self, text: String) {
        let lines: Vec<String> = if text.is_empty() {
            vec![String::new()]
        } else {
            text.split('\n').map(str::to_string).collect()
        };
        self.textarea = TextArea::from(lines);
        self.configure_textarea();
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn clear_input(&mut self) {
        self.set_input_text(String::new());
    }

    pub fn input_line_count(&self) -> u16 {
        u16::try_from(self.textarea.lines().len()).unwrap_or(u16::MAX)
    }

    /// The assistant message the live turn reveals into.
    pub fn streaming_message_mut(&mut self) -> Option<&mut Message> {
        self.messages
            .last_mut()
            .filter(|msg| msg.is_assistant() && msg.streaming)
    }

    /// Flip the thought block of the newest message that has one.
    pub fn toggle_latest_thought(&mut self) -> bool {
        match self
            .messages
            .iter_mut()
            .rev()
            .find(|msg| msg.show_thought)
        {
            Some(msg) => {
                msg.toggle_thought();
                self.prewrap_cache = None;
                true
            }
            None => false,
        }
    }

    /// Transcript lines wrapped to `width`.
    pub fn get_prewrapped_lines_cached(&mut self, width: u16) -> &Vec<Line<'static>> {
        let markdown = self.markdown_enabled;
        let msg_len = self.messages.len();
        let last_hash = hash_last_message(&self.messages);

        let layout_matches = self.prewrap_cache.as_ref().is_some_and(|c| {
            c.width == width && c.markdown_enabled == markdown && c.messages_len == msg_len
        });
        if !layout_matches {
            self.prewrap_cache = None;
        }

        if let (Some(cache), Some(last)) = (self.prewrap_cache.as_mut(), self.messages.last()) {
            if cache.last_msg_hash != last_hash {
                cache.lines.truncate(cache.last_start);
                cache.lines.extend(prewrap_lines(
                    &message_lines(last, &self.theme, markdown),
                    width,
                ));
                cache.last_msg_hash = last_hash;
            }
        }

        let cache = self.prewrap_cache.get_or_insert_with(|| {
            build_prewrap_cache(&self.messages, &self.theme, markdown, width, last_hash)
        });
        &cache.lines
    }
}

fn build_prewrap_cache(
    messages: &[Message],
    theme: &Theme,
    markdown: bool,
    width: u16,
    last_msg_hash: u64,
) -> PrewrapCache {
    let mut lines = Vec::new();
    let mut last_start = 0;
    if messages.is_empty() {
        lines.extend(prewrap_lines(&[greeting_line(theme)], width));
    }
    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        last_start = lines.len();
        lines.extend(prewrap_lines(&message_lines(message, theme, markdown), width));
    }
    PrewrapCache {
        width,
        markdown_enabled: markdown,
        messages_len: messages.len(),
        last_msg_hash,
        lines,
        last_start,
    }
}

fn hash_last_message(messages: &[Message]) -> u64 {
    let mut h = DefaultHasher::new();
    if let Some(m) = messages.last() {
        m.hash(&mut h);
    }
    h.finish()
}
