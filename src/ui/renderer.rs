use crate::core::app::App;
use crate::core::message::{Message, TranscriptRole};
use crate::ui::markdown::{render_markdown, render_plain};
use crate::ui::theme::Theme;
use crate::utils::scroll::max_scroll_offset;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::time::Duration;

const MAX_INPUT_ROWS: u16 = 6;
const USER_PREFIX: &str = "You: ";
const USER_INDENT: &str = "     ";
const THOUGHT_INDENT: &str = "  ";
const GREETING: &str = "Ask a question to get started. Ctrl+T picks tools.";

/// Geometry the event loop needs back from a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderLayout {
    pub max_scroll: u16,
    pub dropdown_area: Option<Rect>,
}

pub fn ui(f: &mut Frame, app: &mut App) -> RenderLayout {
    let theme = &app.ui.theme;
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let input_rows = app.ui.input_line_count().clamp(1, MAX_INPUT_ROWS);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(input_rows + 2), // +2 for borders
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new(title_text(app)).style(theme.title_style),
        chunks[0],
    );

    let transcript_area = chunks[1];
    let total = app
        .ui
        .get_prewrapped_lines_cached(transcript_area.width)
        .len();
    let max_scroll = max_scroll_offset(total, transcript_area.height);
    let offset = app.ui.scroll.effective_offset(max_scroll);
    let visible: Vec<Line<'static>> = app
        .ui
        .get_prewrapped_lines_cached(transcript_area.width)
        .iter()
        .skip(usize::from(offset))
        .take(usize::from(transcript_area.height))
        .cloned()
        .collect();
    f.render_widget(Paragraph::new(visible), transcript_area);

    render_input(f, app, chunks[2]);

    let dropdown_area = if app.tools_dropdown.is_open() {
        Some(render_tools_dropdown(f, app, chunks[2]))
    } else {
        None
    };

    RenderLayout {
        max_scroll,
        dropdown_area,
    }
}

fn title_text(app: &App) -> String {
    let tools = if app.tools.is_empty() {
        "none".to_string()
    } else {
        app.available_tools
            .iter()
            .filter(|tool| app.tools.contains(&tool.name))
            .map(|tool| tool.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Ponder v{} • {} • Tools: {}",
        env!("CARGO_PKG_VERSION"),
        app.session.answer_url(),
        tools
    )
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.ui.theme;
    let hints = if app.is_loading() {
        "Esc to stop • Ctrl+T tools • Ctrl+C to quit"
    } else {
        "Enter to send • Alt+Enter for new line • Ctrl+T tools • Ctrl+O thought • Ctrl+C to quit"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(hints, theme.input_title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text_area = if app.is_loading() && inner.width > 3 {
        Rect {
            width: inner.width - 3,
            ..inner
        }
    } else {
        inner
    };
    f.render_widget(app.ui.textarea(), text_area);

    if app.is_loading() && inner.width > 3 {
        let symbol = pulse_symbol(app.ui.pulse_start.elapsed());
        let indicator = Rect {
            x: inner.x + inner.width - 2,
            y: inner.y,
            width: 1,
            height: 1,
        };
        f.render_widget(
            Paragraph::new(symbol).style(theme.streaming_indicator_style),
            indicator,
        );
    }
}

/// Loading indicator frame: two pulses per second.
pub fn pulse_symbol(elapsed: Duration) -> &'static str {
    let elapsed = elapsed.as_millis() as f32 / 1000.0;
    let pulse_phase = (elapsed * 2.0) % 2.0;
    let pulse_intensity = if pulse_phase < 1.0 {
        pulse_phase
    } else {
        2.0 - pulse_phase
    };

    if pulse_intensity < 0.33 {
        "○"
    } else if pulse_intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

fn render_tools_dropdown(f: &mut Frame, app: &App, input_area: Rect) -> Rect {
    let theme = &app.ui.theme;
    let label_width = app
        .available_tools
        .iter()
        .map(|tool| tool.label.chars().count())
        .max()
        .unwrap_or(0);
    let width = (label_width as u16 + 8).max(16).min(input_area.width);
    let height = (app.available_tools.len() as u16 + 2).min(input_area.y.max(3));
    let area = Rect {
        x: input_area.x,
        y: input_area.y.saturating_sub(height),
        width,
        height,
    };

    let items: Vec<ListItem> = app
        .available_tools
        .iter()
        .map(|tool| {
            let checked = app.tools.contains(&tool.name);
            let marker = if checked { "[x] " } else { "[ ] " };
            let style = if checked {
                theme.dropdown_checked_style
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::raw(tool.label.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.dropdown_border_style)
                .title("Tools"),
        )
        .highlight_style(theme.dropdown_selected_style);
    let mut state = ListState::default().with_selected(Some(app.tools_dropdown.selected()));

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
    area
}

pub fn greeting_line(theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(GREETING, theme.greeting_style))
}

/// Unwrapped lines for one transcript entry.
pub fn message_lines(message: &Message, theme: &Theme, markdown: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match message.role {
        TranscriptRole::User => push_user_lines(&mut lines, message, theme),
        TranscriptRole::Assistant => push_assistant_lines(&mut lines, message, theme, markdown),
        TranscriptRole::AppInfo | TranscriptRole::AppError => {
            push_app_lines(&mut lines, message, theme)
        }
    }
    lines
}

fn push_user_lines(lines: &mut Vec<Line<'static>>, message: &Message, theme: &Theme) {
    for (i, text) in message.content.split('\n').enumerate() {
        let lead = if i == 0 {
            Span::styled(USER_PREFIX, theme.user_prefix_style)
        } else {
            Span::raw(USER_INDENT)
        };
        lines.push(Line::from(vec![
            lead,
            Span::styled(text.to_string(), theme.user_text_style),
        ]));
    }
}

fn push_app_lines(lines: &mut Vec<Line<'static>>, message: &Message, theme: &Theme) {
    let style = theme.text_style_for(message.role);
    let prefix = if message.role == TranscriptRole::AppError {
        "⚠ "
    } else {
        "ⓘ "
    };
    for (i, text) in message.content.split('\n').enumerate() {
        let lead = if i == 0 { prefix } else { "  " };
        lines.push(Line::from(Span::styled(format!("{lead}{text}"), style)));
    }
}

fn push_assistant_lines(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    theme: &Theme,
    markdown: bool,
) {
    if message.show_thought {
        let arrow = if message.thought_expanded { "▼" } else { "▶" };
        lines.push(Line::from(Span::styled(
            format!("{arrow} Thought Process"),
            theme.thought_header_style,
        )));
        if message.thought_expanded {
            // Partial Markdown renders badly, so live thoughts stay plain.
            let body = if markdown && !message.streaming {
                render_markdown(&message.thought, theme.thought_text_style, theme)
            } else {
                render_plain(&message.thought, theme.thought_text_style)
            };
            for line in body {
                let mut spans = vec![Span::raw(THOUGHT_INDENT)];
                spans.extend(line.spans);
                lines.push(Line::from(spans));
            }
        }
        if !message.content.is_empty() {
            lines.push(Line::from(""));
        }
    }

    if message.content.is_empty() {
        return;
    }
    if markdown {
        lines.extend(render_markdown(
            &message.content,
            theme.assistant_text_style,
            theme,
        ));
    } else {
        lines.extend(render_plain(&message.content, theme.assistant_text_style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::AppInitConfig;
    use crate::core::config::Config;
    use ratatui::{backend::TestBackend, Terminal};

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn test_app() -> App {
        App::new(AppInitConfig::default(), &Config::default())
    }

    fn transcript(app: &mut App) -> Vec<String> {
        texts(app.ui.get_prewrapped_lines_cached(200))
    }

    #[test]
    fn empty_transcript_shows_greeting() {
        let mut app = test_app();
        assert_eq!(transcript(&mut app), vec![GREETING]);
    }

    #[test]
    fn thought_block_toggles_between_arrows() {
        let mut app = test_app();
        app.ui.messages.push(Message::user("Why?"));
        let mut reply = Message::assistant_placeholder();
        reply.thought.push_str("reasoning...");
        reply.content.push_str("answer");
        reply.complete();
        app.ui.messages.push(reply);

        let rows = transcript(&mut app);
        assert_eq!(
            rows,
            vec![
                "You: Why?",
                "",
                "▼ Thought Process",
                "  reasoning...",
                "",
                "answer"
            ]
        );

        app.ui.toggle_latest_thought();
        let rows = transcript(&mut app);
        assert_eq!(rows[2], "▶ Thought Process");
        assert_eq!(rows[3], "");
        assert_eq!(rows[4], "answer");
    }

    #[test]
    fn streaming_thought_is_plain_text() {
        let mut app = test_app();
        let mut reply = Message::assistant_placeholder();
        reply.reveal(crate::core::reveal::Channel::Thought, "**step**");
        app.ui.messages.push(reply);
        let rows = transcript(&mut app);
        assert_eq!(rows, vec!["▼ Thought Process", "  **step**"]);
    }

    #[test]
    fn app_errors_are_prefixed() {
        let mut app = test_app();
        app.ui.messages.push(Message::app_error("HTTP 422\nbad input"));
        let rows = transcript(&mut app);
        assert_eq!(rows, vec!["⚠ HTTP 422", "  bad input"]);
    }

    #[test]
    fn pulse_cycles_through_symbols() {
        assert_eq!(pulse_symbol(Duration::from_millis(0)), "○");
        assert_eq!(pulse_symbol(Duration::from_millis(250)), "◐");
        assert_eq!(pulse_symbol(Duration::from_millis(450)), "●");
        assert_eq!(pulse_symbol(Duration::from_millis(1000)), "○");
    }

    #[test]
    fn frame_reports_scroll_and_dropdown() {
        let mut app = test_app();
        for i in 0..30 {
            app.ui.messages.push(Message::user(format!("question {i}")));
        }
        app.tools_dropdown.toggle();

        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        let mut layout = RenderLayout::default();
        terminal
            .draw(|f| layout = ui(f, &mut app))
            .expect("draw");

        // 30 entries plus 29 separators in a 16-row transcript.
        assert_eq!(layout.max_scroll, 59 - 16);
        let area = layout.dropdown_area.expect("dropdown area");
        assert_eq!(area.height, 3);
        assert_eq!(area.y + area.height, 17);
    }
}
