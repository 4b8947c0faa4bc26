//! Key and mouse handling for the chat view.
//!
//! Handlers mutate the app synchronously and report what the event loop has
//! to do next; spawning the stream task stays in the loop.

use crate::core::app::App;
use crate::core::chat_stream::StreamParams;
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tui_textarea::{CursorMove, Input as TAInput, Key as TAKey};

const WHEEL_STEP: u16 = 3;
// Title row plus the bordered single-line input.
const CHROME_ROWS: u16 = 4;

pub enum KeyOutcome {
    Ignored,
    Redraw,
    Submit(StreamParams),
    Quit,
}

pub fn handle_key_event(app: &mut App, key: &KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        app.ui.exit_requested = true;
        return KeyOutcome::Quit;
    }

    if app.tools_dropdown.is_open() {
        return handle_dropdown_keys(app, key);
    }

    match key.code {
        KeyCode::Esc => {
            if app.stop() {
                KeyOutcome::Redraw
            } else {
                KeyOutcome::Ignored
            }
        }
        KeyCode::Char('t') if ctrl => {
            app.tools_dropdown.toggle();
            KeyOutcome::Redraw
        }
        KeyCode::Char('o') if ctrl => {
            if app.ui.toggle_latest_thought() {
                KeyOutcome::Redraw
            } else {
                KeyOutcome::Ignored
            }
        }
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
        {
            app.ui.textarea_mut().insert_newline();
            KeyOutcome::Redraw
        }
        KeyCode::Enter => match app.submit_input() {
            Some(params) => KeyOutcome::Submit(params),
            None => KeyOutcome::Ignored,
        },
        // Multi-line input keeps Up/Down for the cursor; Ctrl+Up/Down still scroll.
        KeyCode::Up | KeyCode::Down if !ctrl && app.ui.input_line_count() > 1 => {
            app.ui.textarea_mut().input(TAInput::from(*key));
            KeyOutcome::Redraw
        }
        _ => {
            if handle_navigation_keys(app, key.code) {
                KeyOutcome::Redraw
            } else if handle_textarea_editing_keys(app, key) {
                KeyOutcome::Redraw
            } else {
                KeyOutcome::Ignored
            }
        }
    }
}

fn handle_dropdown_keys(app: &mut App, key: &KeyEvent) -> KeyOutcome {
    let len = app.available_tools.len();
    match key.code {
        KeyCode::Esc => app.tools_dropdown.close(),
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.tools_dropdown.close()
        }
        KeyCode::Up => app.tools_dropdown.select_previous(len),
        KeyCode::Down => app.tools_dropdown.select_next(len),
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_selected_tool();
        }
        _ => return KeyOutcome::Ignored,
    }
    KeyOutcome::Redraw
}

/// Transcript scrolling: Up/Down by a line, PageUp/PageDown by a screen,
/// Home/End to either edge.
fn handle_navigation_keys(app: &mut App, key_code: KeyCode) -> bool {
    let page = app
        .ui
        .last_term_size
        .height
        .saturating_sub(CHROME_ROWS)
        .max(1);
    let scroll = &mut app.ui.scroll;
    match key_code {
        KeyCode::Up => scroll.scroll_up(1),
        KeyCode::Down => scroll.scroll_down(1),
        KeyCode::PageUp => scroll.scroll_up(page),
        KeyCode::PageDown => scroll.scroll_down(page),
        KeyCode::Home => scroll.scroll_to_top(),
        KeyCode::End => scroll.scroll_to_bottom(),
        _ => return false,
    }
    true
}

fn handle_textarea_editing_keys(app: &mut App, key: &KeyEvent) -> bool {
    let textarea = app.ui.textarea_mut();
    match key.code {
        KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Left | KeyCode::Right => {
            textarea.input(TAInput::from(*key));
            true
        }
        KeyCode::Delete => {
            textarea.input_without_shortcuts(TAInput {
                key: TAKey::Delete,
                ctrl: false,
                alt: false,
                shift: false,
            });
            true
        }
        KeyCode::Tab => {
            textarea.insert_str("    ");
            true
        }
        _ => false,
    }
}

pub fn handle_mouse_event(app: &mut App, mouse: &MouseEvent) -> KeyOutcome {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.ui.scroll.scroll_up(WHEEL_STEP);
            KeyOutcome::Redraw
        }
        MouseEventKind::ScrollDown => {
            app.ui.scroll.scroll_down(WHEEL_STEP);
            KeyOutcome::Redraw
        }
        MouseEventKind::Down(MouseButton::Left) if app.tools_dropdown.is_open() => {
            let inside = app.tools_dropdown.handle_click(mouse.column, mouse.row);
            if let Some(index) = inside
                .then(|| app.tools_dropdown.row_at(mouse.row))
                .flatten()
            {
                app.toggle_tool_at(index);
            }
            KeyOutcome::Redraw
        }
        _ => KeyOutcome::Ignored,
    }
}

/// Insert pasted text, dropping control characters other than newlines.
pub fn handle_paste(app: &mut App, text: &str) {
    let sanitized: String = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect();
    let textarea = app.ui.textarea_mut();
    textarea.insert_str(sanitized);
    textarea.move_cursor(CursorMove::End);
}
