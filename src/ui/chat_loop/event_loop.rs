use std::{error::Error, io, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::keybindings::{handle_key_event, handle_mouse_event, handle_paste, KeyOutcome};
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use crate::core::app::App;
use crate::core::chat_stream::ChatStreamService;
use crate::ui::renderer::{ui, RenderLayout};

const MAX_FPS: u64 = 30;

enum UiEvent {
    Crossterm(Event),
}

async fn draw_frame(app: &mut App, terminal: &SharedTerminal) -> io::Result<()> {
    let mut terminal_guard = terminal.lock().await;
    let mut layout = RenderLayout::default();
    terminal_guard.draw(|f| layout = ui(f, app))?;
    app.ui.last_term_size = terminal_guard.size()?;
    apply_layout(app, layout);
    Ok(())
}

/// Feed geometry from the last frame back into the state that depends on it.
fn apply_layout(app: &mut App, layout: RenderLayout) {
    app.ui.scroll.set_max_offset(layout.max_scroll);
    if let Some(area) = layout.dropdown_area {
        app.tools_dropdown.set_area(area);
    }
}

/// Apply one terminal event. Returns true when the frame needs redrawing.
fn process_ui_event(app: &mut App, event: UiEvent, stream_service: &ChatStreamService) -> bool {
    match event {
        UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            match handle_key_event(app, &key) {
                KeyOutcome::Ignored => false,
                KeyOutcome::Redraw | KeyOutcome::Quit => true,
                KeyOutcome::Submit(params) => {
                    stream_service.spawn_stream(params);
                    true
                }
            }
        }
        UiEvent::Crossterm(Event::Mouse(mouse)) => {
            !matches!(handle_mouse_event(app, &mouse), KeyOutcome::Ignored)
        }
        UiEvent::Crossterm(Event::Paste(text)) => {
            handle_paste(app, &text);
            true
        }
        UiEvent::Crossterm(Event::Resize(_, _)) => true,
        UiEvent::Crossterm(_) => false,
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Run the interactive chat view until the user quits.
pub async fn run_chat(mut app: App, reveal_interval: Duration) -> Result<(), Box<dyn Error>> {
    let terminal = setup_terminal()?;
    info!(url = %app.session.answer_url(), "chat view started");

    let (stream_service, mut rx) = ChatStreamService::new();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let mut reveal = tokio::time::interval(reveal_interval);
    reveal.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut pulse = tokio::time::interval(Duration::from_millis(1000 / MAX_FPS));
    pulse.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = loop {
        if request_redraw {
            if let Err(err) = draw_frame(&mut app, &terminal).await {
                break Err(err.into());
            }
            request_redraw = false;
        }

        if app.ui.exit_requested {
            break Ok(());
        }

        tokio::select! {
            Some(ev) = event_rx.recv() => {
                request_redraw |= process_ui_event(&mut app, ev, &stream_service);
            }
            Some((message, stream_id)) = rx.recv() => {
                request_redraw |= app.handle_stream_message(message, stream_id);
            }
            _ = reveal.tick(), if app.is_loading() => {
                request_redraw |= app.tick();
            }
            _ = pulse.tick(), if app.is_loading() => {
                request_redraw = true;
            }
            else => break Ok(()),
        }
    };

    if app.stop() {
        debug!("stopped live turn on exit");
    }
    event_reader_handle.abort();
    restore_terminal(&terminal).await?;
    info!("chat view closed");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::AppInitConfig;
    use crate::core::chat_stream::StreamMessage;
    use crate::core::config::Config;
    use crate::core::message::TranscriptRole;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::layout::Rect;

    fn setup_app() -> App {
        let init = AppInitConfig {
            // Nothing listens here; spawned streams fail fast.
            base_url: Some("http://127.0.0.1:9".into()),
            ..Default::default()
        };
        App::new(init, &Config::default())
    }

    fn press(code: KeyCode) -> UiEvent {
        UiEvent::Crossterm(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn layout_feeds_back_scroll_and_dropdown_area() {
        let mut app = setup_app();
        app.tools_dropdown.toggle();
        let area = Rect::new(0, 5, 16, 3);
        apply_layout(
            &mut app,
            RenderLayout {
                max_scroll: 12,
                dropdown_area: Some(area),
            },
        );
        assert_eq!(app.ui.scroll.max_offset(), 12);
        assert_eq!(app.tools_dropdown.area(), Some(area));
    }

    #[test]
    fn resize_and_paste_request_redraw() {
        let mut app = setup_app();
        let (service, _rx) = ChatStreamService::new();
        assert!(process_ui_event(
            &mut app,
            UiEvent::Crossterm(Event::Resize(80, 24)),
            &service
        ));
        assert!(process_ui_event(
            &mut app,
            UiEvent::Crossterm(Event::Paste("pasted".into())),
            &service
        ));
        assert_eq!(app.ui.get_input_text(), "pasted");
        assert!(!process_ui_event(
            &mut app,
            UiEvent::Crossterm(Event::FocusGained),
            &service
        ));
    }

    #[tokio::test]
    async fn submitting_spawns_a_stream_that_reports_failure() {
        let mut app = setup_app();
        let (service, mut rx) = ChatStreamService::new();
        for ch in "hi".chars() {
            process_ui_event(&mut app, press(KeyCode::Char(ch)), &service);
        }
        assert!(process_ui_event(&mut app, press(KeyCode::Enter), &service));
        assert!(app.is_loading());

        let (message, stream_id) = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("stream event")
            .expect("channel open");
        assert!(matches!(message, StreamMessage::Error(_)));
        app.handle_stream_message(message, stream_id);

        assert!(!app.is_loading());
        assert_eq!(
            app.ui.messages.last().map(|m| m.role),
            Some(TranscriptRole::AppError)
        );
    }
}
