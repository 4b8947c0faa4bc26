use tracing::{debug, error, info, warn};

use super::App;
use crate::api::AnswerRequest;
use crate::core::chat_stream::{StreamMessage, StreamParams};
use crate::core::message::{AppMessageKind, Message};
use crate::core::turn::TurnProgress;

impl App {
    /// Submit whatever is in the input box.
    pub fn submit_input(&mut self) -> Option<StreamParams> {
        if self.is_loading() {
            return None;
        }
        let text = self.ui.get_input_text();
        let params = self.submit_question(&text)?;
        self.ui.clear_input();
        Some(params)
    }

    /// Start a turn for `question`.
    ///
    /// Whitespace-only questions are ignored. Any live turn is torn down
    /// first. The returned parameters must be handed to the stream service.
    pub fn submit_question(&mut self, question: &str) -> Option<StreamParams> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        if let Some(message) = self.ui.streaming_message_mut() {
            message.freeze();
        }
        let (cancel_token, stream_id) = self.turn.begin_turn();

        self.ui.messages.push(Message::user(question));
        self.ui.messages.push(Message::assistant_placeholder());
        self.ui.scroll.scroll_to_bottom();
        self.ui.pulse_start = std::time::Instant::now();

        let request = AnswerRequest::new(question, self.tools.to_request());
        info!(stream_id, tools = ?request.tools, "submitting question");

        Some(StreamParams {
            client: self.session.client.clone(),
            url: self.session.answer_url(),
            request,
            cancel_token,
            stream_id,
        })
    }

    /// Abort the live turn, keeping whatever text was already revealed.
    pub fn stop(&mut self) -> bool {
        let message = self.ui.streaming_message_mut();
        let stopped = self.turn.cancel(message);
        if stopped {
            debug!(stream_id = self.turn.stream_id(), "turn stopped by user");
        }
        stopped
    }

    /// Apply one event from the stream service. Returns true when the view
    /// needs a redraw.
    pub fn handle_stream_message(&mut self, message: StreamMessage, stream_id: u64) -> bool {
        if !self.turn.is_current(stream_id) {
            debug!(stream_id, "dropping event from stale stream");
            return false;
        }

        match message {
            StreamMessage::Fragment { text, channel } => {
                self.turn.on_fragment(channel, &text);
                false
            }
            StreamMessage::Complete | StreamMessage::End => {
                let Some(assistant) = self.ui.streaming_message_mut() else {
                    return false;
                };
                self.turn.on_complete(assistant) == TurnProgress::Finished
            }
            StreamMessage::Malformed(payload) => {
                warn!(stream_id, payload = %payload, "skipping malformed answer event");
                let Some(assistant) = self.ui.streaming_message_mut() else {
                    return false;
                };
                if self.turn.on_malformed(assistant) != TurnProgress::Finished {
                    return false;
                }
                self.ui.messages.push(Message::app(
                    AppMessageKind::Info,
                    "The answer ended early: the service sent an unreadable event.",
                ));
                true
            }
            StreamMessage::Error(text) => {
                error!(stream_id, "answer stream failed: {text}");
                if let Some(assistant) = self.ui.streaming_message_mut() {
                    self.turn.on_error(assistant);
                }
                self.ui.messages.push(Message::app_error(text));
                true
            }
        }
    }

    /// Advance the reveal animation by one tick. Returns true when visible
    /// text or state changed.
    pub fn tick(&mut self) -> bool {
        let chars_per_tick = self.session.reveal_chars_per_tick;
        let Some(assistant) = self.ui.streaming_message_mut() else {
            return false;
        };
        self.turn.tick(assistant, chars_per_tick) != TurnProgress::Unchanged
    }
}
