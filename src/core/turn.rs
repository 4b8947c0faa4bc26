//! Lifecycle of a single question/answer turn.
//!
//! [`TurnState`] owns everything that outlives a single event but not the
//! transcript itself: the reveal buffer, the cancellation token of the live
//! connection, and the stream id used to discard events from aborted
//! connections. Every transition takes the assistant message it acts on, so
//! the ordering rules can be exercised without a terminal.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::message::Message;
use crate::core::reveal::{Channel, RevealBuffer};

/// Observable phase of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    /// Connection open, nothing waiting to be revealed.
    Streaming,
    /// Connection finished, buffer still draining.
    Draining,
    /// Connection open and characters waiting to be revealed.
    StreamingAndDraining,
}

/// Result of feeding a reveal tick or stream event to the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnProgress {
    /// Nothing changed.
    Unchanged,
    /// Transcript text changed; the turn is still live.
    Updated,
    /// The turn ended with this step.
    Finished,
}

#[derive(Debug, Default)]
pub struct TurnState {
    buffer: RevealBuffer,
    cancel_token: Option<CancellationToken>,
    stream_id: u64,
    stream_open: bool,
    active: bool,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down whatever turn is live and start a new one.
    ///
    /// Returns the token the new connection must honour and its stream id.
    pub fn begin_turn(&mut self) -> (CancellationToken, u64) {
        self.teardown();

        self.stream_id += 1;
        let token = CancellationToken::new();
        self.cancel_token = Some(token.clone());
        self.stream_open = true;
        self.active = true;

        debug!(stream_id = self.stream_id, "turn started");
        (token, self.stream_id)
    }

    pub fn stream_id(&self) -> u64 {
        self.stream_id
    }

    /// Whether events tagged `stream_id` belong to the live turn.
    pub fn is_current(&self, stream_id: u64) -> bool {
        self.active && self.stream_id == stream_id
    }

    /// True from `begin_turn` until the turn completes, fails or is cancelled.
    pub fn is_loading(&self) -> bool {
        self.active
    }

    pub fn is_revealing(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn phase(&self) -> TurnPhase {
        match (self.active && self.stream_open, self.is_revealing()) {
            (false, false) => TurnPhase::Idle,
            (true, false) => TurnPhase::Streaming,
            (false, true) => TurnPhase::Draining,
            (true, true) => TurnPhase::StreamingAndDraining,
        }
    }

    pub fn pending_chars(&self) -> usize {
        self.buffer.len()
    }

    /// Queue a fragment for reveal.
    pub fn on_fragment(&mut self, channel: Channel, text: &str) {
        if !self.active || !self.stream_open {
            return;
        }
        self.buffer.push(channel, text);
    }

    /// The service signalled completion or closed the connection.
    ///
    /// The turn finishes right away when nothing is left to reveal, otherwise
    /// on the tick that empties the buffer.
    pub fn on_complete(&mut self, message: &mut Message) -> TurnProgress {
        if !self.active {
            return TurnProgress::Unchanged;
        }
        self.stream_open = false;
        self.cancel_token = None;
        self.finish_if_drained(message)
    }

    /// A payload could not be parsed.
    ///
    /// Skipped while a reveal is in progress; with nothing left to reveal the
    /// turn ends here.
    pub fn on_malformed(&mut self, message: &mut Message) -> TurnProgress {
        if !self.active || self.is_revealing() {
            return TurnProgress::Unchanged;
        }
        self.teardown();
        message.freeze();
        TurnProgress::Finished
    }

    /// Transport failure or fatal HTTP status. Ends the turn immediately.
    ///
    /// Text that already arrived is kept: the pending buffer is flushed into
    /// the message before it is frozen.
    pub fn on_error(&mut self, message: &mut Message) -> TurnProgress {
        if !self.active {
            return TurnProgress::Unchanged;
        }
        for run in self.buffer.drain(self.buffer.len()) {
            message.reveal(run.channel, &run.text);
        }
        self.teardown();
        message.freeze();
        TurnProgress::Finished
    }

    /// User-initiated stop. Idempotent: returns false when nothing was live.
    pub fn cancel(&mut self, message: Option<&mut Message>) -> bool {
        if !self.active {
            return false;
        }
        self.teardown();
        if let Some(message) = message {
            message.freeze();
        }
        debug!(stream_id = self.stream_id, "turn cancelled");
        true
    }

    /// Reveal up to `chars_per_tick` characters into `message`.
    pub fn tick(&mut self, message: &mut Message, chars_per_tick: usize) -> TurnProgress {
        if !self.active {
            return TurnProgress::Unchanged;
        }
        if self.buffer.is_empty() {
            return self.finish_if_drained(message);
        }

        for run in self.buffer.drain(chars_per_tick.max(1)) {
            message.reveal(run.channel, &run.text);
        }

        match self.finish_if_drained(message) {
            TurnProgress::Finished => TurnProgress::Finished,
            _ => TurnProgress::Updated,
        }
    }

    fn finish_if_drained(&mut self, message: &mut Message) -> TurnProgress {
        if self.stream_open || !self.buffer.is_empty() {
            return TurnProgress::Unchanged;
        }
        self.active = false;
        message.complete();
        debug!(stream_id = self.stream_id, "turn finished");
        TurnProgress::Finished
    }

    fn teardown(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.buffer.clear();
        self.stream_open = false;
        self.active = false;
    }
}
