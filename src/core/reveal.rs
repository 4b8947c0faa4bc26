//! Character-drip buffer behind the typing animation.
//!
//! Incoming fragments are queued as `(Channel, text)` segments and drained a
//! few characters at a time. The channel is carried by the segment itself, so
//! fragment text can never be mistaken for a channel marker.

use std::collections::VecDeque;

/// Which field of the assistant message a character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Content,
    Thought,
}

impl Channel {
    pub fn from_thought_flag(thought: bool) -> Self {
        if thought {
            Channel::Thought
        } else {
            Channel::Content
        }
    }
}

#[derive(Debug, Clone)]
struct Segment {
    channel: Channel,
    // Characters not yet revealed, front first.
    text: VecDeque<char>,
}

/// A run of characters drained from the buffer in one step, all on one
/// channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revealed {
    pub channel: Channel,
    pub text: String,
}

#[derive(Debug, Default, Clone)]
pub struct RevealBuffer {
    segments: VecDeque<Segment>,
    pending_chars: usize,
}

impl RevealBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fragment. Empty fragments are ignored.
    pub fn push(&mut self, channel: Channel, text: &str) {
        if text.is_empty() {
            return;
        }
        let chars: VecDeque<char> = text.chars().collect();
        self.pending_chars += chars.len();

        // Consecutive fragments on the same channel share a segment.
        if let Some(last) = self.segments.back_mut() {
            if last.channel == channel {
                last.text.extend(chars);
                return;
            }
        }
        self.segments.push_back(Segment {
            channel,
            text: chars,
        });
    }

    /// Drain up to `max_chars` characters.
    ///
    /// The result is grouped by channel in drain order; a channel switch in
    /// the middle of a step yields two runs.
    pub fn drain(&mut self, max_chars: usize) -> Vec<Revealed> {
        let mut out: Vec<Revealed> = Vec::new();
        let mut budget = max_chars;

        while budget > 0 {
            let Some(segment) = self.segments.front_mut() else {
                break;
            };
            let Some(ch) = segment.text.pop_front() else {
                self.segments.pop_front();
                continue;
            };
            budget -= 1;
            self.pending_chars -= 1;

            match out.last_mut() {
                Some(run) if run.channel == segment.channel => run.text.push(ch),
                _ => out.push(Revealed {
                    channel: segment.channel,
                    text: ch.to_string(),
                }),
            }

            if segment.text.is_empty() {
                self.segments.pop_front();
            }
        }

        out
    }

    /// Forget every pending character.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.pending_chars = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.pending_chars == 0
    }

    pub fn len(&self) -> usize {
        self.pending_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_all(buffer: &mut RevealBuffer, step: usize) -> (String, String) {
        let mut content = String::new();
        let mut thought = String::new();
        while !buffer.is_empty() {
            for run in buffer.drain(step) {
                match run.channel {
                    Channel::Content => content.push_str(&run.text),
                    Channel::Thought => thought.push_str(&run.text),
                }
            }
        }
        (content, thought)
    }

    #[test]
    fn drains_one_character_per_step() {
        let mut buffer = RevealBuffer::new();
        buffer.push(Channel::Content, "Hi");
        assert_eq!(buffer.len(), 2);

        let first = buffer.drain(1);
        assert_eq!(
            first,
            vec![Revealed {
                channel: Channel::Content,
                text: "H".into()
            }]
        );
        assert_eq!(buffer.drain(1)[0].text, "i");
        assert!(buffer.is_empty());
        assert!(buffer.drain(1).is_empty());
    }

    #[test]
    fn interleaved_channels_keep_their_characters() {
        let mut buffer = RevealBuffer::new();
        buffer.push(Channel::Thought, "let me ");
        buffer.push(Channel::Content, "The ");
        buffer.push(Channel::Thought, "think");
        buffer.push(Channel::Content, "answer");

        for step in [1, 3, 100] {
            let mut copy = buffer.clone();
            let (content, thought) = drain_all(&mut copy, step);
            assert_eq!(content, "The answer");
            assert_eq!(thought, "let me think");
        }
    }

    #[test]
    fn marker_like_text_is_plain_text() {
        let mut buffer = RevealBuffer::new();
        buffer.push(Channel::Content, "THOUGHT:not a thought");
        buffer.push(Channel::Thought, "CONTENT:");
        let (content, thought) = drain_all(&mut buffer, 4);
        assert_eq!(content, "THOUGHT:not a thought");
        assert_eq!(thought, "CONTENT:");
    }

    #[test]
    fn step_spanning_a_channel_switch_yields_two_runs() {
        let mut buffer = RevealBuffer::new();
        buffer.push(Channel::Thought, "ab");
        buffer.push(Channel::Content, "cd");
        let runs = buffer.drain(3);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].channel, Channel::Thought);
        assert_eq!(runs[0].text, "ab");
        assert_eq!(runs[1].channel, Channel::Content);
        assert_eq!(runs[1].text, "c");
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn multibyte_characters_are_revealed_whole() {
        let mut buffer = RevealBuffer::new();
        buffer.push(Channel::Content, "héllo 👋");
        let (content, _) = drain_all(&mut buffer, 1);
        assert_eq!(content, "héllo 👋");
    }

    #[test]
    fn clear_drops_pending_characters() {
        let mut buffer = RevealBuffer::new();
        buffer.push(Channel::Thought, "pending");
        buffer.drain(1);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.drain(5).is_empty());
    }
}
