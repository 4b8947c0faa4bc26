use std::fmt;

use crate::core::reveal::Channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptRole {
    User,
    Assistant,
    AppInfo,
    AppError,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
            TranscriptRole::AppInfo => "app/info",
            TranscriptRole::AppError => "app/error",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == TranscriptRole::Assistant
    }

    pub fn is_app(self) -> bool {
        matches!(self, TranscriptRole::AppInfo | TranscriptRole::AppError)
    }
}

impl fmt::Display for TranscriptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity for app-authored notices rendered in the transcript but never
/// sent to the answering service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppMessageKind {
    Info,
    Error,
}

impl AppMessageKind {
    pub fn as_role(self) -> TranscriptRole {
        match self {
            AppMessageKind::Info => TranscriptRole::AppInfo,
            AppMessageKind::Error => TranscriptRole::AppError,
        }
    }
}

/// One transcript entry.
///
/// `content` and `thought` only ever grow while `streaming` is true and are
/// frozen once it flips to false.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    pub role: TranscriptRole,
    pub content: String,
    /// Interim reasoning revealed on the thought channel (assistant only).
    pub thought: String,
    pub streaming: bool,
    pub show_thought: bool,
    pub thought_expanded: bool,
}

impl Message {
    pub fn new(role: TranscriptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            thought: String::new(),
            streaming: false,
            show_thought: false,
            thought_expanded: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::User, content)
    }

    /// Empty assistant placeholder that the reveal loop fills in.
    pub fn assistant_placeholder() -> Self {
        Self {
            streaming: true,
            ..Self::new(TranscriptRole::Assistant, String::new())
        }
    }

    pub fn app(kind: AppMessageKind, content: impl Into<String>) -> Self {
        Self::new(kind.as_role(), content)
    }

    pub fn app_error(content: impl Into<String>) -> Self {
        Self::app(AppMessageKind::Error, content)
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }

    pub fn is_app(&self) -> bool {
        self.role.is_app()
    }

    pub fn has_thought(&self) -> bool {
        !self.thought.is_empty()
    }

    /// Stop streaming and keep whatever text was revealed so far.
    ///
    /// The thought block stays visible and expanded if any reasoning arrived.
    pub fn freeze(&mut self) {
        self.streaming = false;
        let has_thought = self.has_thought();
        self.show_thought = has_thought;
        self.thought_expanded = has_thought;
    }

    /// Final state after the service signalled completion and every buffered
    /// character has been revealed.
    pub fn complete(&mut self) {
        self.streaming = false;
        self.show_thought = self.has_thought();
        self.thought_expanded = true;
    }

    /// Append revealed text to the field `channel` names.
    ///
    /// Thought text forces the thought block open. Frozen messages are left
    /// untouched.
    pub fn reveal(&mut self, channel: Channel, text: &str) {
        if !self.streaming {
            return;
        }
        match channel {
            Channel::Content => self.content.push_str(text),
            Channel::Thought => {
                self.thought.push_str(text);
                self.show_thought = true;
                self.thought_expanded = true;
            }
        }
    }

    pub fn toggle_thought(&mut self) {
        if self.show_thought {
            self.thought_expanded = !self.thought_expanded;
        }
    }
}
