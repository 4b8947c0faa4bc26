use futures_util::StreamExt;
use memchr::memchr;
use reqwest::StatusCode;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{AnswerEvent, AnswerRequest};
use crate::core::reveal::Channel;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    /// Non-empty text fragment for one channel.
    Fragment { text: String, channel: Channel },
    /// The service flagged the final event of the turn.
    Complete,
    /// A `data:` payload that is not a valid answer event.
    Malformed(String),
    /// Transport failure or fatal HTTP status.
    Error(String),
    /// The connection closed.
    End,
}

/// Incremental server-sent-event decoder.
///
/// Bytes are split into lines; `data:` fields accumulate until a blank line
/// dispatches the event. Comments and other fields are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event payload they completed.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            let line = match std::str::from_utf8(&self.buffer[..newline_pos]) {
                Ok(s) => s.trim_end_matches('\r').to_string(),
                Err(e) => {
                    warn!("invalid UTF-8 in answer stream: {e}");
                    self.buffer.drain(..=newline_pos);
                    continue;
                }
            };
            self.buffer.drain(..=newline_pos);

            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        events
    }

    /// Dispatch whatever is pending when the connection closes without a
    /// trailing blank line.
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = String::from_utf8_lossy(&std::mem::take(&mut self.buffer)).into_owned();
            if let Some(event) = self.process_line(rest.trim_end_matches('\r')) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        if let Some(payload) = extract_data_payload(line) {
            self.data.push(payload.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.data).join("\n"))
    }
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:")
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
}

/// Translate one event payload into stream messages.
///
/// Returns true when the payload ended the turn.
fn handle_data_payload(
    payload: &str,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
    stream_id: u64,
) -> bool {
    if payload.trim().is_empty() {
        return false;
    }

    match serde_json::from_str::<AnswerEvent>(payload) {
        Ok(event) => {
            if !event.content.is_empty() {
                let _ = tx.send((
                    StreamMessage::Fragment {
                        text: event.content,
                        channel: Channel::from_thought_flag(event.thought),
                    },
                    stream_id,
                ));
            }
            if event.is_complete {
                let _ = tx.send((StreamMessage::Complete, stream_id));
                let _ = tx.send((StreamMessage::End, stream_id));
                return true;
            }
            false
        }
        Err(e) => {
            debug!(stream_id, "failed to parse answer event: {e}");
            let _ = tx.send((StreamMessage::Malformed(payload.to_string()), stream_id));
            false
        }
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("detail").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                serde_json::Value::Array(items) => items
                    .first()
                    .and_then(|item| item.get("msg"))
                    .and_then(|msg| msg.as_str().map(str::to_owned)),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Render an error body as a transcript notice.
pub(crate) fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error:\n```\n<empty>\n```".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            if let Some(summary) = extract_error_summary(&json_value) {
                if !summary.is_empty() {
                    return format!("API Error: {}\n```json\n{}\n```", summary, pretty_json);
                }
            }
            return format!("API Error:\n```json\n{}\n```", pretty_json);
        }
    }

    if trimmed.starts_with('<') && trimmed.ends_with('>') {
        format!("API Error:\n```xml\n{}\n```", trimmed)
    } else {
        format!("API Error:\n```\n{}\n```", trimmed)
    }
}

/// Client errors other than 429 end the turn; everything else is read as a
/// stream on a best-effort basis.
fn is_fatal_status(status: StatusCode) -> bool {
    status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub url: String,
    pub request: AnswerRequest,
    pub cancel_token: tokio_util::sync::CancellationToken,
    pub stream_id: u64,
}

#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_stream(&self, params: StreamParams) {
        let tx_clone = self.tx.clone();
        tokio::spawn(async move {
            let StreamParams {
                client,
                url,
                request,
                cancel_token,
                stream_id,
            } = params;

            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    debug!(stream_id, "answer stream aborted");
                }
                _ = run_stream(&client, &url, &request, &tx_clone, stream_id) => {}
            }
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, stream_id: u64) {
        let _ = self.tx.send((message, stream_id));
    }
}

async fn run_stream(
    client: &reqwest::Client,
    url: &str,
    request: &AnswerRequest,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
    stream_id: u64,
) {
    debug!(stream_id, url, tools = ?request.tools, "opening answer stream");

    let response = match client
        .post(url)
        .header("Content-Type", "application/json")
        .header("Accept", "text/event-stream")
        .json(request)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            let _ = tx.send((StreamMessage::Error(format_api_error(&e.to_string())), stream_id));
            let _ = tx.send((StreamMessage::End, stream_id));
            return;
        }
    };

    let status = response.status();
    if is_fatal_status(status) {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        let formatted_error = format!("HTTP {status}\n{}", format_api_error(&error_text));
        let _ = tx.send((StreamMessage::Error(formatted_error), stream_id));
        let _ = tx.send((StreamMessage::End, stream_id));
        return;
    }
    if !status.is_success() {
        warn!(stream_id, %status, "answer service returned non-success status");
    }

    let mut stream = response.bytes_stream();
    let mut decoder = SseDecoder::new();

    while let Some(chunk) = stream.next().await {
        let chunk_bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tx.send((
                    StreamMessage::Error(format_api_error(&e.to_string())),
                    stream_id,
                ));
                let _ = tx.send((StreamMessage::End, stream_id));
                return;
            }
        };

        for payload in decoder.feed(&chunk_bytes) {
            if handle_data_payload(&payload, tx, stream_id) {
                return;
            }
        }
    }

    if let Some(payload) = decoder.finish() {
        if handle_data_payload(&payload, tx, stream_id) {
            return;
        }
    }

    let _ = tx.send((StreamMessage::End, stream_id));
}
