//! # Thread Source
//!
//! The layout engine pulls messages and label texts through [`ThreadSource`].
//! [`MessageThread`] is the in-memory implementation the binary loads from a
//! JSON file.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::core::date_format;
use crate::core::message::{Message, Sender};

/// Pull-model access to the messages of one thread.
pub trait ThreadSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn message(&self, index: usize) -> Option<&Message>;

    /// The local user. Their messages are outgoing.
    fn current_sender(&self) -> &Sender;

    fn is_from_current_sender(&self, message: &Message) -> bool {
        message.sender.id == self.current_sender().id
    }

    /// Centered label above the cell, typically a date separator.
    fn cell_top_label(&self, _index: usize) -> Option<String> {
        None
    }

    fn cell_bottom_label(&self, _index: usize) -> Option<String> {
        None
    }

    /// Label directly above the bubble, typically the sender name.
    fn message_top_label(&self, _index: usize) -> Option<String> {
        None
    }

    fn message_bottom_label(&self, _index: usize) -> Option<String> {
        None
    }

    /// Timestamp shown beside the bubble.
    fn message_timestamp_label(&self, _index: usize) -> Option<String> {
        None
    }
}

#[derive(Debug)]
pub enum ThreadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ThreadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadError::Io(e) => write!(f, "thread I/O error: {e}"),
            ThreadError::Parse(e) => write!(f, "thread parse error: {e}"),
        }
    }
}

impl std::error::Error for ThreadError {}

/// On-disk shape of a thread file.
#[derive(Debug, Serialize, Deserialize)]
struct ThreadFile {
    current_sender: Sender,
    messages: Vec<Message>,
}

const DEMO_THREAD: &str = include_str!("../../assets/demo_thread.json");

#[derive(Debug, Clone)]
pub struct MessageThread {
    messages: Vec<Message>,
    current_sender: Sender,
    utc_offset: FixedOffset,
    /// Reference instant for "Today"/"Yesterday" labels.
    now: DateTime<Utc>,
}

impl MessageThread {
    pub fn new(current_sender: Sender, messages: Vec<Message>) -> Self {
        Self {
            messages,
            current_sender,
            utc_offset: Utc.fix(),
            now: Utc::now(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ThreadError> {
        let file: ThreadFile = serde_json::from_str(json).map_err(ThreadError::Parse)?;
        log::debug!(
            "Parsed thread with {} messages for {}",
            file.messages.len(),
            file.current_sender.display_name
        );
        Ok(Self::new(file.current_sender, file.messages))
    }

    pub fn load(path: &Path) -> Result<Self, ThreadError> {
        let contents = fs::read_to_string(path).map_err(ThreadError::Io)?;
        let thread = Self::from_json(&contents)?;
        log::info!("Loaded thread from {}", path.display());
        Ok(thread)
    }

    /// The bundled sample conversation.
    pub fn demo() -> Self {
        match Self::from_json(DEMO_THREAD) {
            Ok(thread) => thread,
            Err(e) => {
                log::error!("Bundled demo thread is invalid: {e}");
                Self::new(Sender::new("me", "Me"), Vec::new())
            }
        }
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn previous(&self, index: usize) -> Option<&Message> {
        index.checked_sub(1).and_then(|i| self.messages.get(i))
    }
}

impl ThreadSource for MessageThread {
    fn len(&self) -> usize {
        self.messages.len()
    }

    fn message(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    fn current_sender(&self) -> &Sender {
        &self.current_sender
    }

    /// Date separator whenever the calendar day changes.
    fn cell_top_label(&self, index: usize) -> Option<String> {
        let message = self.messages.get(index)?;
        let starts_day = match self.previous(index) {
            Some(prev) => {
                !date_format::is_same_day(&prev.sent_at, &message.sent_at, &self.utc_offset)
            }
            None => true,
        };
        starts_day.then(|| {
            date_format::day_label(
                &message.sent_at.with_timezone(&self.utc_offset),
                &self.now.with_timezone(&self.utc_offset),
            )
        })
    }

    fn cell_bottom_label(&self, index: usize) -> Option<String> {
        let message = self.messages.get(index)?;
        message.is_internal.then(|| "Internal note".to_string())
    }

    /// Sender name on the first incoming message of a run.
    fn message_top_label(&self, index: usize) -> Option<String> {
        let message = self.messages.get(index)?;
        if self.is_from_current_sender(message) {
            return None;
        }
        let new_run = self
            .previous(index)
            .is_none_or(|prev| prev.sender.id != message.sender.id);
        new_run.then(|| message.sender.display_name.clone())
    }

    fn message_bottom_label(&self, index: usize) -> Option<String> {
        let message = self.messages.get(index)?;
        message.edited.then(|| "Edited".to_string())
    }

    fn message_timestamp_label(&self, index: usize) -> Option<String> {
        let message = self.messages.get(index)?;
        Some(date_format::message_time(
            &message.sent_at.with_timezone(&self.utc_offset),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    fn thread() -> MessageThread {
        let me = Sender::new("me", "Me");
        let ada = Sender::new("ada", "Ada Lovelace");
        let mut edited = Message::text(me.clone(), at(14, 9, 5), "edited reply");
        edited.edited = true;
        MessageThread::new(
            me.clone(),
            vec![
                Message::text(ada.clone(), at(13, 22, 0), "late night"),
                Message::text(ada.clone(), at(14, 9, 0), "morning"),
                Message::text(ada, at(14, 9, 1), "again"),
                edited,
            ],
        )
        .with_now(at(14, 18, 0))
    }

    #[test]
    fn test_len_and_lookup() {
        let thread = thread();
        assert_eq!(thread.len(), 4);
        assert!(!thread.is_empty());
        assert!(thread.message(4).is_none());
    }

    #[test]
    fn test_cell_top_label_marks_day_changes() {
        let thread = thread();
        assert_eq!(thread.cell_top_label(0).as_deref(), Some("Yesterday"));
        assert_eq!(thread.cell_top_label(1).as_deref(), Some("Today"));
        assert_eq!(thread.cell_top_label(2), None);
    }

    #[test]
    fn test_message_top_label_on_first_incoming_of_run() {
        let thread = thread();
        assert_eq!(thread.message_top_label(0).as_deref(), Some("Ada Lovelace"));
        assert_eq!(thread.message_top_label(1), None);
        assert_eq!(thread.message_top_label(2), None);
        assert_eq!(thread.message_top_label(3), None);
    }

    #[test]
    fn test_bottom_and_timestamp_labels() {
        let thread = thread();
        assert_eq!(thread.message_bottom_label(3).as_deref(), Some("Edited"));
        assert_eq!(thread.message_bottom_label(2), None);
        assert_eq!(thread.message_timestamp_label(1).as_deref(), Some("9:00 AM"));
        assert_eq!(thread.message_timestamp_label(9), None);
    }

    #[test]
    fn test_outgoing_detection() {
        let thread = thread();
        let outgoing = thread.message(3).unwrap();
        let incoming = thread.message(0).unwrap();
        assert!(thread.is_from_current_sender(outgoing));
        assert!(!thread.is_from_current_sender(incoming));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = MessageThread::from_json("{not json").unwrap_err();
        assert!(matches!(err, ThreadError::Parse(_)));
    }

    #[test]
    fn test_demo_thread_loads() {
        let demo = MessageThread::demo();
        assert!(demo.len() >= 8);
    }
}
