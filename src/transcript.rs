//! Chat transcript types.
//!
//! A [`Transcript`] is the ordered list of messages exchanged in one follow-up
//! conversation. It is owned by the chat view; the widgets only read it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The patient.
    User,
    /// The follow-up assistant.
    Ai,
}

impl Role {
    /// Speaker label used when a transcript is flattened into prompt text.
    #[must_use]
    pub fn speaker_label(self) -> &'static str {
        match self {
            Self::User => "用户",
            Self::Ai => "AI",
        }
    }
}

/// A single chat message. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn ai(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Ai,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("duplicate message id {0} in transcript")]
    DuplicateId(u64),
}

/// Ordered messages with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, rejecting an id already present.
    pub fn push(&mut self, message: Message) -> Result<(), TranscriptError> {
        if self.messages.iter().any(|m| m.id == message.id) {
            return Err(TranscriptError::DuplicateId(message.id));
        }
        self.messages.push(message);
        Ok(())
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Flatten into `speaker: content` lines joined by newlines.
    #[must_use]
    pub fn to_prompt_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.speaker_label(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TryFrom<Vec<Message>> for Transcript {
    type Error = TranscriptError;

    fn try_from(messages: Vec<Message>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(messages.len());
        for m in &messages {
            if !seen.insert(m.id) {
                return Err(TranscriptError::DuplicateId(m.id));
            }
        }
        Ok(Self { messages })
    }
}

impl<'de> Deserialize<'de> for Transcript {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let messages = Vec::<Message>::deserialize(deserializer)?;
        Self::try_from(messages).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text_labels_speakers() {
        let t = Transcript::try_from(vec![
            Message::user(1, "最近头有点晕"),
            Message::ai(2, "请问持续多久了？"),
        ])
        .unwrap();
        assert_eq!(t.to_prompt_text(), "用户: 最近头有点晕\nAI: 请问持续多久了？");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Transcript::try_from(vec![Message::user(1, "a"), Message::ai(1, "b")]).unwrap_err();
        assert_eq!(err, TranscriptError::DuplicateId(1));

        let mut t = Transcript::new();
        t.push(Message::user(7, "hi")).unwrap();
        assert_eq!(t.push(Message::ai(7, "hey")), Err(TranscriptError::DuplicateId(7)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_deserialize_from_json_array() {
        let t: Transcript = serde_json::from_str(
            r#"[{"id":1,"role":"user","content":"Hello"},{"id":2,"role":"ai","content":"Hi"}]"#,
        )
        .unwrap();
        assert_eq!(t.last().map(|m| m.id), Some(2));
        assert_eq!(t.messages()[0].role, Role::User);

        let dup = serde_json::from_str::<Transcript>(
            r#"[{"id":1,"role":"user","content":"a"},{"id":1,"role":"ai","content":"b"}]"#,
        );
        assert!(dup.is_err());
    }
}
