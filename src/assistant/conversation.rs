//! Conversation log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::Model;
use crate::gateway::{ChatMessage, ChatRole};
use crate::locale::{Locale, Message};

/// How many prior turns accompany a chat request
pub const CONTEXT_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    /// Model that produced an assistant turn
    pub model: Option<Model>,
    pub timestamp: DateTime<Utc>,
}

/// Prior turn as sent to the chat function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    session_id: String,
    turns: Vec<Turn>,
}

impl Conversation {
    /// A fresh session opened by the assistant greeting
    pub fn new(locale: Locale) -> Self {
        let mut conversation = Self {
            session_id: format!("session_{}", uuid::Uuid::new_v4().simple()),
            turns: Vec::new(),
        };
        conversation.push(ChatRole::Assistant, locale.text(&Message::AssistantGreeting), None);
        conversation
    }

    /// Rebuild a session from stored messages
    pub fn resume(session_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        let turns = messages
            .into_iter()
            .map(|m| Turn {
                id: m.id,
                role: m.role,
                model: Model::parse(&m.model),
                content: m.content,
                timestamp: m.created_at,
            })
            .collect();

        Self {
            session_id: session_id.into(),
            turns,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push(&mut self, role: ChatRole, content: impl Into<String>, model: Option<Model>) -> &Turn {
        self.turns.push(Turn {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            model,
            timestamp: Utc::now(),
        });
        &self.turns[self.turns.len() - 1]
    }

    /// The last [`CONTEXT_WINDOW`] turns, oldest first
    pub fn context(&self) -> Vec<ContextMessage> {
        let start = self.turns.len().saturating_sub(CONTEXT_WINDOW);
        self.turns[start..]
            .iter()
            .map(|t| ContextMessage {
                role: t.role,
                content: t.content.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_starts_with_greeting() {
        let conversation = Conversation::new(Locale::ZhCn);
        assert!(conversation.session_id().starts_with("session_"));
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.turns()[0].role, ChatRole::Assistant);
    }

    #[test]
    fn test_context_is_last_ten_in_order() {
        let mut conversation = Conversation::new(Locale::En);
        for i in 0..15 {
            conversation.push(ChatRole::User, format!("q{}", i), None);
        }

        let context = conversation.context();
        assert_eq!(context.len(), CONTEXT_WINDOW);
        assert_eq!(context[0].content, "q5");
        assert_eq!(context[9].content, "q14");
    }

    #[test]
    fn test_resume_keeps_stored_order() {
        let stored: Vec<ChatMessage> = serde_json::from_value(serde_json::json!([
            {"id": "1", "session_id": "s", "role": "user", "content": "hi",
             "model": "", "created_at": "2024-05-01T00:00:00Z"},
            {"id": "2", "session_id": "s", "role": "assistant", "content": "hello",
             "model": "gpt-5-thinking", "created_at": "2024-05-01T00:00:01Z"}
        ]))
        .unwrap();

        let conversation = Conversation::resume("s", stored);
        assert_eq!(conversation.session_id(), "s");
        assert_eq!(conversation.turns()[0].model, None);
        assert_eq!(conversation.turns()[1].model, Some(Model::Gpt5Thinking));
    }
}
