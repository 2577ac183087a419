//! AI Assistant
//!
//! Chat with a selectable model through the `ai-chat` edge function.
//!
//! ## Architecture
//!
//! - **Models**: catalog of display/API names and offline replies
//! - **Conversation**: session id and turn log, source of request context
//! - **Assistant**: prompt routing (chat or canvas document) and fallbacks

mod chat;
mod conversation;
mod models;

pub use chat::{
    Assistant, AssistantReply, ChatBackend, ChatReply, ChatRequest, GeneratedDocument, Prompt,
    CANVAS_PREFIX, CANVAS_TITLE_CHARS, CHAT_FUNCTION,
};
pub use conversation::{ContextMessage, Conversation, Turn, CONTEXT_WINDOW};
pub use models::{suggestions, Model};
