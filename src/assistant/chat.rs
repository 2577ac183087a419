//! Chat Assistant
//!
//! Sends prompts to the `ai-chat` function and keeps the conversation.
//! The assistant never surfaces a transport failure for ordinary prompts:
//! it answers from the selected model's canned set instead. Canvas
//! prompts (`[Canvas] ...`) produce a document for the canvas panel and
//! report failure with a plain message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::conversation::{ContextMessage, Conversation};
use super::models::Model;
use crate::canvas::CanvasDocument;
use crate::gateway::{ChatRole, Gateway, GatewayResult, NewChatMessage};
use crate::locale::{Locale, Message};

/// Edge function serving chat completions
pub const CHAT_FUNCTION: &str = "ai-chat";

/// Marks a prompt as a document request
pub const CANVAS_PREFIX: &str = "[Canvas] ";

/// Generated documents are titled with this many chars of the topic
pub const CANVAS_TITLE_CHARS: usize = 30;

// ============================================
// Wire types
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub model: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<ContextMessage>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatReply {
    /// Response text, treating an empty string as absent
    fn text(self) -> Option<String> {
        self.response.filter(|r| !r.is_empty())
    }
}

/// `Sync` on native targets, where backend futures must be `Send`
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSync: Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Sync + ?Sized> MaybeSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSync for T {}

/// Chat completion and message persistence
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ChatBackend: MaybeSync {
    async fn complete(&self, request: &ChatRequest) -> GatewayResult<ChatReply>;

    async fn record(&self, _message: &NewChatMessage) -> GatewayResult<()> {
        Ok(())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ChatBackend for Gateway {
    async fn complete(&self, request: &ChatRequest) -> GatewayResult<ChatReply> {
        self.invoke(CHAT_FUNCTION, request).await
    }

    async fn record(&self, message: &NewChatMessage) -> GatewayResult<()> {
        self.chat().save_message(message).await.map(|_| ())
    }
}

// ============================================
// Prompts
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    Chat(&'a str),
    /// Document request; `topic` is the prompt without its prefix
    Canvas { topic: &'a str },
}

impl<'a> Prompt<'a> {
    /// `None` for blank input
    pub fn parse(input: &'a str) -> Option<Self> {
        if input.trim().is_empty() {
            return None;
        }
        Some(match input.strip_prefix(CANVAS_PREFIX) {
            Some(topic) => Prompt::Canvas { topic },
            None => Prompt::Chat(input),
        })
    }
}

/// Document produced for the canvas panel
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    pub title: String,
    pub content: String,
}

impl GeneratedDocument {
    /// An empty document with the generated title, ready to receive the
    /// content through a reveal
    pub fn open(&self) -> CanvasDocument {
        CanvasDocument::new(self.title.clone(), "")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    Message(String),
    Document(GeneratedDocument),
}

// ============================================
// Assistant
// ============================================

pub struct Assistant {
    model: Model,
    locale: Locale,
    persist: bool,
    conversation: Conversation,
}

impl Assistant {
    pub fn new(locale: Locale) -> Self {
        Self {
            model: Model::default(),
            locale,
            persist: false,
            conversation: Conversation::new(locale),
        }
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Store every turn through [`ChatBackend::record`]
    pub fn with_persistence(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn set_model(&mut self, model: Model) {
        self.model = model;
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Drop the conversation and start a new session
    pub fn reset(&mut self) {
        self.conversation = Conversation::new(self.locale);
    }

    /// Handle one line of user input. Blank input is ignored.
    pub async fn send<B>(&mut self, backend: &B, input: &str) -> Option<AssistantReply>
    where
        B: ChatBackend + ?Sized,
    {
        let reply = match Prompt::parse(input)? {
            Prompt::Chat(message) => AssistantReply::Message(self.chat(backend, message).await),
            Prompt::Canvas { topic } => match self.generate_document(backend, input, topic).await {
                Some(document) => AssistantReply::Document(document),
                None => AssistantReply::Message(self.locale.text(&Message::CanvasFailed)),
            },
        };
        Some(reply)
    }

    /// Ordinary chat turn; always yields an answer
    pub async fn chat<B>(&mut self, backend: &B, message: &str) -> String
    where
        B: ChatBackend + ?Sized,
    {
        let request = ChatRequest {
            message: message.to_string(),
            model: self.model.api_name().to_string(),
            session_id: self.conversation.session_id().to_string(),
            context: Some(self.conversation.context()),
        };
        self.add_turn(backend, ChatRole::User, message).await;

        let answer = match backend.complete(&request).await {
            Ok(reply) => reply
                .text()
                .unwrap_or_else(|| self.locale.text(&Message::AssistantApology)),
            Err(e) => {
                tracing::info!(error = %e, model = %self.model, "Chat unavailable, using offline response");
                self.model
                    .canned_response(uuid::Uuid::new_v4().as_u128())
                    .to_string()
            }
        };

        self.add_turn(backend, ChatRole::Assistant, &answer).await;
        answer
    }

    /// Canvas turn. `message` is the full prompt as typed (prefix included);
    /// `topic` names the document. `None` when generation failed, after the
    /// failure message has been added to the conversation.
    pub async fn generate_document<B>(
        &mut self,
        backend: &B,
        message: &str,
        topic: &str,
    ) -> Option<GeneratedDocument>
    where
        B: ChatBackend + ?Sized,
    {
        let request = ChatRequest {
            message: message.to_string(),
            model: self.model.api_name().to_string(),
            session_id: self.conversation.session_id().to_string(),
            context: None,
        };
        self.add_turn(backend, ChatRole::User, message).await;

        match backend.complete(&request).await {
            Ok(reply) => {
                let content = reply.text().unwrap_or_else(|| {
                    self.locale.text(&Message::CanvasGenerating {
                        topic: topic.to_string(),
                    })
                });
                let document = GeneratedDocument {
                    title: topic.chars().take(CANVAS_TITLE_CHARS).collect(),
                    content,
                };

                let ready = self.locale.text(&Message::CanvasReady {
                    topic: topic.to_string(),
                });
                self.add_turn(backend, ChatRole::Assistant, &ready).await;

                tracing::info!(title = %document.title, chars = document.content.chars().count(), "Document generated");
                Some(document)
            }
            Err(e) => {
                tracing::error!(error = %e, "Canvas generation failed");
                let failed = self.locale.text(&Message::CanvasFailed);
                self.add_turn(backend, ChatRole::Assistant, &failed).await;
                None
            }
        }
    }

    async fn add_turn<B>(&mut self, backend: &B, role: ChatRole, content: &str)
    where
        B: ChatBackend + ?Sized,
    {
        let model = match role {
            ChatRole::Assistant => Some(self.model),
            ChatRole::User => None,
        };
        self.conversation.push(role, content, model);

        if !self.persist {
            return;
        }
        let message = NewChatMessage {
            session_id: self.conversation.session_id().to_string(),
            role,
            content: content.to_string(),
            model: self.model.display_name().to_string(),
        };
        if let Err(e) = backend.record(&message).await {
            tracing::warn!(error = %e, "Failed to store chat message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::testing::MockBackend;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeBackend {
        reply: Option<Option<String>>,
        requests: Mutex<Vec<ChatRequest>>,
        recorded: Mutex<Vec<NewChatMessage>>,
    }

    impl FakeBackend {
        fn answering(response: Option<&str>) -> Self {
            Self {
                reply: Some(response.map(str::to_string)),
                requests: Mutex::new(Vec::new()),
                recorded: Mutex::new(Vec::new()),
            }
        }

        fn down() -> Self {
            Self {
                reply: None,
                requests: Mutex::new(Vec::new()),
                recorded: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> ChatRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn complete(&self, request: &ChatRequest) -> GatewayResult<ChatReply> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Some(response) => Ok(ChatReply {
                    response: response.clone(),
                }),
                None => Err(GatewayError::Unavailable),
            }
        }

        async fn record(&self, message: &NewChatMessage) -> GatewayResult<()> {
            self.recorded.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    #[test]
    fn test_prompt_parse() {
        assert_eq!(Prompt::parse("   "), None);
        assert_eq!(Prompt::parse("hello"), Some(Prompt::Chat("hello")));
        assert_eq!(
            Prompt::parse("[Canvas] 季度报告"),
            Some(Prompt::Canvas { topic: "季度报告" })
        );
    }

    #[tokio::test]
    async fn test_chat_sends_prior_context() {
        let backend = FakeBackend::answering(Some("ok"));
        let mut assistant = Assistant::new(Locale::ZhCn).with_model(Model::Gpt5Thinking);

        let reply = assistant.send(&backend, "销售如何?").await;
        assert_eq!(reply, Some(AssistantReply::Message("ok".to_string())));

        let request = backend.last_request();
        assert_eq!(request.model, "gpt-5");
        assert_eq!(request.session_id, assistant.conversation().session_id());
        // greeting only; the new prompt is not part of its own context
        assert_eq!(request.context.map(|c| c.len()), Some(1));
        assert_eq!(assistant.conversation().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_response_is_apology() {
        let backend = FakeBackend::answering(Some(""));
        let mut assistant = Assistant::new(Locale::ZhCn);
        let answer = assistant.chat(&backend, "hi").await;
        assert_eq!(answer, "抱歉，我暂时无法处理您的请求。");
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_canned_reply() {
        let backend = FakeBackend::down();
        let mut assistant = Assistant::new(Locale::ZhCn).with_model(Model::GrokThinking);
        let answer = assistant.chat(&backend, "库存?").await;
        assert!(Model::GrokThinking.canned_responses().contains(&answer.as_str()));
    }

    #[tokio::test]
    async fn test_canvas_prompt_generates_document() {
        let backend = FakeBackend::answering(Some("# 报告\n\n正文"));
        let mut assistant = Assistant::new(Locale::ZhCn);

        let topic = "一份关于第三季度销售业绩与市场表现的完整分析报告草稿以及下季度展望";
        let reply = assistant.send(&backend, &format!("[Canvas] {}", topic)).await;
        let Some(AssistantReply::Document(document)) = reply else {
            panic!("expected a document");
        };
        assert_eq!(document.content, "# 报告\n\n正文");
        assert_eq!(document.title.chars().count(), CANVAS_TITLE_CHARS);
        assert!(topic.starts_with(&document.title));

        let request = backend.last_request();
        assert!(request.message.starts_with(CANVAS_PREFIX));
        assert_eq!(request.context, None);
        assert!(assistant.conversation().last().unwrap().content.starts_with("✅"));
        assert_eq!(document.open().content(), "");
    }

    #[tokio::test]
    async fn test_canvas_without_text_uses_placeholder() {
        let backend = FakeBackend::answering(None);
        let mut assistant = Assistant::new(Locale::ZhCn);
        let document = assistant
            .generate_document(&backend, "[Canvas] 周报", "周报")
            .await
            .unwrap();
        assert_eq!(document.content, "# 周报\n\n正在生成内容...");
    }

    #[tokio::test]
    async fn test_canvas_failure_has_no_canned_fallback() {
        let backend = FakeBackend::down();
        let mut assistant = Assistant::new(Locale::ZhCn);
        let reply = assistant.send(&backend, "[Canvas] 周报").await;
        assert_eq!(
            reply,
            Some(AssistantReply::Message("❌ 文档生成失败，请重试。".to_string()))
        );
    }

    #[tokio::test]
    async fn test_persistence_records_both_turns() {
        let backend = FakeBackend::answering(Some("ok"));
        let mut assistant = Assistant::new(Locale::En).with_persistence(true);
        assistant.chat(&backend, "hi").await;

        let recorded = backend.recorded.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].role, ChatRole::User);
        assert_eq!(recorded[1].role, ChatRole::Assistant);
        assert_eq!(recorded[1].model, "gemini-3-pro");
    }

    #[tokio::test]
    async fn test_persistence_through_trait_object() {
        let fake = FakeBackend::answering(Some("ok"));
        let backend: &dyn ChatBackend = &fake;
        let mut assistant = Assistant::new(Locale::En).with_persistence(true);

        let reply = assistant.send(backend, "[Canvas] weekly report").await;

        assert!(matches!(reply, Some(AssistantReply::Document(_))));
        assert_eq!(fake.recorded.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_gateway_invokes_chat_function() {
        let backend = MockBackend::start().await;
        backend.respond(
            "POST",
            "/functions/v1/ai-chat",
            200,
            json!({"response": "来自服务端"}),
        );

        let gateway = backend.gateway();
        let mut assistant = Assistant::new(Locale::ZhCn);
        let answer = assistant.chat(&gateway, "hi").await;
        assert_eq!(answer, "来自服务端");

        let body = backend.last_request().unwrap().body.unwrap();
        assert_eq!(body["model"], "gemini-3-pro-preview");
        assert_eq!(body["message"], "hi");
        assert!(body["context"].is_array());
    }
}
