//! Orchestrates one conversation turn: classification, chat resolution,
//! reply generation, and atomic persistence of the prompt with its
//! sentiment annotations.

use chrono::{DateTime, Utc};

use crate::db::repository::{ChatRepository, PromptRepository, SentimentRepository};
use crate::db::Database;
use crate::error::{Result, SolaceError};
use crate::generation::{ChatTurn, GeneratorProvider};
use crate::models::{Chat, Prompt, Sentiment};
use crate::sentiment::{retain_above_threshold, SentimentClassifier};

/// Everything produced by one submitted prompt.
#[derive(Debug, Clone)]
pub struct PromptSubmission {
    pub chat: Chat,
    pub prompt: Prompt,
    pub sentiments: Vec<Sentiment>,
}

#[derive(Clone)]
pub struct ConversationService {
    db: Database,
    classifier: SentimentClassifier,
    generator: GeneratorProvider,
}

impl ConversationService {
    pub fn new(db: Database, classifier: SentimentClassifier, generator: GeneratorProvider) -> Self {
        Self {
            db,
            classifier,
            generator,
        }
    }

    /// Submit one prompt on behalf of `user_id`.
    ///
    /// Chat resolution commits in its own unit of work before generation, so
    /// no transaction is ever held open across inference latency. The prompt
    /// and its above-threshold sentiments then persist together in a second
    /// unit of work; if any write fails the whole turn rolls back.
    pub async fn submit_prompt(
        &self,
        user_id: &str,
        chat_id: Option<&str>,
        prompt_text: &str,
    ) -> Result<PromptSubmission> {
        if prompt_text.trim().is_empty() {
            return Err(SolaceError::Validation(
                "Prompt text must not be empty".to_string(),
            ));
        }

        let scores = self.classifier.classify_top(prompt_text);

        let uow = self.db.begin().await?;
        let chat =
            ChatRepository::resolve_or_create(uow.conn(), user_id, chat_id, prompt_text).await?;
        uow.commit().await?;

        let reply = self
            .generator
            .generate(&[ChatTurn::user(prompt_text)])
            .await?;

        let uow = self.db.begin().await?;

        // Ownership is re-checked here rather than trusted from the first
        // unit of work.
        ChatRepository::get_owned(uow.conn(), &chat.id, user_id)
            .await?
            .ok_or_else(|| SolaceError::NotFound(format!("Chat {} not found", chat.id)))?;

        let prompt = Prompt::new(chat.id.clone(), prompt_text.to_string(), reply);
        PromptRepository::create(uow.conn(), &prompt).await?;

        let mut sentiments = Vec::new();
        for score in retain_above_threshold(scores) {
            let sentiment = Sentiment::new(prompt.id.clone(), score.label, score.score);
            SentimentRepository::create(uow.conn(), &sentiment).await?;
            sentiments.push(sentiment);
        }

        uow.commit().await?;

        Ok(PromptSubmission {
            chat,
            prompt,
            sentiments,
        })
    }

    /// All chats owned by `user_id`, most recently created first.
    pub async fn list_chats(&self, user_id: &str) -> Result<Vec<Chat>> {
        let conn = self.db.connect()?;
        ChatRepository::list_for_owner(&conn, user_id).await
    }

    /// Prompts of one chat, most recently created first. Ownership is
    /// verified in the same unit of work as the read.
    pub async fn list_prompts(&self, user_id: &str, chat_id: &str) -> Result<Vec<Prompt>> {
        let uow = self.db.begin().await?;

        ChatRepository::get_owned(uow.conn(), chat_id, user_id)
            .await?
            .ok_or_else(|| SolaceError::NotFound(format!("Chat {chat_id} not found")))?;

        let prompts = PromptRepository::list_for_chat(uow.conn(), chat_id).await?;
        uow.commit().await?;
        Ok(prompts)
    }

    /// Sentiments recorded for `user_id` within `[start, end]` inclusive.
    pub async fn list_sentiments(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sentiment>> {
        if end > Utc::now() {
            return Err(SolaceError::InvalidRange(
                "End date cannot be in the future".to_string(),
            ));
        }
        if start > end {
            return Err(SolaceError::InvalidRange(
                "Start date must not be after end date".to_string(),
            ));
        }

        let conn = self.db.connect()?;
        SentimentRepository::list_for_owner_between(&conn, user_id, start, end).await
    }
}
