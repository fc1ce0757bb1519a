//! AI-generated quiz questions.
//!
//! Quiz mode asks an external chat-completions endpoint to rephrase deck
//! cards into fresh multiple-choice questions. The endpoint is optional:
//! without credentials the generator reports itself disabled and the
//! workflow refuses to start a quiz.

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use study_core::model::{CardId, Deck};

use crate::error::QuizError;

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

/// A generated question tied back to the deck card it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: CardId,
    pub question: String,
    pub answer: String,
    pub options: Vec<String>,
}

/// Source of quiz questions for a deck.
#[async_trait]
pub trait QuizQuestionSource: Send + Sync {
    /// True when the source can actually produce questions.
    fn enabled(&self) -> bool;

    /// Generate up to `count` questions from the deck's cards.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when the source is disabled, the request fails,
    /// or the response cannot be parsed.
    async fn generate_questions(
        &self,
        deck: &Deck,
        count: usize,
    ) -> Result<Vec<QuizQuestion>, QuizError>;
}

//
// ─── HTTP GENERATOR ────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct QuizGeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl QuizGeneratorConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("STUDY_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("STUDY_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("STUDY_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Chat-completions backed question generator.
#[derive(Clone)]
pub struct HttpQuizGenerator {
    client: Client,
    config: Option<QuizGeneratorConfig>,
}

impl HttpQuizGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(QuizGeneratorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<QuizGeneratorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn complete(&self, prompt: String) -> Result<String, QuizError> {
        let config = self.config.as_ref().ok_or(QuizError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.4,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuizError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(QuizError::EmptyResponse)?;

        Ok(content)
    }
}

#[async_trait]
impl QuizQuestionSource for HttpQuizGenerator {
    fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn generate_questions(
        &self,
        deck: &Deck,
        count: usize,
    ) -> Result<Vec<QuizQuestion>, QuizError> {
        let cards: Vec<_> = deck.cards().iter().take(count).collect();
        if cards.is_empty() {
            return Err(QuizError::EmptyResponse);
        }

        let listing = cards
            .iter()
            .enumerate()
            .map(|(i, card)| format!("{}. Q: {} / A: {}", i + 1, card.question(), card.answer()))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Rephrase each flashcard below into one multiple-choice question \
             with exactly four options, one of them the original answer \
             verbatim. Respond with only a JSON array, in the same order, of \
             objects with keys \"question\", \"answer\" and \"options\".\n\n{listing}"
        );

        let content = self.complete(prompt).await?;
        let raw = parse_questions(&content)?;

        // Entries map back to cards by position; a short response simply
        // yields a shorter quiz.
        Ok(raw
            .into_iter()
            .zip(cards)
            .map(|(entry, card)| QuizQuestion {
                id: card.id(),
                question: entry.question,
                answer: entry.answer,
                options: entry.options,
            })
            .collect())
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawQuizQuestion {
    question: String,
    answer: String,
    #[serde(default)]
    options: Vec<String>,
}

/// Parse the model's reply, tolerating a Markdown code fence around the
/// JSON array.
fn parse_questions(content: &str) -> Result<Vec<RawQuizQuestion>, QuizError> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let entries: Vec<RawQuizQuestion> =
        serde_json::from_str(body).map_err(|err| QuizError::Malformed(err.to_string()))?;
    if entries.is_empty() {
        return Err(QuizError::EmptyResponse);
    }
    Ok(entries)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_json_array() {
        let content = r#"[{"question":"Capital of France?","answer":"Paris",
            "options":["Paris","Lyon","Nice","Lille"]}]"#;
        let entries = parse_questions(content).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].answer, "Paris");
        assert_eq!(entries[0].options.len(), 4);
    }

    #[test]
    fn strips_a_code_fence() {
        let content = "```json\n[{\"question\":\"Q\",\"answer\":\"A\",\"options\":[\"A\",\"B\"]}]\n```";
        let entries = parse_questions(content).unwrap();
        assert_eq!(entries[0].question, "Q");
    }

    #[test]
    fn rejects_non_json_replies() {
        let err = parse_questions("Sure! Here are your questions:").unwrap_err();
        assert!(matches!(err, QuizError::Malformed(_)));
    }

    #[test]
    fn rejects_an_empty_array() {
        let err = parse_questions("[]").unwrap_err();
        assert!(matches!(err, QuizError::EmptyResponse));
    }

    #[test]
    fn generator_without_credentials_is_disabled() {
        let generator = HttpQuizGenerator::new(None);
        assert!(!generator.enabled());
    }
}
