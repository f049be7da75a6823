use std::env;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use vocab_core::model::{AnswerOption, CategoryId, Question, ReviewCard, SessionId, WordId};

use crate::error::ApiError;

use super::{
    LearningApi, NextCard, ReviewMode, ReviewResultReport, SessionEndReport, SessionStartAck,
    SessionStartReport,
};

//
// ─── CONFIG ───────────────────────────────────────────────────────────────────
//

/// Where the learning server lives.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Read the base URL from `VOCAB_API_BASE_URL`, falling back to the local
    /// development server.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("VOCAB_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "http://127.0.0.1:8000".into());
        Self { base_url }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

//
// ─── HTTP ADAPTER ─────────────────────────────────────────────────────────────
//

/// Production `LearningApi` adapter over HTTP.
#[derive(Clone)]
pub struct HttpLearningApi {
    client: Client,
    config: ApiConfig,
}

impl HttpLearningApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn post_tracking(&self, payload: &TrackingPayload) -> Result<Response, ApiError> {
        let response = self
            .client
            .post(self.endpoint("track_session/"))
            .json(payload)
            .send()
            .await?;
        ensure_success(response)
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    if !response.status().is_success() {
        return Err(ApiError::HttpStatus(response.status()));
    }
    Ok(response)
}

fn card_endpoint(mode: ReviewMode) -> &'static str {
    match mode {
        ReviewMode::NewWords => "learning/get_new_word/",
        ReviewMode::Repetition => "learning/get_word_repeat/",
    }
}

fn result_endpoint(mode: ReviewMode) -> &'static str {
    match mode {
        ReviewMode::NewWords => "learning/new_word_send_result/",
        ReviewMode::Repetition => "learning/send_repeat_result/",
    }
}

#[async_trait]
impl LearningApi for HttpLearningApi {
    async fn start_session(
        &self,
        report: SessionStartReport,
    ) -> Result<SessionStartAck, ApiError> {
        let payload = TrackingPayload::SessionStart {
            session_start: report.started_at,
            page_url: report.page_url.to_string(),
        };
        let response = self.post_tracking(&payload).await?;
        let ack: StartAckPayload = response.json().await?;

        Ok(SessionStartAck {
            session_id: SessionId::new(ack.session_id),
        })
    }

    async fn end_session(&self, report: SessionEndReport) -> Result<(), ApiError> {
        let payload = TrackingPayload::SessionEnd {
            session_id: report.session_id.map(|id| id.value()),
            session_end: report.window.ended_at(),
            duration: report.window.duration_seconds(),
        };
        self.post_tracking(&payload).await?;
        Ok(())
    }

    async fn quiz_questions(&self, category: CategoryId) -> Result<Vec<Question>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("api/learning/get_test_questions"))
            .query(&[("category_id", category.value())])
            .send()
            .await?;
        let body: QuestionsPayload = ensure_success(response)?.json().await?;

        body.questions
            .into_iter()
            .map(|question| {
                let options = question
                    .options
                    .into_iter()
                    .map(|option| AnswerOption::new(option.translation, option.is_correct))
                    .collect();
                Question::new(question.word, options)
                    .map_err(|err| ApiError::BadPayload(err.to_string()))
            })
            .collect()
    }

    async fn next_review_card(&self, mode: ReviewMode) -> Result<NextCard, ApiError> {
        let response = self
            .client
            .get(self.endpoint(card_endpoint(mode)))
            .send()
            .await?;
        let body: CardPayload = ensure_success(response)?.json().await?;

        if body.status != "success" {
            return Ok(NextCard::Exhausted);
        }

        let id = body
            .id
            .ok_or_else(|| ApiError::BadPayload("card id missing".into()))?;
        let word = body
            .word
            .ok_or_else(|| ApiError::BadPayload("card word missing".into()))?;
        let translation = body
            .translation
            .ok_or_else(|| ApiError::BadPayload("card translation missing".into()))?;

        let card = ReviewCard::new(WordId::new(id), word, translation, body.transcription)
            .map_err(|err| ApiError::BadPayload(err.to_string()))?;
        Ok(NextCard::Card(card))
    }

    async fn send_review_result(
        &self,
        mode: ReviewMode,
        report: ReviewResultReport,
    ) -> Result<(), ApiError> {
        let payload = ResultPayload {
            word_id: report.card_id.value(),
            is_known: report.judgment.is_known(),
            session_id: report.session_id.map(|id| id.value()),
        };
        let response = self
            .client
            .post(self.endpoint(result_endpoint(mode)))
            .json(&payload)
            .send()
            .await?;
        ensure_success(response)?;
        Ok(())
    }
}

//
// ─── WIRE SHAPES ──────────────────────────────────────────────────────────────
//

// Wire shapes mirror the server's JSON so domain types never grow serde
// concerns; the same split the storage layer uses for persisted records.

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TrackingPayload {
    SessionStart {
        session_start: DateTime<Utc>,
        page_url: String,
    },
    SessionEnd {
        session_id: Option<u64>,
        session_end: DateTime<Utc>,
        duration: u64,
    },
}

#[derive(Debug, Deserialize)]
struct StartAckPayload {
    session_id: u64,
}

#[derive(Debug, Deserialize)]
struct QuestionsPayload {
    #[serde(default)]
    questions: Vec<QuestionPayload>,
}

#[derive(Debug, Deserialize)]
struct QuestionPayload {
    word: String,
    options: Vec<OptionPayload>,
}

#[derive(Debug, Deserialize)]
struct OptionPayload {
    translation: String,
    is_correct: bool,
}

#[derive(Debug, Deserialize)]
struct CardPayload {
    status: String,
    id: Option<u64>,
    word: Option<String>,
    translation: Option<String>,
    transcription: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResultPayload {
    word_id: u64,
    is_known: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_payload_is_tagged() {
        let payload = TrackingPayload::SessionEnd {
            session_id: Some(7),
            session_end: vocab_core::time::fixed_now(),
            duration: 31,
        };
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["type"], "session_end");
        assert_eq!(json["session_id"], 7);
        assert_eq!(json["duration"], 31);
    }

    #[test]
    fn result_payload_omits_absent_session() {
        let payload = ResultPayload {
            word_id: 3,
            is_known: false,
            session_id: None,
        };
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["word_id"], 3);
        assert!(json.get("session_id").is_none());
    }

    #[test]
    fn card_payload_tolerates_missing_fields() {
        let body: CardPayload =
            serde_json::from_str(r#"{"status": "error", "message": "No words to repeat"}"#)
                .unwrap();
        assert_eq!(body.status, "error");
        assert!(body.word.is_none());
    }
}
