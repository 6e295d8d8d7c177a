use crate::models::quiz::QuestionOption;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateQuizPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(range(min = 1, message = "Must have at least 1 question"))]
    pub total_questions: u32,
    #[validate(range(min = 1, message = "Total score must be at least 1"))]
    pub total_score: u32,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration: u32,
}

/// Assigns existing question-bank entries to a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestionMap {
    pub quiz_id: i64,
    pub questions: Vec<QuizQuestionCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestionCreate {
    pub question_id: i64,
    pub question_number: u32,
    pub marks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAttemptResponse {
    pub attempt_id: i64,
}

/// Submission payload: the persisted attempt id plus one entry per
/// answered question. Unanswered questions are absent, never null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAttemptRequest {
    pub attempt_id: i64,
    pub responses: Vec<AttemptAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptAnswer {
    pub question_id: i64,
    pub selected_option_id: i64,
}

/// One row of a quiz's recent-attempts table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizScoreEntry {
    pub id: i64,
    pub username: String,
    pub score: f64,
    pub completed_at: DateTime<Utc>,
}

/// The scored outcome of a submitted attempt. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResponse {
    pub id: i64,
    pub score: f64,
    pub total_score: f64,
    pub completed_at: DateTime<Utc>,
    pub questions: Vec<ScoredQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredQuestion {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub selected_option_id: Option<i64>,
    pub options: Vec<QuestionOption>,
}
