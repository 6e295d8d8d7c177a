use serde::{Deserialize, Serialize};

/// A quiz as served by the remote service. Created server-side and
/// read-only here; listing endpoints return it without `questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub total_questions: u32,
    pub total_score: u32,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub options: Vec<QuestionOption>,
}

/// `is_correct` is revealed by the service only after scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: i64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl Quiz {
    pub fn question_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.questions.iter().map(|q| q.id)
    }

    pub fn has_question(&self, question_id: i64) -> bool {
        self.questions.iter().any(|q| q.id == question_id)
    }
}
