use crate::api::QuizService;
use crate::dto::quiz_dto::{AttemptAnswer, SubmitAttemptRequest};
use crate::models::quiz::{Question, Quiz};
use crate::session::SessionStore;
use std::collections::BTreeMap;

/// Lifecycle of one quiz attempt.
///
/// `Loading -> Ready -> Submitting -> Submitted` is the happy path.
/// `Failed` and `NoQuestions` are terminal; a failed submission is not
/// terminal, it returns the flow to `Ready` with an error message so the
/// user can retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Submitting,
    Submitted,
    Failed(String),
    NoQuestions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time left decremented, attempt still running.
    Running,
    /// The countdown just hit zero; the caller must submit now.
    /// Yielded exactly once per attempt.
    Expired,
    /// Nothing to do (not in `Ready`, or already at zero).
    Idle,
}

pub struct AttemptFlow {
    quiz_id: i64,
    quiz: Option<Quiz>,
    attempt_id: Option<i64>,
    current: usize,
    answers: BTreeMap<i64, i64>,
    time_left: u32,
    phase: Phase,
    error: Option<String>,
}

impl AttemptFlow {
    pub fn new(quiz_id: i64) -> Self {
        Self {
            quiz_id,
            quiz: None,
            attempt_id: None,
            current: 0,
            answers: BTreeMap::new(),
            time_left: 0,
            phase: Phase::Loading,
            error: None,
        }
    }

    /// Fetches the quiz, then starts an attempt. Both calls must succeed
    /// in sequence; a quiz without questions never reaches the start call.
    /// The issued attempt id is persisted keyed by quiz id so a restarted
    /// client can still submit.
    pub async fn load(&mut self, api: &impl QuizService, session: &SessionStore) {
        if self.phase != Phase::Loading {
            return;
        }

        let quiz = match api.get_quiz(self.quiz_id).await {
            Ok(quiz) => quiz,
            Err(e) => {
                self.phase = Phase::Failed(e.user_message());
                return;
            }
        };
        if quiz.questions.is_empty() {
            self.phase = Phase::NoQuestions;
            return;
        }

        let started = match api.start_attempt(self.quiz_id).await {
            Ok(started) => started,
            Err(e) => {
                self.phase = Phase::Failed(e.user_message());
                return;
            }
        };

        session.set_attempt_id(self.quiz_id, started.attempt_id);
        self.attempt_id = Some(started.attempt_id);
        self.time_left = quiz.duration * 60;
        self.quiz = Some(quiz);
        self.phase = Phase::Ready;
    }

    /// One-second countdown pulse, driven by the owning view's interval.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Ready || self.time_left == 0 {
            return TickOutcome::Idle;
        }
        self.time_left -= 1;
        if self.time_left == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Running
        }
    }

    /// Records the selected option for a question. Question ids that do
    /// not belong to the loaded quiz are ignored.
    pub fn select_answer(&mut self, question_id: i64, option_id: i64) {
        if self.phase != Phase::Ready {
            return;
        }
        let Some(quiz) = &self.quiz else { return };
        if !quiz.has_question(question_id) {
            tracing::warn!(
                "Ignoring answer for unknown question {} in quiz {}",
                question_id,
                self.quiz_id
            );
            return;
        }
        self.answers.insert(question_id, option_id);
    }

    pub fn next(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        let last = self.question_count().saturating_sub(1);
        if self.current < last {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        self.current = self.current.saturating_sub(1);
    }

    /// Submission is offered only on the last question and only once
    /// every question has an answer.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Ready
            && self.question_count() > 0
            && self.current == self.question_count() - 1
            && self.all_answered()
    }

    pub fn all_answered(&self) -> bool {
        match &self.quiz {
            Some(quiz) => quiz.question_ids().all(|id| self.answers.contains_key(&id)),
            None => false,
        }
    }

    /// Sends the attempt to the service. Manual confirm and countdown
    /// expiry both land here. No-op outside `Ready`, which is what keeps
    /// a second invocation (double keypress, or timeout racing a manual
    /// submit) from issuing a duplicate request.
    pub async fn submit(&mut self, api: &impl QuizService, session: &SessionStore) {
        if self.phase != Phase::Ready {
            return;
        }

        let Some(attempt_id) = self.attempt_id.or_else(|| session.attempt_id(self.quiz_id))
        else {
            self.error = Some("No attempt in progress for this quiz.".to_string());
            return;
        };

        self.phase = Phase::Submitting;
        self.error = None;

        let request = SubmitAttemptRequest {
            attempt_id,
            responses: self
                .answers
                .iter()
                .map(|(&question_id, &selected_option_id)| AttemptAnswer {
                    question_id,
                    selected_option_id,
                })
                .collect(),
        };

        match api.submit_attempt(self.quiz_id, &request).await {
            Ok(()) => self.phase = Phase::Submitted,
            Err(e) => {
                tracing::error!("Submission failed for quiz {}: {}", self.quiz_id, e);
                self.error = Some("Failed to submit quiz. Please try again.".to_string());
                self.phase = Phase::Ready;
            }
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn quiz_id(&self) -> i64 {
        self.quiz_id
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.as_ref()?.questions.get(self.current)
    }

    pub fn question_count(&self) -> usize {
        self.quiz.as_ref().map_or(0, |q| q.questions.len())
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn selected_option(&self, question_id: i64) -> Option<i64> {
        self.answers.get(&question_id).copied()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_last_question(&self) -> bool {
        self.question_count() > 0 && self.current == self.question_count() - 1
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
