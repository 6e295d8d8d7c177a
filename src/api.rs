use crate::dto::auth_dto::TokenResponse;
use crate::dto::quiz_dto::{
    CreateQuizPayload, QuizQuestionMap, QuizScoreEntry, ScoredResponse, StartAttemptResponse,
    SubmitAttemptRequest,
};
use crate::error::{Error, Result};
use crate::models::{Quiz, User};
use crate::session::SessionStore;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use url::Url;

/// The slice of the remote API the attempt state machine depends on.
/// [`ApiClient`] is the production implementation; tests substitute a fake.
#[allow(async_fn_in_trait)]
pub trait QuizService {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Quiz>;
    async fn start_attempt(&self, quiz_id: i64) -> Result<StartAttemptResponse>;
    async fn submit_attempt(&self, quiz_id: i64, request: &SubmitAttemptRequest) -> Result<()>;
}

/// Thin wrapper over the remote quiz service. Attaches the session's
/// bearer token to every request; a 401 from any endpoint clears the
/// session as a process-wide side effect and surfaces as
/// [`Error::Unauthorized`], which the route loop turns into a redirect
/// to the login view.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: Url, session: Arc<SessionStore>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid API path {}: {}", path, e)))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Authentication rejected by quiz service, clearing session");
            self.session.clear();
            let detail = extract_detail(response).await;
            return Err(Error::Unauthorized(detail.unwrap_or_else(|| {
                "Session expired. Please log in again.".to_string()
            })));
        }
        if !response.status().is_success() {
            let status = response.status();
            let detail = extract_detail(response).await;
            return Err(Error::Api(detail.unwrap_or_else(|| {
                format!("Request failed with status {}", status)
            })));
        }
        Ok(response)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let form = [("username", username), ("password", password)];
        let response = self
            .execute(self.http.post(self.url("/api/token")?).form(&form))
            .await?;
        Ok(response.json().await?)
    }

    /// Local operation only; the remote service keeps no session state.
    pub fn logout(&self) {
        tracing::info!("Logging out, clearing session");
        self.session.clear();
    }

    pub async fn current_user(&self) -> Result<User> {
        let response = self.execute(self.http.get(self.url("/users/me")?)).await?;
        Ok(response.json().await?)
    }

    pub async fn all_quizzes(&self) -> Result<Vec<Quiz>> {
        let response = self
            .execute(self.http.get(self.url("/api/quizzes/")?))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn user_quizzes(&self) -> Result<Vec<Quiz>> {
        let response = self
            .execute(self.http.get(self.url("/api/quizzes/user")?))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn create_quiz(&self, payload: &CreateQuizPayload) -> Result<Quiz> {
        let response = self
            .execute(self.http.post(self.url("/api/quizzes/")?).json(payload))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn map_questions(&self, quiz_id: i64, map: &QuizQuestionMap) -> Result<()> {
        let path = format!("/api/quizzes/{}/questions/", quiz_id);
        self.execute(self.http.post(self.url(&path)?).json(map))
            .await?;
        Ok(())
    }

    pub async fn quiz_scores(&self, quiz_id: i64) -> Result<Vec<QuizScoreEntry>> {
        let path = format!("/api/quizzes/{}/scores/", quiz_id);
        let response = self.execute(self.http.get(self.url(&path)?)).await?;
        Ok(response.json().await?)
    }

    pub async fn quiz_response(&self, quiz_id: i64) -> Result<ScoredResponse> {
        let path = format!("/api/quizzes/{}/response/", quiz_id);
        let response = self.execute(self.http.get(self.url(&path)?)).await?;
        Ok(response.json().await?)
    }
}

impl QuizService for ApiClient {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Quiz> {
        let path = format!("/api/quizzes/{}", quiz_id);
        let response = self.execute(self.http.get(self.url(&path)?)).await?;
        Ok(response.json().await?)
    }

    async fn start_attempt(&self, quiz_id: i64) -> Result<StartAttemptResponse> {
        let path = format!("/api/quizzes/{}/start/", quiz_id);
        let response = self.execute(self.http.post(self.url(&path)?)).await?;
        Ok(response.json().await?)
    }

    async fn submit_attempt(&self, quiz_id: i64, request: &SubmitAttemptRequest) -> Result<()> {
        let path = format!("/api/quizzes/{}/submit/", quiz_id);
        self.execute(self.http.post(self.url(&path)?).json(request))
            .await?;
        Ok(())
    }
}

async fn extract_detail(response: Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    body.get("detail")
        .and_then(|detail| detail.as_str())
        .map(|s| s.to_string())
}
