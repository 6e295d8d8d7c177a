use axum::extract::Json;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use quiz_client::api::QuizService;
use quiz_client::attempt::{AttemptFlow, Phase};
use quiz_client::error::Error;
use quiz_client::session::SessionStore;
use quiz_client::App;
use serde_json::{json, Value as JsonValue};
use std::sync::{Arc, Mutex};
use url::Url;

/// Runs a mock quiz service on an ephemeral port and returns its origin.
async fn spawn_server(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    Url::parse(&format!("http://{}", addr)).expect("origin url")
}

fn test_app(base_url: Url) -> App {
    App::with_session(base_url, Arc::new(SessionStore::in_memory()))
}

#[tokio::test]
async fn attaches_bearer_token_to_authenticated_calls() {
    let seen_auth: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let captured = seen_auth.clone();

    let router = Router::new().route(
        "/api/quizzes/user",
        get(move |headers: HeaderMap| {
            let captured = captured.clone();
            async move {
                *captured.lock().unwrap() = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v.to_string());
                Json(json!([]))
            }
        }),
    );

    let app = test_app(spawn_server(router).await);
    app.session.set_token("tok-123");

    let quizzes = app.api.user_quizzes().await.expect("list quizzes");
    assert!(quizzes.is_empty());
    assert_eq!(
        *seen_auth.lock().unwrap(),
        Some("Bearer tok-123".to_string())
    );
}

#[tokio::test]
async fn login_is_form_encoded_and_returns_the_token() {
    let router = Router::new().route(
        "/api/token",
        post(
            |axum::Form(form): axum::Form<Vec<(String, String)>>| async move {
                let get = |key: &str| {
                    form.iter()
                        .find(|(k, _)| k == key)
                        .map(|(_, v)| v.as_str())
                };
                assert_eq!(get("username"), Some("alice"));
                assert_eq!(get("password"), Some("secret"));
                Json(json!({ "access_token": "granted", "token_type": "bearer" }))
            },
        ),
    );

    let app = test_app(spawn_server(router).await);
    let token = app.api.login("alice", "secret").await.expect("login");

    assert_eq!(token.access_token, "granted");
    // Storing the token is the login view's job, not the client's.
    assert_eq!(app.session.token(), None);
}

#[tokio::test]
async fn unauthorized_response_clears_the_whole_session() {
    let router = Router::new().route(
        "/api/quizzes/user",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Could not validate credentials" })),
            )
        }),
    );

    let app = test_app(spawn_server(router).await);
    app.session.set_token("stale");
    app.session.set_attempt_id(3, 30);

    let err = app.api.user_quizzes().await.expect_err("401 must fail");
    match err {
        Error::Unauthorized(msg) => assert_eq!(msg, "Could not validate credentials"),
        other => panic!("expected Unauthorized, got {:?}", other),
    }
    assert_eq!(app.session.token(), None);
    assert_eq!(app.session.attempt_id(3), None);
}

#[tokio::test]
async fn server_detail_is_surfaced_and_missing_detail_falls_back() {
    let router = Router::new()
        .route(
            "/api/quizzes/",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "detail": "Quiz limit reached" })),
                )
            }),
        )
        .route(
            "/api/quizzes/9",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );

    let app = test_app(spawn_server(router).await);

    let payload = quiz_client::dto::quiz_dto::CreateQuizPayload {
        title: "T".to_string(),
        total_questions: 1,
        total_score: 1,
        duration: 1,
    };
    let err = app.api.create_quiz(&payload).await.expect_err("400");
    match err {
        Error::Api(msg) => assert_eq!(msg, "Quiz limit reached"),
        other => panic!("expected Api error, got {:?}", other),
    }

    let err = app.api.get_quiz(9).await.expect_err("500");
    match err {
        Error::Api(msg) => {
            assert_eq!(msg, "Request failed with status 500 Internal Server Error")
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn attempt_flow_end_to_end_over_http() {
    let submitted: Arc<Mutex<Option<JsonValue>>> = Arc::new(Mutex::new(None));
    let captured = submitted.clone();

    let router = Router::new()
        .route(
            "/api/quizzes/7",
            get(|| async {
                Json(json!({
                    "id": 7,
                    "title": "Networking basics",
                    "total_questions": 2,
                    "total_score": 10,
                    "duration": 5,
                    "questions": [
                        { "id": 1, "text": "Q1", "options": [
                            { "id": 11, "text": "A" },
                            { "id": 12, "text": "B" }
                        ]},
                        { "id": 2, "text": "Q2", "options": [
                            { "id": 21, "text": "A" },
                            { "id": 22, "text": "B" }
                        ]}
                    ]
                }))
            }),
        )
        .route(
            "/api/quizzes/7/start/",
            post(|| async { Json(json!({ "attempt_id": 99 })) }),
        )
        .route(
            "/api/quizzes/7/submit/",
            post(move |Json(body): Json<JsonValue>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    StatusCode::OK
                }
            }),
        );

    let app = test_app(spawn_server(router).await);
    app.session.set_token("tok");

    let mut flow = AttemptFlow::new(7);
    flow.load(&app.api, &app.session).await;
    assert_eq!(*flow.phase(), Phase::Ready);
    assert_eq!(flow.time_left(), 5 * 60);
    assert_eq!(app.session.attempt_id(7), Some(99));

    flow.select_answer(1, 12);
    flow.select_answer(2, 21);
    flow.next();
    assert!(flow.can_submit());

    flow.submit(&app.api, &app.session).await;
    assert_eq!(*flow.phase(), Phase::Submitted);

    let body = submitted.lock().unwrap().take().expect("submit body");
    assert_eq!(body["attempt_id"], json!(99));
    let responses = body["responses"].as_array().expect("responses array");
    assert_eq!(responses.len(), 2);
    assert!(responses.contains(&json!({ "question_id": 1, "selected_option_id": 12 })));
    assert!(responses.contains(&json!({ "question_id": 2, "selected_option_id": 21 })));
}

#[tokio::test]
async fn scored_response_decodes_with_correctness_flags() {
    let router = Router::new().route(
        "/api/quizzes/7/response/",
        get(|| async {
            Json(json!({
                "id": 99,
                "score": 7.0,
                "total_score": 10.0,
                "completed_at": "2025-03-01T12:00:00Z",
                "questions": [
                    { "id": 1, "text": "Q1", "selected_option_id": 12, "options": [
                        { "id": 11, "text": "A", "is_correct": true },
                        { "id": 12, "text": "B", "is_correct": false }
                    ]}
                ]
            }))
        }),
    );

    let app = test_app(spawn_server(router).await);
    app.session.set_token("tok");

    let scored = app.api.quiz_response(7).await.expect("scored response");
    assert_eq!(scored.score, 7.0);
    assert_eq!(scored.total_score, 10.0);
    assert_eq!(scored.questions.len(), 1);
    assert_eq!(scored.questions[0].selected_option_id, Some(12));
    assert_eq!(scored.questions[0].options[0].is_correct, Some(true));
}
