use crate::dto::quiz_dto::QuizScoreEntry;
use crate::error::{Error, Result};
use crate::models::Quiz;
use crate::router::Route;
use crate::views::Terminal;
use crate::App;
use tokio::io::{AsyncBufRead, AsyncWrite};

pub async fn run<R, W>(app: &App, term: &mut Terminal<R, W>) -> Result<Route>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let quizzes = loop {
        match app.api.user_quizzes().await {
            Ok(quizzes) => break quizzes,
            Err(e @ Error::Unauthorized(_)) => return Err(e),
            Err(e) => {
                term.write(&format!(
                    "Failed to load quizzes: {}\n(Enter to retry, 'q' to quit) ",
                    e.user_message()
                ))
                .await?;
                if term.read_line().await? == "q" {
                    return Ok(Route::Exit);
                }
            }
        }
    };

    let mut selected: usize = 0;
    let mut scores = match quizzes.first() {
        Some(quiz) => fetch_scores(app, quiz.id).await?,
        None => Vec::new(),
    };

    loop {
        render(term, &quizzes, selected, &scores).await?;

        let command = term.read_line().await?;
        match command.as_str() {
            "q" => return Ok(Route::Exit),
            "l" => {
                app.api.logout();
                return Ok(Route::Login);
            }
            "c" => return Ok(Route::CreateQuiz),
            "s" => {
                if let Some(quiz) = quizzes.get(selected) {
                    return Ok(Route::Quiz(quiz.id));
                }
            }
            "v" => {
                if let Some(quiz) = quizzes.get(selected) {
                    return Ok(Route::Score(quiz.id));
                }
            }
            other => {
                if let Ok(index) = other.parse::<usize>() {
                    if index >= 1 && index <= quizzes.len() {
                        selected = index - 1;
                        scores = fetch_scores(app, quizzes[selected].id).await?;
                    }
                }
            }
        }
    }
}

/// A quiz with no readable scoreboard still renders, just with an empty
/// attempts table.
async fn fetch_scores(app: &App, quiz_id: i64) -> Result<Vec<QuizScoreEntry>> {
    match app.api.quiz_scores(quiz_id).await {
        Ok(scores) => Ok(scores),
        Err(e @ Error::Unauthorized(_)) => Err(e),
        Err(e) => {
            tracing::warn!("Failed to load scores for quiz {}: {}", quiz_id, e);
            Ok(Vec::new())
        }
    }
}

async fn render<R, W>(
    term: &mut Terminal<R, W>,
    quizzes: &[Quiz],
    selected: usize,
    scores: &[QuizScoreEntry],
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    term.write("\n== Quizzes ==\n").await?;
    if quizzes.is_empty() {
        term.write("No quizzes available\n").await?;
    }
    for (index, quiz) in quizzes.iter().enumerate() {
        let marker = if index == selected { ">" } else { " " };
        term.write(&format!(
            "{} {}. {} (Questions: {} | Score: {})\n",
            marker,
            index + 1,
            quiz.title,
            quiz.total_questions,
            quiz.total_score
        ))
        .await?;
    }

    if let Some(quiz) = quizzes.get(selected) {
        term.write(&format!(
            "\n{} - Duration: {} minutes | Total Questions: {}\n",
            quiz.title, quiz.duration, quiz.total_questions
        ))
        .await?;
        term.write("Recent Attempts:\n").await?;
        if scores.is_empty() {
            term.write("  No attempts yet\n").await?;
        }
        for score in scores {
            term.write(&format!(
                "  {:<20} {:>6}/{} on {}\n",
                score.username,
                score.score,
                quiz.total_score,
                score.completed_at.format("%Y-%m-%d")
            ))
            .await?;
        }
    }

    term.write(
        "\n[number] select | s start quiz | v view score | c create quiz | l logout | q quit\n> ",
    )
    .await?;
    Ok(())
}
