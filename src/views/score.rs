use crate::dto::quiz_dto::ScoredResponse;
use crate::error::{Error, Result};
use crate::router::Route;
use crate::views::Terminal;
use tokio::io::{AsyncBufRead, AsyncWrite};
use crate::App;

pub async fn run<R, W>(app: &App, term: &mut Terminal<R, W>, quiz_id: i64) -> Result<Route>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let response = match app.api.quiz_response(quiz_id).await {
        Ok(response) => response,
        Err(e @ Error::Unauthorized(_)) => return Err(e),
        Err(e) => {
            tracing::warn!("Failed to load results for quiz {}: {}", quiz_id, e);
            term.write("Failed to load quiz results. Please try again.\n")
                .await?;
            return Ok(Route::Dashboard);
        }
    };

    render(term, &response).await?;

    term.write("\nr retake quiz | anything else back to dashboard\n> ")
        .await?;
    if term.read_line().await? == "r" {
        Ok(Route::Quiz(quiz_id))
    } else {
        Ok(Route::Dashboard)
    }
}

async fn render<R, W>(term: &mut Terminal<R, W>, response: &ScoredResponse) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    term.write("\n== Quiz Results ==\n").await?;
    term.write(&format!(
        "{}%  (Score: {} / {})\nCompleted on: {}\n\n",
        percentage(response.score, response.total_score),
        response.score,
        response.total_score,
        response.completed_at.format("%Y-%m-%d %H:%M")
    ))
    .await?;

    term.write("Review Questions:\n").await?;
    for (index, question) in response.questions.iter().enumerate() {
        term.write(&format!("\nQuestion {}: {}\n", index + 1, question.text))
            .await?;
        for option in &question.options {
            let correct = option.is_correct.unwrap_or(false);
            let chosen = question.selected_option_id == Some(option.id);
            let marker = match (correct, chosen) {
                (true, _) => "+",
                (false, true) => "x",
                _ => " ",
            };
            term.write(&format!("  [{}] {}\n", marker, option.text))
                .await?;
        }
    }
    Ok(())
}

/// Overall result as a rounded percentage; a zero denominator (no
/// scorable questions) reads as zero rather than dividing by it.
fn percentage(score: f64, total_score: f64) -> i64 {
    if total_score <= 0.0 {
        return 0;
    }
    (score / total_score * 100.0).round() as i64
}
