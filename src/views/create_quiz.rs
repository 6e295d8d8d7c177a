use crate::dto::quiz_dto::CreateQuizPayload;
use crate::error::{Error, Result};
use crate::router::Route;
use crate::views::{validation_messages, Terminal};
use crate::App;
use tokio::io::{AsyncBufRead, AsyncWrite};
use validator::Validate;

pub async fn run<R, W>(app: &App, term: &mut Terminal<R, W>) -> Result<Route>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    term.write("\n== Create New Quiz ==\n('q' to cancel)\n\n")
        .await?;

    loop {
        let title = term.prompt("Quiz Title: ").await?;
        if title == "q" {
            return Ok(Route::Dashboard);
        }
        let Some(total_questions) = read_number(term, "Total Questions: ").await? else {
            return Ok(Route::Dashboard);
        };
        let Some(total_score) = read_number(term, "Total Score: ").await? else {
            return Ok(Route::Dashboard);
        };
        let Some(duration) = read_number(term, "Duration (minutes): ").await? else {
            return Ok(Route::Dashboard);
        };

        let payload = CreateQuizPayload {
            title: title.trim().to_string(),
            total_questions,
            total_score,
            duration,
        };
        // All field checks run before anything goes on the wire.
        if let Err(errors) = payload.validate() {
            for message in validation_messages(&errors) {
                term.write(&format!("  {}\n", message)).await?;
            }
            term.write("\n").await?;
            continue;
        }

        match app.api.create_quiz(&payload).await {
            Ok(quiz) => {
                tracing::info!("Created quiz {} ({})", quiz.id, quiz.title);
                term.write(&format!("Created quiz \"{}\".\n", quiz.title))
                    .await?;
                return Ok(Route::Dashboard);
            }
            // Let the route loop handle a rejected token globally.
            Err(e @ Error::Unauthorized(_)) => return Err(e),
            Err(e) => {
                term.write(&format!("{}\n\n", e.user_message())).await?;
            }
        }
    }
}

/// Prompts until a non-negative number (or 'q') is entered. `None`
/// means the user cancelled.
async fn read_number<R, W>(term: &mut Terminal<R, W>, label: &str) -> Result<Option<u32>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let raw = term.prompt(label).await?;
        if raw == "q" {
            return Ok(None);
        }
        match raw.parse() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => term.write("  Enter a whole number\n").await?,
        }
    }
}
