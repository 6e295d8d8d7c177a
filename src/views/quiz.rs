use crate::attempt::{AttemptFlow, Phase, TickOutcome};
use crate::error::Result;
use crate::router::Route;
use crate::utils::time::format_clock;
use crate::views::Terminal;
use crate::App;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::time::MissedTickBehavior;

/// Runs one timed attempt. The countdown interval lives inside this
/// function; leaving it (quit, submit, failure) drops the timer with it,
/// so no tick can outlive the attempt it belongs to.
pub async fn run<R, W>(app: &App, term: &mut Terminal<R, W>, quiz_id: i64) -> Result<Route>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    term.write("\nLoading quiz...\n").await?;

    let mut flow = AttemptFlow::new(quiz_id);
    flow.load(&app.api, &app.session).await;

    match flow.phase() {
        Phase::Failed(message) => {
            term.write(&format!("{}\nReturning to dashboard.\n", message))
                .await?;
            return Ok(Route::Dashboard);
        }
        Phase::NoQuestions => {
            term.write("No questions found for this quiz.\nReturning to dashboard.\n")
                .await?;
            return Ok(Route::Dashboard);
        }
        _ => {}
    }

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of a tokio interval fires immediately.
    interval.tick().await;

    let mut confirming = false;
    render(term, &flow).await?;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if flow.tick() == TickOutcome::Expired {
                    term.write("\nTime is up! Submitting your answers...\n").await?;
                    flow.submit(&app.api, &app.session).await;
                }
            }
            line = term.read_line() => {
                let command = line?;
                if confirming {
                    confirming = false;
                    if command == "y" {
                        flow.submit(&app.api, &app.session).await;
                    } else {
                        term.write("Submission cancelled.\n").await?;
                        render(term, &flow).await?;
                    }
                } else {
                    match command.as_str() {
                        "q" => return Ok(Route::Dashboard),
                        "n" => {
                            flow.next();
                            render(term, &flow).await?;
                        }
                        "p" => {
                            flow.previous();
                            render(term, &flow).await?;
                        }
                        "s" => {
                            if flow.can_submit() {
                                term.write(
                                    "Submit quiz? You won't be able to change your answers \
                                     after submission. (y/n): ",
                                )
                                .await?;
                                confirming = true;
                            } else if !flow.is_last_question() {
                                term.write("Go to the last question to submit.\n").await?;
                            } else {
                                term.write(&format!(
                                    "Answer all questions first ({} of {} answered).\n",
                                    flow.answered_count(),
                                    flow.question_count()
                                ))
                                .await?;
                            }
                        }
                        other => {
                            select_option(&mut flow, other);
                            render(term, &flow).await?;
                        }
                    }
                }
            }
        }

        if let Some(message) = flow.error() {
            term.write(&format!("{}\n", message)).await?;
            flow.clear_error();
            // A failed submit drops back to an answerable state; put the
            // question and prompt back on screen rather than leaving the
            // error as the last line.
            render(term, &flow).await?;
        }
        if *flow.phase() == Phase::Submitted {
            return Ok(Route::Score(quiz_id));
        }
    }
}

/// Option selection by its 1-based position in the current question.
fn select_option(flow: &mut AttemptFlow, command: &str) {
    let Ok(position) = command.parse::<usize>() else {
        return;
    };
    let Some(question) = flow.current_question() else {
        return;
    };
    let question_id = question.id;
    if let Some(option) = question.options.get(position.wrapping_sub(1)) {
        let option_id = option.id;
        flow.select_answer(question_id, option_id);
    }
}

async fn render<R, W>(term: &mut Terminal<R, W>, flow: &AttemptFlow) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(quiz) = flow.quiz() else {
        return Ok(());
    };
    let Some(question) = flow.current_question() else {
        return Ok(());
    };

    term.write(&format!(
        "\n{} | Time Left: {}\n",
        quiz.title,
        format_clock(flow.time_left())
    ))
    .await?;
    term.write(&format!(
        "Question {} of {} ({} answered)\n{}\n",
        flow.current_index() + 1,
        flow.question_count(),
        flow.answered_count(),
        question.text
    ))
    .await?;

    let selected = flow.selected_option(question.id);
    for (index, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(option.id) { "x" } else { " " };
        term.write(&format!("  [{}] {}. {}\n", marker, index + 1, option.text))
            .await?;
    }

    let action = if flow.is_last_question() {
        "s submit"
    } else {
        "n next"
    };
    term.write(&format!(
        "[number] answer | p previous | {} | q back to dashboard\n> ",
        action
    ))
    .await?;
    Ok(())
}
