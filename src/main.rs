use quiz_client::config::init_config;
use quiz_client::error::Error;
use quiz_client::router::{guard, Route};
use quiz_client::views::{self, Terminal};
use quiz_client::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;

    let app = App::new()?;
    let mut term = Terminal::new();

    // Land on the dashboard; the guard bounces to login when no token
    // is stored.
    let mut route = Route::Dashboard;
    loop {
        route = guard(route, &app.session);
        let outcome = match route {
            Route::Login => views::login::run(&app, &mut term).await,
            Route::Dashboard => views::dashboard::run(&app, &mut term).await,
            Route::CreateQuiz => views::create_quiz::run(&app, &mut term).await,
            Route::Quiz(quiz_id) => views::quiz::run(&app, &mut term, quiz_id).await,
            Route::Score(quiz_id) => views::score::run(&app, &mut term, quiz_id).await,
            Route::Exit => break,
        };

        route = match outcome {
            Ok(next) => next,
            // A rejected token anywhere lands back on the login view;
            // the API client has already cleared the session.
            Err(Error::Unauthorized(msg)) => {
                term.write(&format!("\n{}\n", msg)).await?;
                Route::Login
            }
            Err(e) => return Err(e.into()),
        };
    }

    Ok(())
}
