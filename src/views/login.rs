use crate::dto::auth_dto::LoginForm;
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
    term.write("\n== Login to Quiz Management ==\n('q' to quit)\n\n")
        .await?;

    loop {
        let username = term.prompt("Username: ").await?;
        if username == "q" {
            return Ok(Route::Exit);
        }
        let password = term.prompt("Password: ").await?;

        let form = LoginForm { username, password };
        if let Err(errors) = form.validate() {
            for message in validation_messages(&errors) {
                term.write(&format!("  {}\n", message)).await?;
            }
            continue;
        }

        match app.api.login(&form.username, &form.password).await {
            Ok(token) if token.access_token.is_empty() => {
                // The service answered 200 without a usable credential.
                let err = Error::Integrity("Login failed. Please try again.".to_string());
                term.write(&format!("{}\n\n", err.user_message())).await?;
            }
            Ok(token) => {
                app.session.set_token(&token.access_token);
                tracing::info!("Logged in as {}", form.username);
                return Ok(Route::Dashboard);
            }
            Err(Error::Unauthorized(msg)) => {
                // Bad credentials on the token endpoint itself are an
                // ordinary login failure, not a session expiry.
                term.write(&format!("{}\n\n", msg)).await?;
            }
            Err(e) => {
                term.write(&format!("{}\n\n", e.user_message())).await?;
            }
        }
    }
}
