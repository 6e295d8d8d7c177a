use crate::session::SessionStore;

/// Client-side routes. `Quiz` and `Score` carry the quiz id they act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    CreateQuiz,
    Quiz(i64),
    Score(i64),
    Exit,
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::Exit)
    }
}

/// Stateless gate evaluated on every navigation: protected routes fall
/// back to the login view whenever no token is stored.
pub fn guard(route: Route, session: &SessionStore) -> Route {
    if route.requires_auth() && session.token().is_none() {
        Route::Login
    } else {
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_routes_redirect_without_token() {
        let session = SessionStore::in_memory();
        assert_eq!(guard(Route::Dashboard, &session), Route::Login);
        assert_eq!(guard(Route::CreateQuiz, &session), Route::Login);
        assert_eq!(guard(Route::Quiz(1), &session), Route::Login);
        assert_eq!(guard(Route::Score(1), &session), Route::Login);
    }

    #[test]
    fn token_allows_protected_routes() {
        let session = SessionStore::in_memory();
        session.set_token("tok");
        assert_eq!(guard(Route::Dashboard, &session), Route::Dashboard);
        assert_eq!(guard(Route::Quiz(3), &session), Route::Quiz(3));
    }

    #[test]
    fn login_and_exit_are_always_reachable() {
        let session = SessionStore::in_memory();
        assert_eq!(guard(Route::Login, &session), Route::Login);
        assert_eq!(guard(Route::Exit, &session), Route::Exit);
    }
}
