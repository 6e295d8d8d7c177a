pub mod api;
pub mod attempt;
pub mod config;
pub mod dto;
pub mod error;
pub mod hosting;
pub mod models;
pub mod router;
pub mod session;
pub mod utils;
pub mod views;

use crate::api::ApiClient;
use crate::session::{FileStore, SessionStore};
use std::sync::Arc;
use url::Url;

/// Shared client state handed to every view: the durable session plus
/// the API client bound to it.
#[derive(Clone)]
pub struct App {
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
}

impl App {
    /// Builds the production app from the global config, with the
    /// session persisted to `SESSION_FILE`.
    pub fn new() -> crate::error::Result<Self> {
        let config = crate::config::get_config();
        let store = FileStore::open(&config.session_file)?;
        let session = Arc::new(SessionStore::new(Box::new(store)));
        Ok(Self::with_session(config.api_base_url.clone(), session))
    }

    pub fn with_session(api_base_url: Url, session: Arc<SessionStore>) -> Self {
        let api = ApiClient::new(api_base_url, session.clone());
        Self { session, api }
    }
}
