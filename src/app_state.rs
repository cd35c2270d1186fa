//! The state shared by every board route handler.

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{api::TransactionApi, config::BoardConfig, sessions::BoardSessions};

/// The state of the board server.
pub struct AppState<A> {
    /// The board of each browser session.
    pub sessions: Arc<BoardSessions<A>>,

    /// The key used for encrypting and authenticating the session cookie.
    pub cookie_key: Key,

    /// How long a handler waits for the fetches it started before rendering.
    pub render_wait: Duration,
}

// A derived `Clone` would require `A: Clone`, but only the `Arc` is cloned.
impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            cookie_key: self.cookie_key.clone(),
            render_wait: self.render_wait,
        }
    }
}

impl<A: TransactionApi> AppState<A> {
    /// Create the state for boards that query `api`, each starting from the view in `config`.
    ///
    /// The cookie key is generated randomly, so session cookies do not outlive the process.
    /// Nothing is fetched until a browser opens its board.
    pub fn new(api: A, config: &BoardConfig) -> Self {
        Self {
            sessions: Arc::new(BoardSessions::new(
                api,
                config.view_state(),
                config.max_sessions,
            )),
            cookie_key: Key::generate(),
            render_wait: config.render_wait,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl<A> FromRef<AppState<A>> for Key {
    fn from_ref(state: &AppState<A>) -> Self {
        state.cookie_key.clone()
    }
}
