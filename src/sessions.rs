//! One board per browser session.
//!
//! Each browser gets its own [TransactionBoardController], so one visitor's
//! search, month and page never show up on another visitor's board. The
//! session ID is kept in a private cookie, which is encrypted and
//! authenticated with the server's cookie key, so a client cannot pick
//! another session's ID.
//!
//! Sessions live in memory. Restarting the server, or evicting a session to
//! make room for a new one, gives the browser a fresh board on its next request.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};

use crate::{
    Error,
    api::TransactionApi,
    controller::{Refresh, TransactionBoardController},
    view_state::ViewState,
};

/// The name of the cookie holding the session ID.
pub(crate) const COOKIE_SESSION: &str = "board_session";

/// The most boards kept in memory by default.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

struct Session<A> {
    board: Arc<TransactionBoardController<A>>,
    last_used: Instant,
}

/// The board of one browser session.
pub struct SessionBoard<A> {
    /// The cookie jar to send back, with the session cookie set if the session is new.
    pub jar: PrivateCookieJar,
    /// The session's board.
    pub board: Arc<TransactionBoardController<A>>,
    /// The initial load of a new board. Empty for an existing board.
    pub load: Refresh,
}

/// The boards of every open browser session.
pub struct BoardSessions<A> {
    api: Arc<A>,
    initial_view: ViewState,
    max_sessions: usize,
    next_id: AtomicU64,
    sessions: Mutex<HashMap<u64, Session<A>>>,
}

impl<A> std::fmt::Debug for BoardSessions<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSessions")
            .field("initial_view", &self.initial_view)
            .field("max_sessions", &self.max_sessions)
            .finish_non_exhaustive()
    }
}

impl<A: TransactionApi> BoardSessions<A> {
    /// Create an empty set of sessions. New boards query `api` and start from `initial_view`.
    ///
    /// At most `max_sessions` boards are kept, the least recently used board is
    /// dropped to make room for a new one.
    pub fn new(api: A, initial_view: ViewState, max_sessions: usize) -> Self {
        Self {
            api: Arc::new(api),
            initial_view,
            max_sessions: max_sessions.max(1),
            next_id: AtomicU64::new(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The number of open sessions.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the session lock is poisoned.
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.lock()?.len())
    }

    /// Whether no session has been opened yet.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the session lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.lock()?.is_empty())
    }

    /// Get the board for the session in `jar`.
    ///
    /// A request without a valid session cookie gets a new board, which
    /// starts loading straight away, and a cookie for its session.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the session lock is poisoned.
    pub fn open(&self, jar: PrivateCookieJar) -> Result<SessionBoard<A>, Error> {
        if let Some(board) = self.existing_board(&jar)? {
            return Ok(SessionBoard {
                jar,
                board,
                load: Refresh::default(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let board = Arc::new(TransactionBoardController::with_shared_api(
            self.api.clone(),
            self.initial_view.clone(),
        ));
        let load = board.load()?;

        {
            let mut sessions = self.lock()?;

            if sessions.len() >= self.max_sessions {
                evict_least_recently_used(&mut sessions);
            }

            sessions.insert(
                id,
                Session {
                    board: board.clone(),
                    last_used: Instant::now(),
                },
            );
        }

        tracing::debug!("opened board session {id}");

        Ok(SessionBoard {
            jar: jar.add(session_cookie(id)),
            board,
            load,
        })
    }

    fn existing_board(
        &self,
        jar: &PrivateCookieJar,
    ) -> Result<Option<Arc<TransactionBoardController<A>>>, Error> {
        let Some(id) = jar
            .get(COOKIE_SESSION)
            .and_then(|cookie| cookie.value_trimmed().parse::<u64>().ok())
        else {
            return Ok(None);
        };

        let mut sessions = self.lock()?;

        Ok(sessions.get_mut(&id).map(|session| {
            session.last_used = Instant::now();
            session.board.clone()
        }))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<u64, Session<A>>>, Error> {
        self.sessions
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire session lock: {error}"))
            .map_err(|_| Error::StateLockError)
    }
}

fn evict_least_recently_used<A>(sessions: &mut HashMap<u64, Session<A>>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, session)| session.last_used)
        .map(|(id, _)| *id);

    if let Some(id) = oldest {
        sessions.remove(&id);
        tracing::debug!("evicted board session {id}");
    }
}

fn session_cookie(id: u64) -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
