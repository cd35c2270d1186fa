//! A transaction board: a searchable, paginated table of product sales with
//! monthly statistics and a price range bar chart.
//!
//! The board holds no data of its own. It keeps a small amount of view state
//! (search text, month, page and page size) and queries a remote, read-only
//! transaction API whenever that state changes, see [TransactionBoardController].
//!
//! This library also serves the board as HTML pages driven by htmx.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod board;
mod config;
mod controller;
mod endpoints;
mod error_pages;
mod html;
mod logging;
mod models;
mod month;
mod pagination;
mod routing;
mod sessions;
mod view_state;

#[cfg(test)]
mod test_utils;

pub use api::{HttpTransactionApi, TransactionApi, TransactionsQuery};
pub use app_state::AppState;
pub use board::{ChartTheme, register_chart_theme};
pub use config::BoardConfig;
pub use controller::{
    BoardEvent, BoardSnapshot, FetchKind, Panel, Refresh, TransactionBoardController,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use models::{
    MonthlyStatistics, PriceHistogram, PriceRange, Statistics, Transaction, TransactionId,
    TransactionPage,
};
pub use month::MonthFilter;
pub use routing::build_router;
pub use sessions::{BoardSessions, DEFAULT_MAX_SESSIONS, SessionBoard};
pub use view_state::{PageSize, ViewState};

use crate::{alert::Alert, error_pages::InternalServerError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transaction API could not be reached, or the connection dropped
    /// before the response was read.
    #[error("could not reach the transaction API: {0}")]
    Transport(String),

    /// The transaction API answered with a non-success status code.
    #[error("the transaction API responded with status {0}")]
    UnexpectedStatus(u16),

    /// The transaction API answered with a body that does not have the expected shape.
    #[error("the transaction API sent a malformed response: {0}")]
    MalformedResponse(String),

    /// The configured base URL for the transaction API is not a valid HTTP(S) URL.
    #[error("invalid transaction API URL {0}")]
    InvalidApiUrl(String),

    /// A month other than "01" to "12" or the "all months" sentinel was requested.
    #[error("\"{0}\" is not a valid month, expected a code from 01 to 12 or \"all\"")]
    InvalidMonth(String),

    /// A page size other than 10, 20 or 30 was requested.
    #[error("{0} is not a valid page size, expected 10, 20 or 30")]
    InvalidPageSize(u64),

    /// Could not acquire the lock on the board state.
    #[error("could not acquire the board state lock")]
    StateLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidMonth(_) | Error::InvalidPageSize(_) => self.into_alert_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidMonth(month) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid month",
                    &format!("\"{month}\" is not a month. Pick a month from the list."),
                )
                .into_html(),
            )
                .into_response(),
            Error::InvalidPageSize(page_size) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid page size",
                    &format!("{page_size} rows per page is not supported. Choose 10, 20 or 30."),
                )
                .into_html(),
            )
                .into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_html(),
            )
                .into_response(),
        }
    }
}
