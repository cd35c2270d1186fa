//! Board HTTP handlers.
//!
//! Every handler works on the board of the requesting browser session. POST
//! handlers turn their form into a [BoardEvent], dispatch it to that board,
//! wait up to the configured render wait for the fetches it started, and
//! render the board from a fresh snapshot.

use axum::{Form, extract::State};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRequest;
use maud::Markup;
use serde::Deserialize;

use crate::{
    AppState, Error,
    api::TransactionApi,
    controller::{BoardEvent, BoardSnapshot},
    month::MonthFilter,
    view_state::PageSize,
};

use super::view::{board_content, board_page, board_view};

/// Form data for the search fields.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    /// The search text, empty to clear the search.
    #[serde(default)]
    pub search: String,
}

/// Form data for the month selector.
#[derive(Debug, Deserialize)]
pub struct MonthForm {
    /// A two digit month code or "all".
    #[serde(default)]
    pub month: String,
}

/// Form data for jumping to a page.
#[derive(Debug, Deserialize)]
pub struct PageForm {
    /// The page to show. Values below 1 show the first page.
    pub page: i64,
}

/// Form data for the page size selector.
#[derive(Debug, Deserialize)]
pub struct PageSizeForm {
    /// The number of rows per page.
    pub per_page: u64,
}

/// Display the board.
///
/// htmx requests get just the `#board` element. A browser without a session
/// gets a new board and waits for its first load like any other event.
pub async fn get_board_page<A: TransactionApi>(
    State(state): State<AppState<A>>,
    jar: PrivateCookieJar,
    HxRequest(is_htmx_request): HxRequest,
) -> Result<(PrivateCookieJar, Markup), Error> {
    let (jar, snapshot) = apply_event(&state, jar, None).await?;

    let markup = if is_htmx_request {
        board_view(&snapshot)
    } else {
        board_page(&snapshot)
    };

    Ok((jar, markup))
}

/// Update the search text and return the refreshed `#board-content`.
pub async fn search_transactions<A: TransactionApi>(
    State(state): State<AppState<A>>,
    jar: PrivateCookieJar,
    Form(form): Form<SearchForm>,
) -> Result<(PrivateCookieJar, Markup), Error> {
    let event = BoardEvent::SetSearchQuery(form.search);
    let (jar, snapshot) = apply_event(&state, jar, Some(event)).await?;

    Ok((jar, board_content(&snapshot)))
}

/// Select a month, or all months, and return the refreshed `#board`.
pub async fn select_month<A: TransactionApi>(
    State(state): State<AppState<A>>,
    jar: PrivateCookieJar,
    Form(form): Form<MonthForm>,
) -> Result<(PrivateCookieJar, Markup), Error> {
    let month: MonthFilter = form.month.parse()?;

    render_event(&state, jar, BoardEvent::SetMonth(month)).await
}

/// Jump to the page in the form.
pub async fn go_to_page<A: TransactionApi>(
    State(state): State<AppState<A>>,
    jar: PrivateCookieJar,
    Form(form): Form<PageForm>,
) -> Result<(PrivateCookieJar, Markup), Error> {
    render_event(&state, jar, BoardEvent::SetPage(form.page)).await
}

/// Go back a page, stays on the first page.
pub async fn go_to_previous_page<A: TransactionApi>(
    State(state): State<AppState<A>>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Markup), Error> {
    render_event(&state, jar, BoardEvent::PreviousPage).await
}

/// Go forward a page.
pub async fn go_to_next_page<A: TransactionApi>(
    State(state): State<AppState<A>>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Markup), Error> {
    render_event(&state, jar, BoardEvent::NextPage).await
}

/// Change the number of rows per page and go back to the first page.
pub async fn select_page_size<A: TransactionApi>(
    State(state): State<AppState<A>>,
    jar: PrivateCookieJar,
    Form(form): Form<PageSizeForm>,
) -> Result<(PrivateCookieJar, Markup), Error> {
    let page_size = PageSize::try_from(form.per_page)?;

    render_event(&state, jar, BoardEvent::SetItemsPerPage(page_size)).await
}

/// Open the search overlay.
pub async fn open_search_overlay<A: TransactionApi>(
    State(state): State<AppState<A>>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Markup), Error> {
    render_event(&state, jar, BoardEvent::OpenSearchOverlay).await
}

/// Close the overlay and return the whole board so the inline search field
/// shows any text typed into the overlay.
pub async fn close_search_overlay<A: TransactionApi>(
    State(state): State<AppState<A>>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Markup), Error> {
    render_event(&state, jar, BoardEvent::CloseSearchOverlay).await
}

async fn render_event<A: TransactionApi>(
    state: &AppState<A>,
    jar: PrivateCookieJar,
    event: BoardEvent,
) -> Result<(PrivateCookieJar, Markup), Error> {
    let (jar, snapshot) = apply_event(state, jar, Some(event)).await?;

    Ok((jar, board_view(&snapshot)))
}

async fn apply_event<A: TransactionApi>(
    state: &AppState<A>,
    jar: PrivateCookieJar,
    event: Option<BoardEvent>,
) -> Result<(PrivateCookieJar, BoardSnapshot), Error> {
    let session = state.sessions.open(jar)?;

    let mut refresh = session.load;
    if let Some(event) = event {
        refresh = refresh.and(session.board.dispatch(event)?);
    }

    if !refresh.is_empty() {
        refresh.settled_within(state.render_wait).await;
    }

    Ok((session.jar, session.board.snapshot()?))
}
