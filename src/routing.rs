//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    api::TransactionApi,
    board::{
        close_search_overlay, get_board_page, go_to_next_page, go_to_page, go_to_previous_page,
        open_search_overlay, search_transactions, select_month, select_page_size,
    },
    endpoints,
    error_pages::{get_404_not_found, get_internal_server_error_page},
};

/// Return a router with all the app's routes.
pub fn build_router<A: TransactionApi>(state: AppState<A>) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::BOARD_VIEW, get(get_board_page::<A>))
        .route(endpoints::BOARD_SEARCH, post(search_transactions::<A>))
        .route(endpoints::BOARD_MONTH, post(select_month::<A>))
        .route(endpoints::BOARD_PAGE, post(go_to_page::<A>))
        .route(endpoints::BOARD_PREVIOUS_PAGE, post(go_to_previous_page::<A>))
        .route(endpoints::BOARD_NEXT_PAGE, post(go_to_next_page::<A>))
        .route(endpoints::BOARD_PAGE_SIZE, post(select_page_size::<A>))
        .route(endpoints::OPEN_SEARCH_OVERLAY, post(open_search_overlay::<A>))
        .route(endpoints::CLOSE_SEARCH_OVERLAY, post(close_search_overlay::<A>))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the board.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::BOARD_VIEW)
}
