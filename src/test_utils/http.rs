use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestResponse, TestServer};

use crate::{AppState, build_router, config::BoardConfig, endpoints, test_utils::FakeApi};

/// A test server for a board backed by `api`.
///
/// The server acts as one browser: it keeps its session cookie, and its board
/// has already been opened and loaded.
pub(crate) async fn board_server(api: FakeApi) -> TestServer {
    board_server_with_wait(api, Duration::from_secs(5)).await
}

/// Like [board_server], with handlers waiting at most `render_wait` for their fetches.
pub(crate) async fn board_server_with_wait(api: FakeApi, render_wait: Duration) -> TestServer {
    let config = BoardConfig {
        render_wait,
        ..BoardConfig::default()
    };
    let state = AppState::new(api, &config);

    let mut server =
        TestServer::try_new(build_router(state)).expect("Could not create test server.");
    server.save_cookies();
    server.get(endpoints::BOARD_VIEW).await.assert_status_ok();

    server
}

/// A test server for a board backed by `api` that does not keep cookies,
/// so every request without an explicit cookie comes from a new browser.
pub(crate) fn cookieless_board_server(api: FakeApi) -> TestServer {
    let state = AppState::new(api, &BoardConfig::default());

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// Send a GET request the way htmx does.
pub(crate) async fn hx_get(server: &TestServer, path: &str) -> TestResponse {
    server
        .get(path)
        .add_header(
            HeaderName::from_static("hx-request"),
            HeaderValue::from_static("true"),
        )
        .await
}

#[track_caller]
pub(crate) fn assert_content_type(response: &TestResponse, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}
