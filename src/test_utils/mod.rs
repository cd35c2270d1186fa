#![allow(missing_docs)]

pub(crate) mod fake_api;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use fake_api::{ApiCall, FakeApi, sample_transaction};
pub(crate) use html::{assert_valid_html, parse_html_document, select_text};
pub(crate) use http::{
    assert_content_type, board_server, board_server_with_wait, cookieless_board_server, hx_get,
};
