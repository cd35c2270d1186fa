//! The transaction board page.
//!
//! Shows one page of transactions with search, month and page controls, the
//! statistics for the selected month and a bar chart of how many items fall
//! in each price range.

mod cards;
mod charts;
mod handlers;
mod tables;
mod view;

pub use charts::{ChartTheme, register_chart_theme};
pub use handlers::{
    close_search_overlay, get_board_page, go_to_next_page, go_to_page, go_to_previous_page,
    open_search_overlay, search_transactions, select_month, select_page_size,
};
