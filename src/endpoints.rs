//! The endpoint URIs served by the board and the ones it calls on the transaction API.

/// The root route which redirects to the board.
pub const ROOT: &str = "/";
/// The transaction board page.
pub const BOARD_VIEW: &str = "/board";
/// The route for updating the search text.
pub const BOARD_SEARCH: &str = "/board/search";
/// The route for selecting a month.
pub const BOARD_MONTH: &str = "/board/month";
/// The route for jumping to a page.
pub const BOARD_PAGE: &str = "/board/page";
/// The route for the "previous" button.
pub const BOARD_PREVIOUS_PAGE: &str = "/board/page/previous";
/// The route for the "next" button.
pub const BOARD_NEXT_PAGE: &str = "/board/page/next";
/// The route for selecting the page size.
pub const BOARD_PAGE_SIZE: &str = "/board/per-page";
/// The route for opening the search overlay.
pub const OPEN_SEARCH_OVERLAY: &str = "/board/search-overlay/open";
/// The route for closing the search overlay.
pub const CLOSE_SEARCH_OVERLAY: &str = "/board/search-overlay/close";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The transaction API route for one page of transactions.
pub const API_TRANSACTIONS: &str = "/transactions";
/// The transaction API route for the statistics of a month.
pub const API_STATISTICS: &str = "/getStatistics";
/// The transaction API route for the price range histogram.
pub const API_BAR_CHART: &str = "/getBarChartData";
