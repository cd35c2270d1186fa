//! The user controlled state of the board and the dependency keys derived from it.
//!
//! Each remote query is tied to a key computed from a slice of [ViewState].
//! A query is re-issued exactly when its key changes, see
//! [crate::controller::TransactionBoardController].

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, month::MonthFilter};

/// The number of transactions shown on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum PageSize {
    /// Ten rows per page.
    #[default]
    Ten,
    /// Twenty rows per page.
    Twenty,
    /// Thirty rows per page.
    Thirty,
}

impl PageSize {
    /// Every page size the user may choose from.
    pub const ALL: [PageSize; 3] = [PageSize::Ten, PageSize::Twenty, PageSize::Thirty];

    /// The number of rows on a page.
    pub fn get(self) -> u64 {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Thirty => 30,
        }
    }
}

impl TryFrom<u64> for PageSize {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(PageSize::Ten),
            20 => Ok(PageSize::Twenty),
            30 => Ok(PageSize::Thirty),
            other => Err(Error::InvalidPageSize(other)),
        }
    }
}

impl From<PageSize> for u64 {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// The key for the paginated transactions query.
///
/// Changes whenever the search text, month, page or page size changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionsKey {
    /// The free text search.
    pub search: String,
    /// The 1-based page number.
    pub page: u64,
    /// The number of rows per page.
    pub per_page: PageSize,
    /// The month filter.
    pub month: MonthFilter,
}

/// The key shared by the statistics and price histogram queries.
///
/// Only the month affects the aggregates, search and paging never do.
pub type AggregatesKey = MonthFilter;

/// The view state of the board.
///
/// Fields are private so that every change goes through a setter that keeps
/// the page number consistent with the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search_query: String,
    selected_month: MonthFilter,
    current_page: u64,
    items_per_page: PageSize,
    search_overlay_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(MonthFilter::All, PageSize::default())
    }
}

impl ViewState {
    /// Create the state for a freshly opened board on page 1 with no search text.
    pub fn new(selected_month: MonthFilter, items_per_page: PageSize) -> Self {
        Self {
            search_query: String::new(),
            selected_month,
            current_page: 1,
            items_per_page,
            search_overlay_open: false,
        }
    }

    /// The free text search.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The selected month, or [MonthFilter::All].
    pub fn selected_month(&self) -> MonthFilter {
        self.selected_month
    }

    /// The 1-based page number.
    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// The number of rows per page.
    pub fn items_per_page(&self) -> PageSize {
        self.items_per_page
    }

    /// Whether the search overlay for narrow screens is open.
    pub fn search_overlay_open(&self) -> bool {
        self.search_overlay_open
    }

    /// Set the search text and go back to the first page.
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
        self.current_page = 1;
    }

    /// Set the month filter and go back to the first page.
    pub fn set_month(&mut self, month: MonthFilter) {
        self.selected_month = month;
        self.current_page = 1;
    }

    /// Go to `page`. Pages below 1 are clamped to 1.
    ///
    /// There is no upper bound, a page past the end of the data is simply empty.
    pub fn set_page(&mut self, page: i64) {
        self.current_page = page.max(1) as u64;
    }

    /// Go to the previous page, does nothing on the first page.
    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    /// Go to the next page.
    pub fn next_page(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }

    /// Set the page size and go back to the first page.
    pub fn set_items_per_page(&mut self, page_size: PageSize) {
        self.items_per_page = page_size;
        self.current_page = 1;
    }

    /// Show the search overlay.
    pub fn open_search_overlay(&mut self) {
        self.search_overlay_open = true;
    }

    /// Hide the search overlay.
    pub fn close_search_overlay(&mut self) {
        self.search_overlay_open = false;
    }

    /// The key for the transactions query.
    pub fn transactions_key(&self) -> TransactionsKey {
        TransactionsKey {
            search: self.search_query.clone(),
            page: self.current_page,
            per_page: self.items_per_page,
            month: self.selected_month,
        }
    }

    /// The key for the statistics and price histogram queries.
    pub fn aggregates_key(&self) -> AggregatesKey {
        self.selected_month
    }
}
