//! Settings for serving the board, collected from the command line by the server binary.

use std::time::Duration;

use time::Month;

use crate::{
    month::MonthFilter,
    sessions::DEFAULT_MAX_SESSIONS,
    view_state::{PageSize, ViewState},
};

/// How long a board request waits for its fetches before rendering what it has.
pub const DEFAULT_RENDER_WAIT: Duration = Duration::from_millis(2000);

/// The settings for a board server.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// The base URL of the transaction API, e.g. "http://localhost:5000".
    pub api_url: String,
    /// The month selected when the board is first opened.
    pub initial_month: MonthFilter,
    /// The page size selected when the board is first opened.
    pub initial_page_size: PageSize,
    /// The longest a board request waits for the fetches it started.
    ///
    /// Fetches that take longer keep running in the background and show up
    /// on the next render.
    pub render_wait: Duration,
    /// The most browser sessions, each with its own board, kept in memory.
    pub max_sessions: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_owned(),
            initial_month: MonthFilter::Only(Month::March),
            initial_page_size: PageSize::default(),
            render_wait: DEFAULT_RENDER_WAIT,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl BoardConfig {
    /// The view state the board starts from.
    pub fn view_state(&self) -> ViewState {
        ViewState::new(self.initial_month, self.initial_page_size)
    }
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::{month::MonthFilter, view_state::PageSize};

    use super::BoardConfig;

    #[test]
    fn board_opens_on_march() {
        let view = BoardConfig::default().view_state();

        assert_eq!(view.selected_month(), MonthFilter::Only(Month::March));
        assert_eq!(view.items_per_page(), PageSize::Ten);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.search_query(), "");
        assert!(!view.search_overlay_open());
    }
}
