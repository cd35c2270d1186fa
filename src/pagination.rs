//! This modules defines the arithmetic for paging through transactions.
//!
//! The board never knows how many pages exist. "Next" is always enabled and
//! an empty page tells the user they have gone past the end of the data.

use crate::view_state::PageSize;

/// The number shown next to the `index`-th row (0-based) on `page`.
///
/// This is a display number only, it is not the transaction's ID.
/// Page numbers have no upper bound, so the number saturates at [u64::MAX].
pub fn row_ordinal(index: usize, page: u64, page_size: PageSize) -> u64 {
    (page.max(1) - 1)
        .saturating_mul(page_size.get())
        .saturating_add(index as u64)
        .saturating_add(1)
}

/// A button in the pagination bar.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// Go back a page. `None` when already on the first page.
    BackButton(Option<u64>),
    /// The page currently shown.
    CurrPage(u64),
    /// Go forward a page.
    NextButton(u64),
}

/// Create the buttons for the pagination bar.
pub fn create_pagination_indicators(curr_page: u64) -> [PaginationIndicator; 3] {
    let curr_page = curr_page.max(1);
    let previous = (curr_page > 1).then(|| curr_page - 1);

    [
        PaginationIndicator::BackButton(previous),
        PaginationIndicator::CurrPage(curr_page),
        PaginationIndicator::NextButton(curr_page.saturating_add(1)),
    ]
}

#[cfg(test)]
mod tests {
    use crate::{
        pagination::{PaginationIndicator, create_pagination_indicators, row_ordinal},
        view_state::PageSize,
    };

    #[test]
    fn first_row_of_third_page() {
        assert_eq!(row_ordinal(0, 3, PageSize::Ten), 21);
    }

    #[test]
    fn ordinals_continue_across_pages() {
        let first_page_last_row = row_ordinal(19, 1, PageSize::Twenty);
        let second_page_first_row = row_ordinal(0, 2, PageSize::Twenty);

        assert_eq!(first_page_last_row, 20);
        assert_eq!(second_page_first_row, 21);
    }

    #[test]
    fn ordinals_with_largest_page_size() {
        assert_eq!(row_ordinal(4, 2, PageSize::Thirty), 35);
    }

    #[test]
    fn ordinal_saturates_on_huge_pages() {
        assert_eq!(row_ordinal(0, u64::MAX, PageSize::Thirty), u64::MAX);
        assert_eq!(row_ordinal(5, i64::MAX as u64, PageSize::Ten), u64::MAX);
    }

    #[test]
    fn back_button_disabled_on_first_page() {
        let want = [
            PaginationIndicator::BackButton(None),
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(1);

        assert_eq!(want, got);
    }

    #[test]
    fn shows_both_buttons_past_first_page() {
        let want = [
            PaginationIndicator::BackButton(Some(3)),
            PaginationIndicator::CurrPage(4),
            PaginationIndicator::NextButton(5),
        ];

        let got = create_pagination_indicators(4);

        assert_eq!(want, got);
    }
}
