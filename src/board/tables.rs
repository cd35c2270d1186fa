//! The transaction table and the pagination bar under it.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    controller::BoardSnapshot,
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_SELECT_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_currency,
    },
    models::Transaction,
    pagination::{PaginationIndicator, create_pagination_indicators},
    view_state::PageSize,
};

/// The max number of graphemes to display in a description before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 60;

const COLUMN_HEADERS: [&str; 8] = [
    "No.",
    "ID",
    "Title",
    "Description",
    "Price",
    "Category",
    "Sold",
    "Image",
];

/// Render the rows of the current page.
///
/// An empty page renders a single row saying there is nothing to show, so
/// the pagination bar stays in place.
pub(super) fn transactions_table(snapshot: &BoardSnapshot) -> Markup {
    let mut rows = snapshot.rows().peekable();
    let is_empty = rows.peek().is_none();

    html! {
        div class="w-full overflow-x-auto rounded-lg shadow"
        {
            table id="transactions-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for header in COLUMN_HEADERS {
                            th scope="col" class="px-6 py-3" { (header) }
                        }
                    }
                }

                tbody
                {
                    @for (ordinal, transaction) in rows {
                        (transaction_row(ordinal, transaction))
                    }

                    @if is_empty {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan=(COLUMN_HEADERS.len()) class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions found."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row(ordinal: u64, transaction: &Transaction) -> Markup {
    let (description, tooltip) = format_description(&transaction.description);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
            {
                (ordinal)
            }
            td class=(TABLE_CELL_STYLE) { (transaction.id) }
            td class=(TABLE_CELL_STYLE) { (transaction.title) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"} { (format_currency(transaction.price)) }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class=(TABLE_CELL_STYLE) { @if transaction.sold { "Yes" } @else { "No" } }
            td class=(TABLE_CELL_STYLE)
            {
                @if !transaction.image_url.is_empty() {
                    img src=(transaction.image_url) alt=(transaction.title) width="50" loading="lazy";
                }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        return (description.to_owned(), None);
    }

    let truncated: String = description
        .graphemes(true)
        .take(MAX_DESCRIPTION_GRAPHEMES - 3)
        .collect();

    (truncated + "...", Some(description))
}

/// Render the "Previous" and "Next" buttons, the page number and the page size selector.
pub(super) fn pagination_bar(snapshot: &BoardSnapshot) -> Markup {
    let indicators = create_pagination_indicators(snapshot.view.current_page());
    let selected_page_size = snapshot.view.items_per_page();

    html! {
        nav
            aria-label="Transaction pages"
            class="flex flex-wrap items-center justify-between gap-4 w-full py-4"
        {
            div class="flex items-center gap-4"
            {
                @for indicator in indicators {
                    @match indicator {
                        PaginationIndicator::BackButton(previous) => {
                            button
                                type="button"
                                class=(BUTTON_SECONDARY_STYLE)
                                hx-post=(endpoints::BOARD_PREVIOUS_PAGE)
                                hx-target="#board"
                                hx-swap="outerHTML"
                                hx-target-error="#alert-container"
                                title=[previous.map(|page| format!("Go to page {page}"))]
                                disabled[previous.is_none()]
                            {
                                "Previous"
                            }
                        }
                        PaginationIndicator::CurrPage(page) => {
                            span id="current-page" class="text-sm font-medium" { "Page No: " (page) }
                        }
                        PaginationIndicator::NextButton(next) => {
                            button
                                type="button"
                                class=(BUTTON_SECONDARY_STYLE)
                                hx-post=(endpoints::BOARD_NEXT_PAGE)
                                hx-target="#board"
                                hx-swap="outerHTML"
                                hx-target-error="#alert-container"
                                title=(format!("Go to page {next}"))
                            {
                                "Next"
                            }
                        }
                    }
                }
            }

            form
                hx-post=(endpoints::BOARD_PAGE_SIZE)
                hx-trigger="change"
                hx-target="#board"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                class="flex items-center gap-2"
            {
                label for="per-page" class="text-sm font-medium" { "Per Page:" }

                select id="per-page" name="per_page" class=(FORM_SELECT_STYLE)
                {
                    @for page_size in PageSize::ALL {
                        option value=(page_size) selected[page_size == selected_page_size]
                        {
                            (page_size)
                        }
                    }
                }
            }
        }
    }
}
