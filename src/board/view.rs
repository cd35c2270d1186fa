//! The board page and the fragments htmx swaps into it.
//!
//! The page is split into two nested targets:
//! - `#board` holds the controls, the content and the search overlay. It is
//!   replaced after every event except a search.
//! - `#board-content` holds the notices, the table, the pagination bar, the
//!   statistics card and the chart. A search replaces only this part so the
//!   search field being typed in keeps its focus.

use maud::{Markup, html};

use crate::{
    controller::{BoardSnapshot, FetchKind},
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, ICON_BUTTON_STYLE,
        PAGE_CONTAINER_STYLE, base, loading_spinner, search_icon,
    },
    month::{ALL_MONTHS_VALUE, MonthFilter},
};

use super::{
    cards::statistics_card,
    charts::{chart_view, price_histogram_chart},
    tables::{pagination_bar, transactions_table},
};

const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// The ID of the search field in the search overlay.
const OVERLAY_SEARCH_INPUT_ID: &str = "overlay-search";

/// The full board page.
pub(super) fn board_page(snapshot: &BoardSnapshot) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            (board_view(snapshot))
        }
    };

    base(
        "Board",
        &[HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())],
        &content,
    )
}

/// The controls, the content and, if open, the search overlay.
pub(super) fn board_view(snapshot: &BoardSnapshot) -> Markup {
    html! {
        div id="board" class="w-full max-w-screen-xl space-y-4"
        {
            header class="flex flex-wrap items-end justify-between gap-4"
            {
                h1 class="text-3xl font-bold" { "Transaction Board" }

                div class="flex flex-wrap items-end gap-4"
                {
                    (search_form(snapshot.view.search_query(), "inline-search", false))

                    button
                        type="button"
                        class=(ICON_BUTTON_STYLE)
                        aria-label="Open search"
                        hx-post=(endpoints::OPEN_SEARCH_OVERLAY)
                        hx-target="#board"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        (search_icon())
                    }

                    (month_select(snapshot.view.selected_month()))
                }
            }

            (board_content(snapshot))

            @if snapshot.view.search_overlay_open() {
                (search_overlay(snapshot.view.search_query()))
            }
        }
    }
}

/// Everything that depends on the fetched data.
pub(super) fn board_content(snapshot: &BoardSnapshot) -> Markup {
    let failures = [
        (FetchKind::Transactions, snapshot.transactions.last_error()),
        (FetchKind::Statistics, snapshot.statistics.last_error()),
        (FetchKind::Histogram, snapshot.histogram.last_error()),
    ];
    let month = snapshot.view.selected_month();

    html! {
        div id="board-content" class="w-full space-y-4"
        {
            @for (kind, error) in failures {
                @if let Some(error) = error {
                    (stale_data_notice(kind, error))
                }
            }

            @if snapshot.show_statistics()
                && snapshot.statistics_are_outdated()
                && snapshot.statistics.last_error().is_none()
            {
                div
                    role="status"
                    data-fetch-kind=(FetchKind::Statistics)
                    class=(NOTICE_STYLE)
                {
                    "Still loading the statistics of " (month.label()) "."
                }
            }

            (transactions_table(snapshot))
            (pagination_bar(snapshot))

            div class="grid grid-cols-1 lg:grid-cols-3 gap-4 items-start"
            {
                @if snapshot.show_statistics() {
                    (statistics_card(month, snapshot.statistics.value()))
                }

                @if let Some(histogram) = snapshot.histogram.value().filter(|_| snapshot.show_histogram()) {
                    div class="lg:col-span-2"
                    {
                        (chart_view(&price_histogram_chart(histogram, &month.label())))
                    }
                }
            }
        }
    }
}

const NOTICE_STYLE: &str =
    "p-3 text-sm rounded-lg text-amber-800 bg-amber-50 dark:bg-gray-800 dark:text-amber-300";

fn stale_data_notice(kind: FetchKind, error: &str) -> Markup {
    html! {
        div
            role="status"
            data-fetch-kind=(kind)
            class=(NOTICE_STYLE)
            title=(error)
        {
            "Could not refresh the " (kind) ", showing the last loaded data."
        }
    }
}

fn search_form(query: &str, input_id: &str, autofocus: bool) -> Markup {
    html! {
        form
            hx-post=(endpoints::BOARD_SEARCH)
            hx-trigger="input changed delay:300ms, search"
            hx-target="#board-content"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="flex items-center gap-2"
        {
            label for=(input_id) class="sr-only" { "Search transaction" }

            input
                id=(input_id)
                type="search"
                name="search"
                value=(query)
                placeholder="Search transaction"
                autocomplete="off"
                autofocus[autofocus]
                class=(FORM_TEXT_INPUT_STYLE);

            span class="htmx-indicator" { (loading_spinner()) }
        }
    }
}

fn month_select(selected: MonthFilter) -> Markup {
    html! {
        form
            hx-post=(endpoints::BOARD_MONTH)
            hx-trigger="change"
            hx-target="#board"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
        {
            label for="month" class=(FORM_LABEL_STYLE) { "Month" }

            select id="month" name="month" class=(FORM_SELECT_STYLE)
            {
                option value=(ALL_MONTHS_VALUE) selected[selected.is_all()] { (MonthFilter::All.label()) }

                @for month in MonthFilter::MONTHS {
                    @let filter = MonthFilter::Only(month);
                    option value=(filter.form_value()) selected[filter == selected] { (month) }
                }
            }
        }
    }
}

fn search_overlay(query: &str) -> Markup {
    html! {
        div
            id="search-overlay"
            role="dialog"
            aria-modal="true"
            aria-label="Search transactions"
            class="fixed inset-0 z-40 flex items-start justify-center pt-24 bg-gray-900/50"
        {
            div class="w-full max-w-lg p-4 rounded-lg shadow bg-white dark:bg-gray-800"
            {
                div class="flex items-center justify-between mb-4"
                {
                    h2 class="text-lg font-semibold" { "Search" }

                    button
                        type="button"
                        class=(ICON_BUTTON_STYLE)
                        aria-label="Close search"
                        hx-post=(endpoints::CLOSE_SEARCH_OVERLAY)
                        hx-target="#board"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "✕"
                    }
                }

                (search_form(query, OVERLAY_SEARCH_INPUT_ID, true))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;
    use time::Month;

    use crate::{
        controller::{BoardSnapshot, Panel},
        models::{MonthlyStatistics, PriceBucket, PriceHistogram, Statistics, TransactionPage},
        month::MonthFilter,
        test_utils::{assert_valid_html, select_text},
        view_state::{PageSize, ViewState},
    };

    use super::{board_page, board_view};

    fn snapshot(month: MonthFilter) -> BoardSnapshot {
        BoardSnapshot {
            view: ViewState::new(month, PageSize::Ten),
            transactions: Panel::with_value(TransactionPage::default()),
            statistics: Panel::with_value(MonthlyStatistics {
                month: Month::March,
                statistics: Statistics {
                    total_sale_amount: 10.0,
                    total_sold_items: 1,
                    total_not_sold_items: 0,
                },
            }),
            histogram: Panel::with_value(PriceHistogram::from_buckets(&[
                PriceBucket { count: 1 },
                PriceBucket { count: 2 },
            ])),
        }
    }

    fn render_board(snapshot: &BoardSnapshot) -> Html {
        Html::parse_fragment(&board_view(snapshot).into_string())
    }

    #[test]
    fn full_page_is_valid_html() {
        let html = Html::parse_document(
            &board_page(&snapshot(MonthFilter::Only(Month::March))).into_string(),
        );

        assert_valid_html(&html);
        assert_eq!(select_text(&html, "h1"), vec!["Transaction Board"]);
        assert_eq!(select_text(&html, "title"), vec!["Board - Transaction Board"]);
    }

    #[test]
    fn month_select_lists_all_months_and_selects_current() {
        let html = render_board(&snapshot(MonthFilter::Only(Month::March)));

        let options = select_text(&html, "select[name='month'] option");
        assert_eq!(options.len(), 13);
        assert_eq!(options[0], "All Months");
        assert_eq!(options[3], "March");
        assert_eq!(
            select_text(&html, "select[name='month'] option[selected]"),
            vec!["March"]
        );
    }

    #[test]
    fn single_month_shows_statistics_and_chart() {
        let html = render_board(&snapshot(MonthFilter::Only(Month::March)));

        assert_eq!(select_text(&html, "#statistics h3"), vec!["Statistics of March"]);
        assert_eq!(select_text(&html, "#price-histogram-chart").len(), 1);
    }

    #[test]
    fn statistics_of_previous_month_are_labelled_and_flagged() {
        let html = render_board(&snapshot(MonthFilter::Only(Month::July)));

        assert_eq!(select_text(&html, "#statistics h3"), vec!["Statistics of March"]);
        assert_eq!(
            select_text(&html, "div[role='status']"),
            vec!["Still loading the statistics of July."]
        );
    }

    #[test]
    fn current_statistics_have_no_notice() {
        let html = render_board(&snapshot(MonthFilter::Only(Month::March)));

        assert!(select_text(&html, "div[role='status']").is_empty());
    }

    #[test]
    fn all_months_hides_statistics_but_keeps_chart() {
        let html = render_board(&snapshot(MonthFilter::All));

        assert!(select_text(&html, "#statistics").is_empty());
        assert_eq!(select_text(&html, "#price-histogram-chart").len(), 1);
    }

    #[test]
    fn empty_histogram_hides_chart() {
        let mut snapshot = snapshot(MonthFilter::Only(Month::March));
        snapshot.histogram = Panel::with_value(PriceHistogram::from_buckets(&[]));

        let html = render_board(&snapshot);

        assert!(select_text(&html, "#price-histogram-chart").is_empty());
    }

    #[test]
    fn overlay_is_only_rendered_when_open() {
        let mut snapshot = snapshot(MonthFilter::Only(Month::March));
        snapshot.view.set_search_query("lamp");

        let closed = render_board(&snapshot);
        snapshot.view.open_search_overlay();
        let open = render_board(&snapshot);

        assert!(select_text(&closed, "#search-overlay").is_empty());
        assert_eq!(select_text(&open, "#search-overlay").len(), 1);
    }

    #[test]
    fn both_search_fields_show_the_same_query() {
        let mut snapshot = snapshot(MonthFilter::Only(Month::March));
        snapshot.view.set_search_query("lamp");
        snapshot.view.open_search_overlay();

        let html = render_board(&snapshot);
        let selector = scraper::Selector::parse("input[name='search']").unwrap();
        let values: Vec<_> = html
            .select(&selector)
            .map(|input| input.value().attr("value").unwrap_or_default())
            .collect();

        assert_eq!(values, vec!["lamp", "lamp"]);
    }
}
