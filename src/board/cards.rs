//! The statistics card for the selected month.

use maud::{Markup, html};

use crate::{html::format_currency, models::MonthlyStatistics, month::MonthFilter};

const STAT_ROW_STYLE: &str = "flex justify-between gap-8 py-2 border-b last:border-b-0 \
    border-gray-200 dark:border-gray-700";

/// Render the last loaded totals, headed with the month they cover.
///
/// Shows a placeholder for `selected` until the first statistics response arrives.
pub(super) fn statistics_card(
    selected: MonthFilter,
    statistics: Option<&MonthlyStatistics>,
) -> Markup {
    let month = statistics.map_or(selected, |statistics| MonthFilter::Only(statistics.month));

    html! {
        section
            id="statistics"
            class="w-full max-w-sm p-4 mb-4 rounded-lg shadow bg-white dark:bg-gray-800"
        {
            h3 class="text-xl font-semibold mb-4" { "Statistics of " (month.label()) }

            @if let Some(MonthlyStatistics { statistics, .. }) = statistics {
                dl
                {
                    div class=(STAT_ROW_STYLE)
                    {
                        dt { "Total Sale Amount" }
                        dd class="font-semibold" { (format_currency(statistics.total_sale_amount)) }
                    }

                    div class=(STAT_ROW_STYLE)
                    {
                        dt { "Total Sold Items" }
                        dd class="font-semibold" { (statistics.total_sold_items) }
                    }

                    div class=(STAT_ROW_STYLE)
                    {
                        dt { "Total Not Sold Items" }
                        dd class="font-semibold" { (statistics.total_not_sold_items) }
                    }
                }
            } @else {
                p class="text-sm text-gray-500 dark:text-gray-400" { "No statistics loaded yet." }
            }
        }
    }
}
