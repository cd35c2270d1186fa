use serde::{Deserialize, Serialize};
use time::Month;

/// Sales totals for a single month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The total price of the items sold in the month.
    pub total_sale_amount: f64,
    /// The number of items sold in the month.
    pub total_sold_items: u64,
    /// The number of items listed in the month that did not sell.
    pub total_not_sold_items: u64,
}

/// [Statistics] together with the month they were fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStatistics {
    /// The month the totals cover.
    pub month: Month,
    /// The totals.
    pub statistics: Statistics,
}
