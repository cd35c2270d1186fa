//! The read-only transaction API that the board queries.
//!
//! [TransactionApi] is the seam between the board and the remote service.
//! [HttpTransactionApi] talks to the real service, tests use a scripted fake.

use std::future::Future;

use serde::Serialize;

use crate::{
    Error,
    models::{PriceHistogram, Statistics, TransactionPage},
    month::MonthFilter,
    view_state::TransactionsKey,
};

mod client;

pub use client::HttpTransactionApi;

/// The query parameters for one page of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// Free text search, omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// The 1-based page number.
    pub page: u64,
    /// The number of transactions per page.
    pub per_page: u64,
    /// Two digit month code, omitted for all months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl From<&TransactionsKey> for TransactionsQuery {
    fn from(key: &TransactionsKey) -> Self {
        Self {
            search: (!key.search.is_empty()).then(|| key.search.clone()),
            page: key.page,
            per_page: key.per_page.get(),
            month: key.month.code(),
        }
    }
}

/// The query parameters for the statistics and bar chart endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthQuery {
    /// Two digit month code, omitted for all months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl From<MonthFilter> for MonthQuery {
    fn from(month: MonthFilter) -> Self {
        Self {
            month: month.code(),
        }
    }
}

/// The queries the board makes against the transaction API.
pub trait TransactionApi: Send + Sync + 'static {
    /// Get one page of transactions matching `query`.
    fn transactions(
        &self,
        query: &TransactionsQuery,
    ) -> impl Future<Output = Result<TransactionPage, Error>> + Send;

    /// Get the sales statistics for a single month.
    fn statistics(&self, month: time::Month)
    -> impl Future<Output = Result<Statistics, Error>> + Send;

    /// Get the number of items in each price range for `month`.
    fn price_histogram(
        &self,
        month: MonthFilter,
    ) -> impl Future<Output = Result<PriceHistogram, Error>> + Send;
}
