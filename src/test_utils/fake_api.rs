use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use time::Month;
use tokio::sync::oneshot;

use crate::{
    Error,
    api::{TransactionApi, TransactionsQuery},
    models::{
        PriceBucket, PriceHistogram, Statistics, Transaction, TransactionId, TransactionPage,
    },
    month::MonthFilter,
};

/// A request received by [FakeApi].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    Transactions(TransactionsQuery),
    Statistics(Month),
    Histogram(MonthFilter),
}

#[derive(Debug)]
struct Script {
    calls: Vec<ApiCall>,
    failure: Option<Error>,
    page_length: usize,
    histogram_counts: Vec<u64>,
    held_searches: HashMap<String, oneshot::Receiver<()>>,
}

/// An in-memory [TransactionApi] whose responses are scripted by the test.
///
/// Each transaction on a page is titled with the search text of the request
/// so tests can tell which request a page came from. Clones share one script,
/// so a test can keep a clone to inspect the calls made by a controller.
#[derive(Debug, Clone)]
pub(crate) struct FakeApi {
    script: Arc<Mutex<Script>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                calls: Vec::new(),
                failure: None,
                page_length: 2,
                histogram_counts: vec![5, 10, 15, 7, 2, 0, 0, 0, 0, 0],
                held_searches: HashMap::new(),
            })),
        }
    }
}

impl FakeApi {
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().expect("fake API lock poisoned")
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.script().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.script().calls.clear();
    }

    /// Make every following request fail with `error`.
    pub(crate) fn fail_with(&self, error: Error) {
        self.script().failure = Some(error);
    }

    /// Undo [FakeApi::fail_with].
    pub(crate) fn recover(&self) {
        self.script().failure = None;
    }

    pub(crate) fn set_page_length(&self, length: usize) {
        self.script().page_length = length;
    }

    pub(crate) fn set_empty_pages(&self, empty: bool) {
        self.script().page_length = if empty { 0 } else { 2 };
    }

    pub(crate) fn set_histogram_counts(&self, counts: Vec<u64>) {
        self.script().histogram_counts = counts;
    }

    /// Hold the transactions response for `search` until the returned sender fires.
    pub(crate) fn hold_transactions(&self, search: &str) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.script()
            .held_searches
            .insert(search.to_owned(), receiver);
        sender
    }

    fn record(&self, call: ApiCall) -> Result<(), Error> {
        let mut script = self.script();
        script.calls.push(call);

        match &script.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

pub(crate) fn sample_transaction(id: i64, title: &str) -> Transaction {
    Transaction {
        id: TransactionId::Number(id),
        title: title.to_owned(),
        description: format!("A description of {title}"),
        price: 100.0 + id as f64,
        category: "electronics".to_owned(),
        sold: id % 2 == 0,
        image_url: format!("https://example.com/{id}.jpg"),
    }
}

impl TransactionApi for FakeApi {
    async fn transactions(&self, query: &TransactionsQuery) -> Result<TransactionPage, Error> {
        let search = query.search.clone().unwrap_or_default();
        let gate = self.script().held_searches.remove(&search);

        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.record(ApiCall::Transactions(query.clone()))?;
        let page_length = self.script().page_length;
        let first_id = (query.page as i64 - 1)
            .saturating_mul(query.per_page as i64)
            .saturating_add(1);

        Ok(TransactionPage {
            transactions: (0..page_length as i64)
                .map(|offset| sample_transaction(first_id.saturating_add(offset), &search))
                .collect(),
            total_count: None,
        })
    }

    async fn statistics(&self, month: Month) -> Result<Statistics, Error> {
        self.record(ApiCall::Statistics(month))?;

        Ok(Statistics {
            total_sale_amount: 1500.25 * month as u8 as f64,
            total_sold_items: 12,
            total_not_sold_items: 3,
        })
    }

    async fn price_histogram(&self, month: MonthFilter) -> Result<PriceHistogram, Error> {
        self.record(ApiCall::Histogram(month))?;
        let buckets: Vec<_> = self
            .script()
            .histogram_counts
            .iter()
            .map(|count| PriceBucket { count: *count })
            .collect();

        Ok(PriceHistogram::from_buckets(&buckets))
    }
}
