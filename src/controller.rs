//! The controller that keeps the board's three datasets in sync with its view state.
//!
//! Every user input goes through [TransactionBoardController::dispatch]. The
//! controller compares the dependency keys of each query before and after the
//! input is applied and spawns a fetch only for the queries whose key changed:
//!
//! | Query        | Key                                   | Skipped when       |
//! |--------------|---------------------------------------|--------------------|
//! | transactions | search, page, page size, month        | never              |
//! | statistics   | month                                 | month is "all"     |
//! | histogram    | month                                 | never              |
//!
//! Fetches run concurrently and their responses are applied independently, in
//! whatever order they arrive. A response is only applied if the view still has
//! the key it was requested for and no newer response for the same panel has
//! been applied. Failed fetches keep the last good value.

use std::{
    fmt::Display,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::task::JoinHandle;

use crate::{
    Error,
    api::{TransactionApi, TransactionsQuery},
    models::{MonthlyStatistics, PriceHistogram, Transaction, TransactionPage},
    pagination::row_ordinal,
    view_state::{AggregatesKey, PageSize, TransactionsKey, ViewState},
};

/// A user input that changes the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// The search text was edited, in the inline field or the overlay.
    SetSearchQuery(String),
    /// A month, or all months, was selected.
    SetMonth(crate::month::MonthFilter),
    /// A specific page was requested. Values below 1 are clamped.
    SetPage(i64),
    /// The "previous" button was pressed.
    PreviousPage,
    /// The "next" button was pressed.
    NextPage,
    /// A page size was selected.
    SetItemsPerPage(PageSize),
    /// The search overlay was opened.
    OpenSearchOverlay,
    /// The search overlay was closed.
    CloseSearchOverlay,
}

impl BoardEvent {
    fn apply(self, view: &mut ViewState) {
        match self {
            BoardEvent::SetSearchQuery(text) => view.set_search_query(text),
            BoardEvent::SetMonth(month) => view.set_month(month),
            BoardEvent::SetPage(page) => view.set_page(page),
            BoardEvent::PreviousPage => view.previous_page(),
            BoardEvent::NextPage => view.next_page(),
            BoardEvent::SetItemsPerPage(page_size) => view.set_items_per_page(page_size),
            BoardEvent::OpenSearchOverlay => view.open_search_overlay(),
            BoardEvent::CloseSearchOverlay => view.close_search_overlay(),
        }
    }
}

/// The remote queries the board makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// One page of transactions.
    Transactions,
    /// The statistics for the selected month.
    Statistics,
    /// The price range histogram for the selected month.
    Histogram,
}

impl Display for FetchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FetchKind::Transactions => "transactions",
            FetchKind::Statistics => "statistics",
            FetchKind::Histogram => "price histogram",
        };

        write!(f, "{name}")
    }
}

/// The last good response for one query, plus bookkeeping for out of order responses.
#[derive(Debug, Clone)]
pub struct Panel<T> {
    value: Option<T>,
    last_error: Option<String>,
    /// Sequence number of the most recently issued request.
    issued: u64,
    /// Sequence number of the request whose response is in `value`.
    applied: u64,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            value: None,
            last_error: None,
            issued: 0,
            applied: 0,
        }
    }
}

enum Outcome {
    Applied,
    Failed(Error),
    Discarded,
}

impl<T> Panel<T> {
    /// The last successfully fetched value, `None` until the first fetch succeeds.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// The error from the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn with_value(value: T) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn complete(&mut self, sequence: u64, key_is_current: bool, result: Result<T, Error>) -> Outcome {
        if !key_is_current || sequence <= self.applied {
            return Outcome::Discarded;
        }

        match result {
            Ok(value) => {
                self.value = Some(value);
                self.applied = sequence;
                self.last_error = None;
                Outcome::Applied
            }
            Err(error) => {
                self.last_error = Some(error.to_string());
                Outcome::Failed(error)
            }
        }
    }
}

#[derive(Debug)]
struct BoardState {
    view: ViewState,
    transactions: Panel<TransactionPage>,
    statistics: Panel<MonthlyStatistics>,
    histogram: Panel<PriceHistogram>,
}

enum Fetch {
    Transactions {
        key: TransactionsKey,
        sequence: u64,
    },
    Statistics {
        month: time::Month,
        key: AggregatesKey,
        sequence: u64,
    },
    Histogram {
        key: AggregatesKey,
        sequence: u64,
    },
}

impl Fetch {
    fn kind(&self) -> FetchKind {
        match self {
            Fetch::Transactions { .. } => FetchKind::Transactions,
            Fetch::Statistics { .. } => FetchKind::Statistics,
            Fetch::Histogram { .. } => FetchKind::Histogram,
        }
    }
}

impl BoardState {
    fn issue_transactions(&mut self) -> Fetch {
        Fetch::Transactions {
            key: self.view.transactions_key(),
            sequence: self.transactions.issue(),
        }
    }

    /// The statistics fetch is skipped for all months, the histogram fetch never is.
    fn issue_aggregates(&mut self) -> Vec<Fetch> {
        let key = self.view.aggregates_key();
        let mut fetches = Vec::with_capacity(2);

        if let Some(month) = key.month() {
            fetches.push(Fetch::Statistics {
                month,
                key,
                sequence: self.statistics.issue(),
            });
        }

        fetches.push(Fetch::Histogram {
            key,
            sequence: self.histogram.issue(),
        });

        fetches
    }
}

/// The fetches started by a state change.
///
/// The fetches run in the background whether or not this is awaited.
#[derive(Debug, Default)]
pub struct Refresh {
    fetches: Vec<(FetchKind, JoinHandle<()>)>,
}

impl Refresh {
    /// The queries that were issued, in the order they were started.
    pub fn kinds(&self) -> Vec<FetchKind> {
        self.fetches.iter().map(|(kind, _)| *kind).collect()
    }

    /// Whether no query was issued.
    pub fn is_empty(&self) -> bool {
        self.fetches.is_empty()
    }

    /// Combine the fetches of `self` and `other` into one refresh.
    pub fn and(mut self, other: Refresh) -> Refresh {
        self.fetches.extend(other.fetches);
        self
    }

    /// Wait until every fetch has finished and its response has been applied or discarded.
    pub async fn settled(self) {
        for (kind, handle) in self.fetches {
            if let Err(error) = handle.await {
                tracing::error!("the {kind} fetch task failed: {error}");
            }
        }
    }

    /// Like [Refresh::settled], but give up waiting after `wait`.
    ///
    /// Returns `false` if some fetches were still running. They keep running
    /// and are applied when they complete.
    pub async fn settled_within(self, wait: Duration) -> bool {
        match tokio::time::timeout(wait, self.settled()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("fetches did not finish within {wait:?}, rendering stale data");
                false
            }
        }
    }
}

/// A copy of the board at one point in time, used for rendering.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    /// The view state.
    pub view: ViewState,
    /// The last page of transactions.
    pub transactions: Panel<TransactionPage>,
    /// The last statistics, with the month they belong to.
    pub statistics: Panel<MonthlyStatistics>,
    /// The last price histogram.
    pub histogram: Panel<PriceHistogram>,
}

impl BoardSnapshot {
    /// The rows of the current page, each paired with its display number.
    pub fn rows(&self) -> impl Iterator<Item = (u64, &Transaction)> + '_ {
        let page = self.view.current_page();
        let page_size = self.view.items_per_page();

        self.transactions
            .value()
            .map(|page| page.transactions.as_slice())
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(move |(index, transaction)| (row_ordinal(index, page, page_size), transaction))
    }

    /// The statistics panel is only shown for a single month.
    pub fn show_statistics(&self) -> bool {
        !self.view.selected_month().is_all()
    }

    /// Whether the statistics shown belong to another month than the one selected.
    ///
    /// This happens while the statistics for a new month are still loading,
    /// or after fetching them failed.
    pub fn statistics_are_outdated(&self) -> bool {
        let selected = self.view.selected_month().month();

        self.statistics
            .value()
            .is_some_and(|statistics| Some(statistics.month) != selected)
    }

    /// The histogram is only shown when there is at least one bar.
    pub fn show_histogram(&self) -> bool {
        self.histogram
            .value()
            .is_some_and(|histogram| !histogram.is_empty())
    }

    /// "Previous" is disabled on the first page.
    pub fn can_go_previous(&self) -> bool {
        self.view.current_page() > 1
    }
}

/// Owns the view state and the three datasets derived from it.
pub struct TransactionBoardController<A> {
    api: Arc<A>,
    state: Arc<Mutex<BoardState>>,
}

impl<A> std::fmt::Debug for TransactionBoardController<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionBoardController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<A: TransactionApi> TransactionBoardController<A> {
    /// Create a controller starting from `view`. Nothing is fetched until [Self::load].
    pub fn new(api: A, view: ViewState) -> Self {
        Self::with_shared_api(Arc::new(api), view)
    }

    /// Like [Self::new], for controllers that share one API client.
    pub fn with_shared_api(api: Arc<A>, view: ViewState) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(BoardState {
                view,
                transactions: Panel::default(),
                statistics: Panel::default(),
                histogram: Panel::default(),
            })),
        }
    }

    /// Fetch every dataset for the current view, e.g. when the board is first opened.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the state lock is poisoned.
    pub fn load(&self) -> Result<Refresh, Error> {
        let fetches = {
            let mut state = self.lock()?;
            let mut fetches = vec![state.issue_transactions()];
            fetches.extend(state.issue_aggregates());
            fetches
        };

        Ok(self.spawn_all(fetches))
    }

    /// Apply `event` and fetch whatever datasets depend on the part of the view it changed.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the state lock is poisoned.
    pub fn dispatch(&self, event: BoardEvent) -> Result<Refresh, Error> {
        tracing::debug!("applying board event {event:?}");

        let fetches = {
            let mut state = self.lock()?;
            let transactions_key = state.view.transactions_key();
            let aggregates_key = state.view.aggregates_key();

            event.apply(&mut state.view);

            let mut fetches = Vec::new();

            if state.view.transactions_key() != transactions_key {
                fetches.push(state.issue_transactions());
            }

            if state.view.aggregates_key() != aggregates_key {
                fetches.extend(state.issue_aggregates());
            }

            fetches
        };

        Ok(self.spawn_all(fetches))
    }

    /// Copy the current view state and datasets.
    ///
    /// # Errors
    /// Returns [Error::StateLockError] if the state lock is poisoned.
    pub fn snapshot(&self) -> Result<BoardSnapshot, Error> {
        let state = self.lock()?;

        Ok(BoardSnapshot {
            view: state.view.clone(),
            transactions: state.transactions.clone(),
            statistics: state.statistics.clone(),
            histogram: state.histogram.clone(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, BoardState>, Error> {
        self.state
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire board state lock: {error}"))
            .map_err(|_| Error::StateLockError)
    }

    fn spawn_all(&self, fetches: Vec<Fetch>) -> Refresh {
        let fetches = fetches
            .into_iter()
            .map(|fetch| {
                let kind = fetch.kind();
                let handle = tokio::spawn(run_fetch(self.api.clone(), self.state.clone(), fetch));
                (kind, handle)
            })
            .collect();

        Refresh { fetches }
    }
}

async fn run_fetch<A: TransactionApi>(api: Arc<A>, state: Arc<Mutex<BoardState>>, fetch: Fetch) {
    let kind = fetch.kind();

    match fetch {
        Fetch::Transactions { key, sequence } => {
            let result = api.transactions(&TransactionsQuery::from(&key)).await;
            complete_fetch(&state, kind, |state| {
                let is_current = state.view.transactions_key() == key;
                state.transactions.complete(sequence, is_current, result)
            });
        }
        Fetch::Statistics {
            month,
            key,
            sequence,
        } => {
            let result = api
                .statistics(month)
                .await
                .map(|statistics| MonthlyStatistics { month, statistics });
            complete_fetch(&state, kind, |state| {
                let is_current = state.view.aggregates_key() == key;
                state.statistics.complete(sequence, is_current, result)
            });
        }
        Fetch::Histogram { key, sequence } => {
            let result = api.price_histogram(key).await;
            complete_fetch(&state, kind, |state| {
                let is_current = state.view.aggregates_key() == key;
                state.histogram.complete(sequence, is_current, result)
            });
        }
    }
}

fn complete_fetch(
    state: &Mutex<BoardState>,
    kind: FetchKind,
    complete: impl FnOnce(&mut BoardState) -> Outcome,
) {
    let mut state = match state.lock() {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("could not acquire board state lock to apply {kind}: {error}");
            return;
        }
    };

    match complete(&mut state) {
        Outcome::Applied => tracing::debug!("applied {kind} response"),
        Outcome::Failed(error) => {
            tracing::warn!("could not fetch {kind}, keeping the last loaded data: {error}")
        }
        Outcome::Discarded => tracing::debug!("discarded stale {kind} response"),
    }
}
