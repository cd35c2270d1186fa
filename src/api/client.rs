//! An HTTP client for the transaction API.

use reqwest::{Client, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Error,
    api::{MonthQuery, TransactionApi, TransactionsQuery},
    endpoints,
    models::{PriceHistogram, Statistics, TransactionPage},
    month::MonthFilter,
};

/// Queries the transaction API over HTTP.
///
/// Requests have no timeout and are never retried. A request that hangs
/// simply never updates the board.
#[derive(Debug, Clone)]
pub struct HttpTransactionApi {
    client: Client,
    base_url: Url,
}

impl HttpTransactionApi {
    /// Create a client for the API served at `base_url`, e.g. "http://localhost:5000".
    ///
    /// # Errors
    /// Returns [Error::InvalidApiUrl] if `base_url` is not an absolute HTTP(S) URL.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|error| Error::InvalidApiUrl(format!("{base_url}: {error}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidApiUrl(format!(
                "{base_url}: expected an http or https URL"
            )));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// The URL for `path` with `query` encoded as the query string.
    fn url(&self, path: &str, query: &impl Serialize) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{base_path}{path}"));

        let query_string = serde_urlencoded::to_string(query)
            .map_err(|error| Error::InvalidApiUrl(error.to_string()))?;
        url.set_query((!query_string.is_empty()).then_some(query_string.as_str()));

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.url(path, query)?;
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| Error::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| Error::Transport(error.to_string()))?;

        serde_json::from_slice(&body).map_err(|error| {
            tracing::debug!(
                "could not parse response from {url}: {}",
                String::from_utf8_lossy(&body)
            );
            Error::MalformedResponse(error.to_string())
        })
    }
}

impl TransactionApi for HttpTransactionApi {
    async fn transactions(&self, query: &TransactionsQuery) -> Result<TransactionPage, Error> {
        self.get_json(endpoints::API_TRANSACTIONS, query).await
    }

    async fn statistics(&self, month: time::Month) -> Result<Statistics, Error> {
        self.get_json(
            endpoints::API_STATISTICS,
            &MonthQuery::from(MonthFilter::Only(month)),
        )
        .await
    }

    async fn price_histogram(&self, month: MonthFilter) -> Result<PriceHistogram, Error> {
        self.get_json(endpoints::API_BAR_CHART, &MonthQuery::from(month))
            .await
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::RawQuery,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
    };
    use serde_json::json;
    use time::Month;
    use tokio::net::TcpListener;

    use crate::{
        Error,
        api::{TransactionApi, TransactionsQuery},
        endpoints,
        models::TransactionId,
        month::MonthFilter,
    };

    use super::HttpTransactionApi;

    /// Echoes the query string back as the title of a single transaction.
    async fn echo_transactions(RawQuery(query): RawQuery) -> Json<serde_json::Value> {
        Json(json!({
            "transactions": [
                { "id": 7, "title": query.unwrap_or_default(), "price": 12.5 }
            ]
        }))
    }

    async fn statistics(RawQuery(query): RawQuery) -> Response {
        if query.as_deref() != Some("month=03") {
            return StatusCode::BAD_REQUEST.into_response();
        }

        Json(json!({ "totalSaleAmount": 100.0, "totalSoldItems": 2, "totalNotSoldItems": 1 }))
            .into_response()
    }

    async fn bar_chart(RawQuery(query): RawQuery) -> Json<serde_json::Value> {
        // A count of 1 means a query string was sent.
        let count = if query.is_some() { 1 } else { 0 };
        Json(json!([{ "range": "0-100", "count": count }]))
    }

    async fn spawn_api(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{addr}")
    }

    async fn spawn_fake_api() -> String {
        spawn_api(
            Router::new()
                .route(endpoints::API_TRANSACTIONS, get(echo_transactions))
                .route(endpoints::API_STATISTICS, get(statistics))
                .route(endpoints::API_BAR_CHART, get(bar_chart)),
        )
        .await
    }

    #[tokio::test]
    async fn sends_transaction_query_parameters() {
        let api = HttpTransactionApi::new(&spawn_fake_api().await).unwrap();
        let query = TransactionsQuery {
            search: Some("blue shirt".to_owned()),
            page: 3,
            per_page: 10,
            month: Some("11".to_owned()),
        };

        let page = api.transactions(&query).await.unwrap();

        assert_eq!(page.transactions.len(), 1);
        assert_eq!(page.transactions[0].id, TransactionId::Number(7));
        assert_eq!(
            page.transactions[0].title,
            "search=blue+shirt&page=3&perPage=10&month=11"
        );
    }

    #[tokio::test]
    async fn fetches_statistics_for_month() {
        let api = HttpTransactionApi::new(&spawn_fake_api().await).unwrap();

        let statistics = api.statistics(Month::March).await.unwrap();

        assert_eq!(statistics.total_sale_amount, 100.0);
        assert_eq!(statistics.total_sold_items, 2);
        assert_eq!(statistics.total_not_sold_items, 1);
    }

    #[tokio::test]
    async fn histogram_omits_month_for_all_months() {
        let api = HttpTransactionApi::new(&spawn_fake_api().await).unwrap();

        let all = api.price_histogram(MonthFilter::All).await.unwrap();
        let march = api
            .price_histogram(MonthFilter::Only(Month::March))
            .await
            .unwrap();

        assert_eq!(all.counts(), &[0]);
        assert_eq!(march.counts(), &[1]);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let api = HttpTransactionApi::new(&spawn_fake_api().await).unwrap();

        let result = api.statistics(Month::April).await;

        assert_eq!(result, Err(Error::UnexpectedStatus(400)));
    }

    #[tokio::test]
    async fn malformed_body_is_reported() {
        let base_url = spawn_api(Router::new().route(
            endpoints::API_TRANSACTIONS,
            get(|| async { "<html>not json</html>" }),
        ))
        .await;
        let api = HttpTransactionApi::new(&base_url).unwrap();
        let query = TransactionsQuery {
            search: None,
            page: 1,
            per_page: 10,
            month: None,
        };

        let result = api.transactions(&query).await;

        assert!(
            matches!(result, Err(Error::MalformedResponse(_))),
            "want malformed response error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_error() {
        // Bind then drop a listener to get a port that nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = HttpTransactionApi::new(&format!("http://{addr}")).unwrap();

        let result = api.statistics(Month::May).await;

        assert!(
            matches!(result, Err(Error::Transport(_))),
            "want transport error, got {result:?}"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            HttpTransactionApi::new("not a url"),
            Err(Error::InvalidApiUrl(_))
        ));
        assert!(matches!(
            HttpTransactionApi::new("ftp://example.com"),
            Err(Error::InvalidApiUrl(_))
        ));
    }

    #[test]
    fn keeps_base_path_prefix() {
        let api = HttpTransactionApi::new("http://example.com/api/").unwrap();

        let url = api
            .url(endpoints::API_TRANSACTIONS, &[("page", "1")])
            .unwrap();

        assert_eq!(url.as_str(), "http://example.com/api/transactions?page=1");
    }
}
