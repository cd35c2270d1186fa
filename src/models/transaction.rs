//! This file defines the type `Transaction`, a single product sale listed on the board,
//! and `TransactionPage`, one page of the paginated transactions query.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The ID the transaction API uses for a transaction.
///
/// Some deployments of the API use numeric IDs, others use document IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    /// A numeric ID.
    Number(i64),
    /// A textual ID.
    Text(String),
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionId::Number(id) => write!(f, "{id}"),
            TransactionId::Text(id) => write!(f, "{id}"),
        }
    }
}

/// A product that was listed for sale, and whether it sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction in the remote system.
    pub id: TransactionId,
    /// The product name.
    pub title: String,
    /// The product description.
    #[serde(default)]
    pub description: String,
    /// The sale price.
    pub price: f64,
    /// The product category, e.g. "electronics".
    #[serde(default)]
    pub category: String,
    /// Whether the product was sold.
    #[serde(default)]
    pub sold: bool,
    /// A URL to an image of the product.
    #[serde(default, rename = "image", alias = "imageUrl")]
    pub image_url: String,
}

/// One page of transactions.
///
/// Replaced as a whole each time a page is fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    /// The transactions on this page, in the order the API returned them.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// The total number of transactions matching the query, if the API reports it.
    #[serde(default, alias = "total", skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl TransactionPage {
    /// Whether the page has no rows.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
