//! This module defines the data returned by the transaction API.

pub use histogram::{PriceHistogram, PriceRange};
pub use statistics::{MonthlyStatistics, Statistics};
pub use transaction::{Transaction, TransactionId, TransactionPage};

#[cfg(test)]
pub(crate) use histogram::PriceBucket;

mod histogram;
mod statistics;
mod transaction;
