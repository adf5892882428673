//! Books
//!
//! Catalog records and their derived rating statistics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single review left against a book.
///
/// Immutable once created; `user_id` is an opaque reference and is not
/// validated against the user collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Opaque id of the reviewing user.
    pub user_id: String,

    /// Score in `[0, 5]`.
    pub rating: Decimal,

    /// Free-text review; may be empty.
    pub review: String,
}

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque string id, unique and immutable post-creation.
    pub id: String,

    /// Book title.
    pub title: String,

    /// Book author.
    pub author: String,

    /// Category name; an open set, not restricted to the stored facet list.
    pub category: String,

    /// Non-negative price in a currency-agnostic unit.
    pub price: Decimal,

    /// Book description.
    pub description: String,

    /// Cover image URL.
    #[serde(default)]
    pub image: String,

    /// Units currently in stock.
    pub stock: u32,

    /// Reviews in the order they were left.
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl Book {
    /// Arithmetic mean of all rating scores, or zero when unrated.
    ///
    /// Always derived from `ratings` at read time, never stored, so it cannot
    /// drift when reviews change.
    #[must_use]
    pub fn average_rating(&self) -> Decimal {
        if self.ratings.is_empty() {
            return Decimal::ZERO;
        }

        let sum: Decimal = self.ratings.iter().map(|rating| rating.rating).sum();

        sum / Decimal::from(self.ratings.len())
    }
}
