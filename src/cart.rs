//! Cart
//!
//! Session-owned line items with a derived monetary total. The total is
//! recomputed after every mutation and never patched by hand; that invariant
//! is the aggregator's contract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::books::Book;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity exceeds the stock captured in the line's book
    /// snapshot.
    #[error("requested {requested} of book {book_id}, but only {available} in stock")]
    StockExceeded {
        /// Id of the affected book.
        book_id: String,

        /// Quantity the line would have reached.
        requested: u32,

        /// Stock recorded in the snapshot.
        available: u32,
    },
}

/// A single cart line: a book snapshot plus the quantity ordered.
///
/// The snapshot is taken when the line is created. Later catalog price or
/// stock edits do not propagate to existing lines; the line records what the
/// shopper saw when they added it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Id of the snapshotted book.
    pub book_id: String,

    /// Units ordered; always positive while the line exists.
    pub quantity: u32,

    /// Point-in-time copy of the book.
    pub book: Book,
}

/// An ordered collection of cart lines with a derived total.
///
/// At most one line exists per book id; adding a book that already has a line
/// merges into it rather than appending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    total: Decimal,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The derived total: `Σ line.book.price × line.quantity`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities, as distinct from the line count.
    #[must_use]
    pub fn items_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Add `quantity` units of `book`, merging into an existing line for the
    /// same book id or appending a new snapshot line.
    ///
    /// Adding zero units is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockExceeded`] and leaves the cart unchanged if
    /// the resulting line quantity would exceed the snapshot's stock.
    pub fn add(&mut self, book: &Book, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Ok(());
        }

        if let Some(line) = self.items.iter_mut().find(|line| line.book_id == book.id) {
            let requested = line.quantity.saturating_add(quantity);

            if requested > line.book.stock {
                return Err(CartError::StockExceeded {
                    book_id: book.id.clone(),
                    requested,
                    available: line.book.stock,
                });
            }

            line.quantity = requested;
        } else {
            if quantity > book.stock {
                return Err(CartError::StockExceeded {
                    book_id: book.id.clone(),
                    requested: quantity,
                    available: book.stock,
                });
            }

            self.items.push(CartItem {
                book_id: book.id.clone(),
                quantity,
                book: book.clone(),
            });
        }

        self.recalculate();

        Ok(())
    }

    /// Delete the line for `book_id`; silent no-op when absent.
    pub fn remove(&mut self, book_id: &str) {
        self.items.retain(|line| line.book_id != book_id);
        self.recalculate();
    }

    /// Set the line for `book_id` to exactly `quantity` (absolute set, not a
    /// delta). Zero behaves as [`Cart::remove`]; an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockExceeded`] and leaves the cart unchanged if
    /// `quantity` exceeds the snapshot's stock.
    pub fn update_quantity(&mut self, book_id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove(book_id);
            return Ok(());
        }

        let Some(line) = self.items.iter_mut().find(|line| line.book_id == book_id) else {
            return Ok(());
        };

        if quantity > line.book.stock {
            return Err(CartError::StockExceeded {
                book_id: book_id.to_string(),
                requested: quantity,
                available: line.book.stock,
            });
        }

        line.quantity = quantity;
        self.recalculate();

        Ok(())
    }

    /// Reset to an empty cart with a zero total.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Decimal::ZERO;
    }

    fn recalculate(&mut self) {
        self.total = self
            .items
            .iter()
            .map(|line| line.book.price * Decimal::from(line.quantity))
            .sum();
    }
}
