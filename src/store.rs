//! Store
//!
//! Whole-collection JSON persistence: each collection is a single flat file
//! read and written in full, last write wins. A missing file reads as an
//! empty collection, so a fresh data directory behaves like an empty shop.
//! Durability and crash consistency are explicitly out of scope.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::{books::Book, cart::Cart, session::SessionId, users::User};

/// Errors from the flat-file store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error reading or writing a collection file.
    #[error("failed to access collection file: {0}")]
    Io(#[from] io::Error),

    /// A collection file held malformed JSON.
    #[error("failed to parse collection JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat-file JSON store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory this store reads and writes.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read a whole collection. A missing file is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file cannot be read or holds malformed
    /// JSON.
    pub fn read_all<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let path = self.collection_path(collection);

        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(path)?;
        let records = serde_json::from_str(&contents)?;

        Ok(records)
    }

    /// Replace a whole collection.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the records cannot be serialized or the
    /// file cannot be written.
    pub fn write_all<T: Serialize>(
        &self,
        collection: &str,
        records: &[T],
    ) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let contents = serde_json::to_string_pretty(records)?;
        fs::write(self.collection_path(collection), contents)?;

        debug!(collection, count = records.len(), "collection written");

        Ok(())
    }

    /// Read the book collection.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::read_all`].
    pub fn books(&self) -> Result<Vec<Book>, StoreError> {
        self.read_all("books")
    }

    /// Replace the book collection.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::write_all`].
    pub fn save_books(&self, books: &[Book]) -> Result<(), StoreError> {
        self.write_all("books", books)
    }

    /// Read the user collection.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::read_all`].
    pub fn users(&self) -> Result<Vec<User>, StoreError> {
        self.read_all("users")
    }

    /// Replace the user collection.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::write_all`].
    pub fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        self.write_all("users", users)
    }

    /// Read the precomputed category facet list.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::read_all`].
    pub fn categories(&self) -> Result<Vec<String>, StoreError> {
        self.read_all("categories")
    }

    /// Look up a book by id, reading the full collection.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::read_all`].
    pub fn book_by_id(&self, id: &str) -> Result<Option<Book>, StoreError> {
        Ok(self.books()?.into_iter().find(|book| book.id == id))
    }

    /// Look up a user by id, reading the full collection.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::read_all`].
    pub fn user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users()?.into_iter().find(|user| user.id == id))
    }

    /// Look up a user by exact email, reading the full collection.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::read_all`].
    pub fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users()?.into_iter().find(|user| user.email == email))
    }

    /// Load the persisted cart blob for a session; a missing blob is an empty
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the blob cannot be read or parsed.
    pub fn load_cart(&self, session: SessionId) -> Result<Cart, StoreError> {
        let path = self.cart_path(session);

        if !path.exists() {
            return Ok(Cart::new());
        }

        let contents = fs::read_to_string(path)?;
        let cart = serde_json::from_str(&contents)?;

        Ok(cart)
    }

    /// Persist a session's cart as a whole blob.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the blob cannot be serialized or written.
    pub fn save_cart(&self, session: SessionId, cart: &Cart) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let contents = serde_json::to_string_pretty(cart)?;
        fs::write(self.cart_path(session), contents)?;

        debug!(%session, "cart written");

        Ok(())
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    fn cart_path(&self, session: SessionId) -> PathBuf {
        self.dir.join(format!("cart-{session}.json"))
    }
}
