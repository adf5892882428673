//! Bookstall
//!
//! Bookstall is the core of a small bookshop storefront backed by flat JSON
//! collections: an in-memory catalog query engine, a session-scoped cart
//! aggregator, and the thin persistence, credential, and checkout
//! collaborators around them.

pub mod auth;
pub mod books;
pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod orders;
pub mod prelude;
pub mod session;
pub mod store;
pub mod users;
