//! Storefront Example
//!
//! Walks the full customer journey against a throwaway data directory:
//! seed the catalog, browse with filters, register, fill the cart, and
//! check out with the simulated gateway.

use anyhow::Result;

use bookstall::{
    fixtures::{new_user, payment_details, sample_catalog, shipping_address},
    prelude::*,
};

/// Storefront Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = JsonStore::new(dir.path());
    let mut credentials = CredentialService::new();

    store.save_books(&sample_catalog())?;

    let spec = FilterSpec::from_query_pairs([
        ("category", "Software"),
        ("sortBy", "price"),
        ("sortOrder", "asc"),
    ]);

    let results = query(store.books()?, &spec);

    println!("Software shelf ({} titles):", results.total);
    for book in &results.books {
        println!("  {:<30} {:>8}  by {}", book.title, book.price, book.author);
    }

    let mut session = Session::start();
    let auth = register(&store, &mut credentials, new_user("ada@example.com"))?;
    session.authenticate(&auth);

    for book in results.books.iter().take(2) {
        session.cart_mut().add(book, 1)?;
    }

    println!(
        "\nCart: {} lines, {} items, total {}",
        session.cart().len(),
        session.cart().items_count(),
        session.cart().total()
    );

    let order = checkout(&mut session, &store, &payment_details(), shipping_address())?;

    println!(
        "\nOrder {} placed: total {}, paid with {}",
        order.id, order.total, order.payment_reference
    );

    Ok(())
}
