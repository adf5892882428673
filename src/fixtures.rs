//! Fixtures
//!
//! Hand-built catalog and registration records shared by the unit and
//! integration test suites.

use rust_decimal::Decimal;

use crate::{
    books::{Book, Rating},
    orders::PaymentDetails,
    users::{NewUser, ShippingAddress},
};

/// Build a book with the given identity and a price in minor units.
#[must_use]
pub fn book(
    id: &str,
    title: &str,
    author: &str,
    category: &str,
    price_minor: i64,
    stock: u32,
) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        category: category.to_string(),
        price: Decimal::new(price_minor, 2),
        description: String::new(),
        image: String::new(),
        stock,
        ratings: Vec::new(),
    }
}

/// Attach whole-number rating scores to a book.
#[must_use]
pub fn with_ratings(mut book: Book, scores: &[i64]) -> Book {
    book.ratings = scores
        .iter()
        .map(|score| Rating {
            user_id: "u-fixture".to_string(),
            rating: Decimal::from(*score),
            review: String::new(),
        })
        .collect();

    book
}

fn described(mut book: Book, description: &str) -> Book {
    book.description = description.to_string();
    book
}

/// A six-book catalog spanning three categories, with descriptions and
/// ratings arranged to exercise search, facets, and rating sorts.
#[must_use]
pub fn sample_catalog() -> Vec<Book> {
    vec![
        described(
            with_ratings(
                book("clean-code", "Clean Code", "Robert C. Martin", "Software", 3000, 12),
                &[5, 4],
            ),
            "A handbook of agile software craftsmanship.",
        ),
        described(
            book("refactoring", "Refactoring", "Martin Fowler", "Software", 4000, 7),
            "Improving the design of existing code.",
        ),
        described(
            with_ratings(
                book(
                    "pragmatic",
                    "The Pragmatic Programmer",
                    "Andrew Hunt",
                    "Software",
                    3500,
                    5,
                ),
                &[5],
            ),
            "From journeyman to master.",
        ),
        described(
            with_ratings(
                book("dune", "Dune", "Frank Herbert", "Fiction", 1200, 20),
                &[5, 5, 4],
            ),
            "Desert-planet epic of spice and prophecy.",
        ),
        described(
            with_ratings(
                book("hobbit", "The Hobbit", "J.R.R. Tolkien", "Fiction", 1000, 0),
                &[4],
            ),
            "There and back again.",
        ),
        described(
            book(
                "salt-fat-acid-heat",
                "Salt Fat Acid Heat",
                "Samin Nosrat",
                "Cooking",
                2500,
                9,
            ),
            "Mastering the elements of good cooking.",
        ),
    ]
}

/// A complete shipping address.
#[must_use]
pub fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        street: "12 Paper Lane".to_string(),
        city: "Hay-on-Wye".to_string(),
        state: "Powys".to_string(),
        zip_code: "HR3 5AA".to_string(),
        country: "GB".to_string(),
    }
}

/// Registration input for the given email; the password is always
/// `"correct horse"`.
#[must_use]
pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: "correct horse".to_string(),
        name: "Ada".to_string(),
        contact_number: "+44 1497 820322".to_string(),
        shipping_address: shipping_address(),
    }
}

/// Card details the simulated gateway approves.
#[must_use]
pub fn payment_details() -> PaymentDetails {
    PaymentDetails {
        card_number: "4111 1111 1111 1111".to_string(),
        expiry_date: "12/30".to_string(),
        cvv: "123".to_string(),
        card_holder_name: "Ada".to_string(),
    }
}
