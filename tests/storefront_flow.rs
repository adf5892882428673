//! End-to-end storefront flow over a temporary data directory.
//!
//! Seeds the JSON store with the sample catalog, then walks the full
//! customer journey: browse with filters, register, log in, fill the cart,
//! persist and resume the session, and check out. Along the way it verifies
//! the collaborator contracts: unique emails, hashed-only passwords, opaque
//! tokens, whole-blob cart persistence, and the wholesale cart clear on a
//! successful order.

use testresult::TestResult;

use bookstall::prelude::*;
use bookstall::fixtures::{new_user, payment_details, sample_catalog, shipping_address};

#[test]
fn browse_register_login_cart_checkout() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = JsonStore::new(dir.path());
    let mut credentials = CredentialService::new();

    store.save_books(&sample_catalog())?;

    // Browse: software books under 38, cheapest first.
    let spec = FilterSpec::from_query_pairs([
        ("category", "Software"),
        ("maxPrice", "38"),
        ("sortBy", "price"),
        ("sortOrder", "asc"),
    ]);

    let results = query(store.books()?, &spec);
    let titles: Vec<&str> = results.books.iter().map(|b| b.title.as_str()).collect();

    assert_eq!(titles, ["Clean Code", "The Pragmatic Programmer"]);

    // Register, then verify the stored record never holds the plaintext.
    let mut session = Session::start();
    let auth = register(&store, &mut credentials, new_user("ada@example.com"))?;
    session.authenticate(&auth);

    let stored = store.user_by_email("ada@example.com")?;
    assert!(
        stored
            .as_ref()
            .is_some_and(|user| user.password.as_str() != "correct horse"),
        "stored record must not hold the plaintext"
    );
    assert!(stored.is_some_and(|user| user.password.verify("correct horse")));

    // Fill the cart from the query results and persist the session.
    let clean_code = &results.books[0];
    let pragmatic = &results.books[1];

    session.cart_mut().add(clean_code, 2)?;
    session.cart_mut().add(pragmatic, 1)?;
    session.persist(&store)?;

    assert_eq!(session.cart().items_count(), 3);

    // A resumed session sees the same cart blob, then logs in afresh.
    let mut resumed = Session::resume(session.id(), &store)?;
    assert_eq!(resumed.cart(), session.cart());

    let login_auth = login(&store, &mut credentials, "ada@example.com", "correct horse")?;
    resumed.authenticate(&login_auth);

    assert_eq!(
        credentials.verify_token(&login_auth.token),
        Some(login_auth.user.id.as_str())
    );

    // Check out: the order carries the cart total and the cart is cleared
    // wholesale, in memory and in the persisted blob.
    let expected_total = resumed.cart().total();
    let order = checkout(&mut resumed, &store, &payment_details(), shipping_address())?;

    assert_eq!(order.total, expected_total);
    assert_eq!(order.items.len(), 2);
    assert!(resumed.cart().is_empty());
    assert!(store.load_cart(resumed.id())?.is_empty());

    let placed = orders(&store)?;
    assert_eq!(placed.len(), 1);

    // Logout tears down the token.
    resumed.logout(&mut credentials);
    assert_eq!(credentials.verify_token(&login_auth.token), None);

    Ok(())
}

#[test]
fn second_registration_with_the_same_email_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = JsonStore::new(dir.path());
    let mut credentials = CredentialService::new();

    register(&store, &mut credentials, new_user("ada@example.com"))?;

    let duplicate = register(&store, &mut credentials, new_user("ada@example.com"));

    assert!(matches!(duplicate, Err(AuthError::EmailTaken)));
    assert_eq!(store.users()?.len(), 1);

    Ok(())
}

#[test]
fn store_supplied_facet_list_takes_precedence_over_derivation() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = JsonStore::new(dir.path());

    store.save_books(&sample_catalog())?;
    store.write_all("categories", &[
        "Software".to_string(),
        "Fiction".to_string(),
        "Cooking".to_string(),
        "Poetry".to_string(),
    ])?;

    // The precomputed list may name categories no current book carries.
    let stored = store.categories()?;
    assert_eq!(stored.len(), 4);

    // Deriving from books remains available and duplicate-free.
    let derived = categories(&store.books()?);
    assert_eq!(derived, ["Software", "Fiction", "Cooking"]);

    Ok(())
}
