//! Catalog
//!
//! In-memory query engine over the book collection: multi-predicate
//! filtering, case-insensitive substring search, and a single stable sorting
//! pass keyed by a typed accessor. The engine is pure and never fails:
//! malformed filter input degrades to "no filter".

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::books::Book;

/// Sentinel category value that matches every book.
pub const CATEGORY_ALL: &str = "all";

/// Typed sort key.
///
/// Replaces the original storefront's runtime field-name lookup, so an
/// unsupported key can never reach the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Sort by title, case-insensitively.
    Title,

    /// Sort by author, case-insensitively.
    Author,

    /// Sort by price.
    Price,

    /// Sort by the derived average rating, not a stored field.
    Rating,
}

impl SortKey {
    /// Parse a raw query value; unrecognized keys are treated as absent.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "price" => Some(Self::Price),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }
}

/// Sort direction, ascending unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,

    /// Descending.
    Desc,
}

impl SortOrder {
    /// Parse a raw query value; unrecognized values are treated as absent.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Filter and sort parameters for a catalog query.
///
/// All fields are optional; an empty spec matches the whole catalog in its
/// original order. Supplied predicates combine as a conjunction, and each is
/// an independent side-effect-free test, so predicate order never affects the
/// result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Case-insensitive substring matched against title, author, or
    /// description (logical OR across the three fields).
    pub search: Option<String>,

    /// Exact category match; [`CATEGORY_ALL`] or absence matches everything.
    pub category: Option<String>,

    /// Case-insensitive substring matched against the author only.
    pub author: Option<String>,

    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,

    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,

    /// Sort key; `None` preserves the input order.
    pub sort_by: Option<SortKey>,

    /// Sort direction.
    pub sort_order: SortOrder,
}

impl FilterSpec {
    /// Build a spec from raw string key/value pairs, such as decoded HTTP
    /// query parameters.
    ///
    /// Unknown keys, empty values, unparseable price bounds, and unrecognized
    /// sort values are all silently ignored; building a spec cannot fail.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut spec = Self::default();

        for (key, value) in pairs {
            match key {
                "search" => spec.search = non_empty(value),
                "category" => spec.category = non_empty(value),
                "author" => spec.author = non_empty(value),
                "minPrice" => spec.min_price = value.parse().ok(),
                "maxPrice" => spec.max_price = value.parse().ok(),
                "sortBy" => spec.sort_by = SortKey::parse(value),
                "sortOrder" => {
                    if let Some(order) = SortOrder::parse(value) {
                        spec.sort_order = order;
                    }
                }
                _ => {}
            }
        }

        spec
    }

    /// Whether a book satisfies every supplied predicate.
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();

            let hit = book.title.to_lowercase().contains(&needle)
                || book.author.to_lowercase().contains(&needle)
                || book.description.to_lowercase().contains(&needle);

            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if category != CATEGORY_ALL && book.category != *category {
                return false;
            }
        }

        if let Some(author) = &self.author {
            if !book
                .author
                .to_lowercase()
                .contains(&author.to_lowercase())
            {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if book.price < min {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if book.price > max {
                return false;
            }
        }

        true
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Result of a catalog query: the matching books plus their count.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResults {
    /// Matching books, filtered and sorted.
    pub books: Vec<Book>,

    /// Number of matches.
    pub total: usize,
}

/// Filter and sort a full catalog snapshot.
///
/// Sorting is a single stable pass with a total-order comparator, so books
/// with equal keys keep their original relative order under either direction.
#[must_use]
pub fn query(mut books: Vec<Book>, filters: &FilterSpec) -> QueryResults {
    books.retain(|book| filters.matches(book));

    if let Some(key) = filters.sort_by {
        books.sort_by(|a, b| {
            let ordering = compare_by(key, a, b);

            match filters.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    let total = books.len();

    QueryResults { books, total }
}

/// Distinct category values present in the catalog, in first-seen order.
#[must_use]
pub fn categories(books: &[Book]) -> Vec<String> {
    let mut seen = FxHashSet::default();

    books
        .iter()
        .filter(|book| seen.insert(book.category.clone()))
        .map(|book| book.category.clone())
        .collect()
}

fn compare_by(key: SortKey, a: &Book, b: &Book) -> Ordering {
    match key {
        SortKey::Title => text_cmp(&a.title, &b.title),
        SortKey::Author => text_cmp(&a.author, &b.author),
        SortKey::Price => a.price.cmp(&b.price),
        SortKey::Rating => a.average_rating().cmp(&b.average_rating()),
    }
}

/// Case-insensitive ordering for textual sort keys.
fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{book, sample_catalog, with_ratings};

    use super::*;

    #[test]
    fn empty_spec_returns_catalog_unchanged() {
        let catalog = sample_catalog();
        let results = query(catalog.clone(), &FilterSpec::default());

        assert_eq!(results.total, catalog.len());
        assert_eq!(results.books, catalog);
    }

    #[test]
    fn search_matches_title_author_and_description() {
        let catalog = sample_catalog();
        let spec = FilterSpec {
            search: Some("MARTIN".to_string()),
            ..FilterSpec::default()
        };

        let results = query(catalog, &spec);
        let titles: Vec<&str> = results.books.iter().map(|b| b.title.as_str()).collect();

        // "Martin" appears as an author on both software classics.
        assert_eq!(titles, ["Clean Code", "Refactoring"]);
    }

    #[test]
    fn search_reaches_into_descriptions() {
        let catalog = sample_catalog();
        let spec = FilterSpec {
            search: Some("journeyman".to_string()),
            ..FilterSpec::default()
        };

        let results = query(catalog, &spec);

        assert_eq!(results.total, 1);
        assert_eq!(results.books[0].title, "The Pragmatic Programmer");
    }

    #[test]
    fn category_all_matches_everything() {
        let catalog = sample_catalog();
        let spec = FilterSpec {
            category: Some(CATEGORY_ALL.to_string()),
            ..FilterSpec::default()
        };

        assert_eq!(query(catalog.clone(), &spec).total, catalog.len());
    }

    #[test]
    fn category_filters_exactly() {
        let catalog = sample_catalog();
        let spec = FilterSpec {
            category: Some("Fiction".to_string()),
            ..FilterSpec::default()
        };

        let results = query(catalog, &spec);

        assert!(results.books.iter().all(|b| b.category == "Fiction"));
        assert_eq!(results.total, 2);
    }

    #[test]
    fn author_filter_composes_with_search() {
        let catalog = sample_catalog();
        let spec = FilterSpec {
            search: Some("code".to_string()),
            author: Some("fowler".to_string()),
            ..FilterSpec::default()
        };

        let results = query(catalog, &spec);

        assert_eq!(results.total, 1);
        assert_eq!(results.books[0].title, "Refactoring");
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let catalog = sample_catalog();
        let spec = FilterSpec {
            min_price: Some(Decimal::new(1200, 2)),
            max_price: Some(Decimal::new(3000, 2)),
            ..FilterSpec::default()
        };

        let results = query(catalog, &spec);

        assert!(results
            .books
            .iter()
            .all(|b| b.price >= Decimal::new(1200, 2) && b.price <= Decimal::new(3000, 2)));
        assert!(results.books.iter().any(|b| b.price == Decimal::new(1200, 2)));
        assert!(results.books.iter().any(|b| b.price == Decimal::new(3000, 2)));
    }

    #[test]
    fn from_query_pairs_ignores_malformed_input() {
        let spec = FilterSpec::from_query_pairs([
            ("minPrice", "not-a-number"),
            ("maxPrice", "12.50"),
            ("sortBy", "popularity"),
            ("sortOrder", "downwards"),
            ("flavour", "vanilla"),
            ("search", ""),
        ]);

        assert_eq!(spec.min_price, None);
        assert_eq!(spec.max_price, Some(Decimal::new(1250, 2)));
        assert_eq!(spec.sort_by, None);
        assert_eq!(spec.sort_order, SortOrder::Asc);
        assert_eq!(spec.search, None);
    }

    #[test]
    fn malformed_sort_order_keeps_an_earlier_valid_value() {
        let spec =
            FilterSpec::from_query_pairs([("sortOrder", "desc"), ("sortOrder", "downwards")]);

        assert_eq!(spec.sort_order, SortOrder::Desc);
    }

    #[test]
    fn from_query_pairs_builds_a_full_spec() {
        let spec = FilterSpec::from_query_pairs([
            ("search", "dune"),
            ("category", "Fiction"),
            ("author", "herbert"),
            ("minPrice", "5"),
            ("maxPrice", "20"),
            ("sortBy", "price"),
            ("sortOrder", "desc"),
        ]);

        assert_eq!(spec.search.as_deref(), Some("dune"));
        assert_eq!(spec.category.as_deref(), Some("Fiction"));
        assert_eq!(spec.author.as_deref(), Some("herbert"));
        assert_eq!(spec.min_price, Some(Decimal::from(5)));
        assert_eq!(spec.max_price, Some(Decimal::from(20)));
        assert_eq!(spec.sort_by, Some(SortKey::Price));
        assert_eq!(spec.sort_order, SortOrder::Desc);
    }

    #[test]
    fn sort_by_price_descending() {
        let catalog = vec![
            book("1", "Clean Code", "Martin", "Software", 3000, 10),
            book("2", "Refactoring", "Fowler", "Software", 4000, 10),
        ];

        let spec = FilterSpec {
            sort_by: Some(SortKey::Price),
            sort_order: SortOrder::Desc,
            ..FilterSpec::default()
        };

        let results = query(catalog, &spec);
        let titles: Vec<&str> = results.books.iter().map(|b| b.title.as_str()).collect();

        assert_eq!(titles, ["Refactoring", "Clean Code"]);
    }

    #[test]
    fn textual_sort_is_case_insensitive() {
        let catalog = vec![
            book("1", "zebra stripes", "A", "Misc", 1000, 1),
            book("2", "Apples", "B", "Misc", 1000, 1),
        ];

        let spec = FilterSpec {
            sort_by: Some(SortKey::Title),
            ..FilterSpec::default()
        };

        let results = query(catalog, &spec);
        let titles: Vec<&str> = results.books.iter().map(|b| b.title.as_str()).collect();

        assert_eq!(titles, ["Apples", "zebra stripes"]);
    }

    #[test]
    fn equal_keys_keep_original_order_in_both_directions() {
        let catalog = vec![
            book("first", "Alpha", "Same Author", "Misc", 1500, 1),
            book("second", "Beta", "Same Author", "Misc", 1500, 1),
            book("third", "Gamma", "Same Author", "Misc", 1500, 1),
        ];

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let spec = FilterSpec {
                sort_by: Some(SortKey::Price),
                sort_order: order,
                ..FilterSpec::default()
            };

            let results = query(catalog.clone(), &spec);
            let ids: Vec<&str> = results.books.iter().map(|b| b.id.as_str()).collect();

            assert_eq!(ids, ["first", "second", "third"], "ties must be stable");
        }
    }

    #[test]
    fn rating_sort_uses_derived_average() {
        let catalog = vec![
            with_ratings(book("low", "Low", "A", "Misc", 1000, 1), &[2, 3]),
            book("none", "None", "B", "Misc", 1000, 1),
            with_ratings(book("high", "High", "C", "Misc", 1000, 1), &[5, 4]),
        ];

        let spec = FilterSpec {
            sort_by: Some(SortKey::Rating),
            sort_order: SortOrder::Desc,
            ..FilterSpec::default()
        };

        let results = query(catalog, &spec);
        let ids: Vec<&str> = results.books.iter().map(|b| b.id.as_str()).collect();

        assert_eq!(ids, ["high", "low", "none"]);
    }

    #[test]
    fn categories_are_distinct_and_first_seen_ordered() {
        let catalog = sample_catalog();
        let facets = categories(&catalog);

        assert_eq!(facets, ["Software", "Fiction", "Cooking"]);
    }
}
