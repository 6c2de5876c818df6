//! Restaurant entity
//!
//! A restaurant reaches its customers only through the reviews table. All
//! navigation methods take the store explicitly and require the restaurant to
//! have a store identity.

use serde::{Deserialize, Serialize};
use crate::{Customer, Error, Result, Review, ReviewStore};

/// A restaurant with a price tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Store-assigned identity, `None` until persisted
    pub id: Option<i64>,
    pub name: String,
    /// Price tier (higher is fancier)
    pub price: i64,
}

impl Restaurant {
    /// Create an in-memory restaurant. Nothing is written to the store.
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
        }
    }

    /// Insert a new restaurant and return it with its identity
    pub fn create(store: &ReviewStore, name: impl Into<String>, price: i64) -> Result<Self> {
        store.insert_restaurant(&Self::new(name, price))
    }

    /// Map a positional `(id, name, price)` row
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
        })
    }

    /// Store identity, or `NotPersisted` for an in-memory restaurant
    pub fn require_id(&self) -> Result<i64> {
        self.id
            .ok_or_else(|| Error::NotPersisted(format!("restaurant '{}'", self.name)))
    }

    /// All reviews of this restaurant
    pub fn reviews(&self, store: &ReviewStore) -> Result<Vec<Review>> {
        store.reviews_for_restaurant(self.require_id()?)
    }

    /// Customers who reviewed this restaurant, once per review
    pub fn customers(&self, store: &ReviewStore) -> Result<Vec<Customer>> {
        store.customers_for_restaurant(self.require_id()?)
    }

    /// One formatted line per review of this restaurant
    pub fn all_reviews(&self, store: &ReviewStore) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for review in self.reviews(store)? {
            let (first, last) = store.customer_name(review.customer_id)?.ok_or_else(|| {
                Error::NotFound(format!("customer {}", review.customer_id))
            })?;
            lines.push(crate::format_review(&self.name, &first, &last, review.star_rating));
        }
        Ok(lines)
    }

    /// The restaurant with the highest price tier
    pub fn fanciest(store: &ReviewStore) -> Result<Self> {
        store
            .fanciest_restaurant()?
            .ok_or_else(|| Error::NotFound("no restaurants in store".to_string()))
    }
}

impl std::fmt::Display for Restaurant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (price {})", self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (ReviewStore, Restaurant, Restaurant, Customer) {
        let store = ReviewStore::open_in_memory().unwrap();
        let a = Restaurant::create(&store, "A", 4).unwrap();
        let b = Restaurant::create(&store, "B", 3).unwrap();
        let john = Customer::create(&store, "John", "Doe").unwrap();
        john.add_review(&store, &a, 5).unwrap();
        john.add_review(&store, &b, 4).unwrap();
        (store, a, b, john)
    }

    #[test]
    fn test_new_is_not_persisted() {
        let r = Restaurant::new("Nowhere", 2);
        assert_eq!(r.id, None);
        assert!(matches!(r.require_id(), Err(Error::NotPersisted(_))));
    }

    #[test]
    fn test_unpersisted_navigation_fails() {
        let store = ReviewStore::open_in_memory().unwrap();
        let r = Restaurant::new("Nowhere", 2);
        assert!(matches!(r.reviews(&store), Err(Error::NotPersisted(_))));
        assert!(matches!(r.customers(&store), Err(Error::NotPersisted(_))));
    }

    #[test]
    fn test_fanciest() {
        let (store, a, _, _) = seeded();
        let fanciest = Restaurant::fanciest(&store).unwrap();
        assert_eq!(fanciest.name, "A");
        assert_eq!(fanciest.id, a.id);

        for r in store.list_restaurants().unwrap() {
            assert!(fanciest.price >= r.price);
        }
    }

    #[test]
    fn test_fanciest_tie_lowest_id() {
        let store = ReviewStore::open_in_memory().unwrap();
        let first = Restaurant::create(&store, "First", 4).unwrap();
        Restaurant::create(&store, "Cheap", 1).unwrap();
        Restaurant::create(&store, "Second", 4).unwrap();

        let fanciest = Restaurant::fanciest(&store).unwrap();
        assert_eq!(fanciest, first);
    }

    #[test]
    fn test_fanciest_empty_store() {
        let store = ReviewStore::open_in_memory().unwrap();
        assert!(matches!(Restaurant::fanciest(&store), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_all_reviews_format() {
        let (store, a, _, _) = seeded();
        let lines = a.all_reviews(&store).unwrap();
        assert_eq!(lines, vec!["Review for A by John Doe: 5 stars.".to_string()]);
    }

    #[test]
    fn test_customers_keeps_duplicates() {
        let (store, a, _, john) = seeded();
        john.add_review(&store, &a, 2).unwrap();

        let customers = a.customers(&store).unwrap();
        assert_eq!(customers.len(), 2);
        assert!(customers.iter().all(|c| c.id == john.id));
    }
}
