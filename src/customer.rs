//! Customer entity

use serde::{Deserialize, Serialize};
use crate::{Error, Restaurant, Result, Review, ReviewStore};

/// A customer who writes reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Store-assigned identity, `None` until persisted
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
}

impl Customer {
    /// Create an in-memory customer. Nothing is written to the store.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Insert a new customer and return it with its identity
    pub fn create(
        store: &ReviewStore,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self> {
        store.insert_customer(&Self::new(first_name, last_name))
    }

    /// Map a positional `(id, first_name, last_name)` row
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
        })
    }

    /// Store identity, or `NotPersisted` for an in-memory customer
    pub fn require_id(&self) -> Result<i64> {
        self.id
            .ok_or_else(|| Error::NotPersisted(format!("customer '{}'", self.full_name())))
    }

    /// First and last name separated by a single space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// All reviews written by this customer
    pub fn reviews(&self, store: &ReviewStore) -> Result<Vec<Review>> {
        store.reviews_for_customer(self.require_id()?)
    }

    /// Restaurants this customer reviewed, once per review
    pub fn restaurants(&self, store: &ReviewStore) -> Result<Vec<Restaurant>> {
        store.restaurants_for_customer(self.require_id()?)
    }

    /// Restaurant of this customer's highest-rated review
    pub fn favorite_restaurant(&self, store: &ReviewStore) -> Result<Restaurant> {
        store
            .favorite_restaurant(self.require_id()?)?
            .ok_or_else(|| Error::NotFound(format!("no reviews by {}", self.full_name())))
    }

    /// Record a review of `restaurant`. Committed before returning.
    pub fn add_review(&self, store: &ReviewStore, restaurant: &Restaurant, rating: i64) -> Result<Review> {
        let review = Review::between(restaurant, self, rating)?;
        store.insert_review(&review)
    }

    /// Remove every review this customer wrote for `restaurant`.
    /// Returns how many rows were deleted.
    pub fn delete_reviews(&self, store: &ReviewStore, restaurant: &Restaurant) -> Result<usize> {
        store.delete_reviews(restaurant.require_id()?, self.require_id()?)
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name())
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
    fn test_full_name() {
        assert_eq!(Customer::new("John", "Doe").full_name(), "John Doe");
        assert_eq!(Customer::new("", "").full_name(), " ");
        assert_eq!(Customer::new("Cher", "").full_name(), "Cher ");
    }

    #[test]
    fn test_add_review_visible_both_ways() {
        let (store, a, _, john) = seeded();

        let reviews = john.reviews(&store).unwrap();
        assert!(reviews
            .iter()
            .any(|r| Some(r.restaurant_id) == a.id && r.star_rating == 5));

        let customers = a.customers(&store).unwrap();
        assert!(customers.iter().any(|c| c.id == john.id));
    }

    #[test]
    fn test_restaurants() {
        let (store, _, _, john) = seeded();
        let names: Vec<String> = john
            .restaurants(&store)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_favorite_restaurant() {
        let (store, a, _, john) = seeded();
        let favorite = john.favorite_restaurant(&store).unwrap();
        assert_eq!(favorite.name, "A");
        assert_eq!(favorite.id, a.id);
    }

    #[test]
    fn test_favorite_tie_earliest_review() {
        let store = ReviewStore::open_in_memory().unwrap();
        let a = Restaurant::create(&store, "A", 4).unwrap();
        let b = Restaurant::create(&store, "B", 4).unwrap();
        let john = Customer::create(&store, "John", "Doe").unwrap();

        // B has the higher id but is reviewed first
        john.add_review(&store, &b, 5).unwrap();
        john.add_review(&store, &a, 5).unwrap();

        let favorite = john.favorite_restaurant(&store).unwrap();
        assert_eq!(favorite, b);
    }

    #[test]
    fn test_favorite_without_reviews() {
        let store = ReviewStore::open_in_memory().unwrap();
        let alice = Customer::create(&store, "Alice", "Smith").unwrap();
        assert!(matches!(alice.favorite_restaurant(&store), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_reviews_only_matching_pair() {
        let (store, a, b, john) = seeded();
        let alice = Customer::create(&store, "Alice", "Smith").unwrap();
        alice.add_review(&store, &a, 3).unwrap();

        assert_eq!(john.delete_reviews(&store, &a).unwrap(), 1);

        let remaining = john.reviews(&store).unwrap();
        assert!(remaining.iter().all(|r| Some(r.restaurant_id) != a.id));
        assert!(remaining.iter().any(|r| Some(r.restaurant_id) == b.id));
        assert_eq!(alice.reviews(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_reviews_idempotent() {
        let (store, a, _, john) = seeded();
        john.delete_reviews(&store, &a).unwrap();
        let after_first = john.reviews(&store).unwrap();

        assert_eq!(john.delete_reviews(&store, &a).unwrap(), 0);
        assert_eq!(john.reviews(&store).unwrap(), after_first);
    }

    #[test]
    fn test_add_review_requires_persisted_entities() {
        let store = ReviewStore::open_in_memory().unwrap();
        let john = Customer::create(&store, "John", "Doe").unwrap();
        let ghost = Restaurant::new("Ghost", 1);

        assert!(matches!(john.add_review(&store, &ghost, 5), Err(Error::NotPersisted(_))));
        assert_eq!(store.count_reviews().unwrap(), 0);
    }
}
