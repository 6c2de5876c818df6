//! Review entity - a star rating linking one customer to one restaurant
//!
//! A review is always identity + two foreign keys + rating, whether it came
//! from a query row or was built from domain objects.

use serde::{Deserialize, Serialize};
use crate::{Customer, Error, Restaurant, Result, ReviewStore};

/// A star-rated review.
///
/// Ratings are 1-5 by convention; the store does not enforce a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Store-assigned identity, `None` until persisted
    pub id: Option<i64>,
    pub restaurant_id: i64,
    pub customer_id: i64,
    pub star_rating: i64,
}

impl Review {
    /// Create an in-memory review from raw foreign keys
    pub fn new(restaurant_id: i64, customer_id: i64, star_rating: i64) -> Self {
        Self {
            id: None,
            restaurant_id,
            customer_id,
            star_rating,
        }
    }

    /// Build a review from domain objects; both must be persisted.
    pub fn between(restaurant: &Restaurant, customer: &Customer, star_rating: i64) -> Result<Self> {
        Ok(Self::new(restaurant.require_id()?, customer.require_id()?, star_rating))
    }

    /// Map a positional `(id, restaurant_id, customer_id, star_rating)` row
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            restaurant_id: row.get(1)?,
            customer_id: row.get(2)?,
            star_rating: row.get(3)?,
        })
    }

    /// The reviewing customer
    pub fn customer(&self, store: &ReviewStore) -> Result<Customer> {
        store
            .get_customer(self.customer_id)?
            .ok_or_else(|| Error::NotFound(format!("customer {}", self.customer_id)))
    }

    /// The reviewed restaurant
    pub fn restaurant(&self, store: &ReviewStore) -> Result<Restaurant> {
        store
            .get_restaurant(self.restaurant_id)?
            .ok_or_else(|| Error::NotFound(format!("restaurant {}", self.restaurant_id)))
    }

    /// Format this review, looking up both names in the store
    pub fn full_review(&self, store: &ReviewStore) -> Result<String> {
        let restaurant_name = store
            .restaurant_name(self.restaurant_id)?
            .ok_or_else(|| Error::NotFound(format!("restaurant {}", self.restaurant_id)))?;
        let (first, last) = store
            .customer_name(self.customer_id)?
            .ok_or_else(|| Error::NotFound(format!("customer {}", self.customer_id)))?;
        Ok(crate::format_review(&restaurant_name, &first, &last, self.star_rating))
    }
}
