//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use crate::{Customer, Restaurant, Result, Review};
use super::schema;

const RESTAURANT_COLUMNS: &str = "r.id, r.name, r.price";
const CUSTOMER_COLUMNS: &str = "c.id, c.first_name, c.last_name";
const REVIEW_COLUMNS: &str = "rev.id, rev.restaurant_id, rev.customer_id, rev.star_rating";

/// SQLite-backed storage for restaurants, customers and reviews.
///
/// Owns a single connection; pass it by reference to every entity method.
/// The connection is closed when the store is dropped.
pub struct ReviewStore {
    conn: Connection,
}

impl ReviewStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening review store at {}", path.display());
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Apply connection pragmas and create tables if absent
    fn initialize_schema(&self) -> Result<()> {
        for pragma in schema::PRAGMAS {
            self.conn.execute_batch(pragma)?;
        }
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Close the connection, reporting any error from SQLite
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits when `f` returns `Ok`, rolls back on `Err`. A panic inside `f`
    /// drops the transaction, which also rolls back.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    // ========== Restaurant Operations ==========

    /// Persist a restaurant and return it with its new identity
    pub fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<Restaurant> {
        let id = self.transaction(|tx| {
            tx.execute(
                "INSERT INTO restaurants (name, price) VALUES (?1, ?2)",
                params![restaurant.name, restaurant.price],
            )?;
            Ok(tx.last_insert_rowid())
        })?;
        tracing::info!("Inserted restaurant {} as id {}", restaurant.name, id);
        Ok(Restaurant {
            id: Some(id),
            ..restaurant.clone()
        })
    }

    /// Get a restaurant by id
    pub fn get_restaurant(&self, id: i64) -> Result<Option<Restaurant>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM restaurants r WHERE r.id = ?1", RESTAURANT_COLUMNS),
                [id],
                Restaurant::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// First restaurant with exactly this name
    pub fn find_restaurant_by_name(&self, name: &str) -> Result<Option<Restaurant>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM restaurants r WHERE r.name = ?1 ORDER BY r.id LIMIT 1",
                    RESTAURANT_COLUMNS
                ),
                [name],
                Restaurant::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All restaurants ordered by id
    pub fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM restaurants r ORDER BY r.id",
            RESTAURANT_COLUMNS
        ))?;
        let restaurants = stmt
            .query_map([], Restaurant::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(restaurants)
    }

    /// Name of a restaurant, if it exists
    pub fn restaurant_name(&self, id: i64) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT name FROM restaurants WHERE id = ?1", [id], |row| row.get(0))
            .optional()
            .map_err(Into::into)
    }

    /// Restaurant with the highest price; ties go to the lowest id
    pub fn fanciest_restaurant(&self) -> Result<Option<Restaurant>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM restaurants r ORDER BY r.price DESC, r.id LIMIT 1",
                    RESTAURANT_COLUMNS
                ),
                [],
                Restaurant::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Reviews of a restaurant
    pub fn reviews_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<Review>> {
        tracing::debug!("Loading reviews for restaurant {}", restaurant_id);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM reviews rev WHERE rev.restaurant_id = ?1 ORDER BY rev.id",
            REVIEW_COLUMNS
        ))?;
        let reviews = stmt
            .query_map([restaurant_id], Review::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }

    /// Customers who reviewed a restaurant, one entry per review
    pub fn customers_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<Customer>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM customers c JOIN reviews rev ON c.id = rev.customer_id \
             WHERE rev.restaurant_id = ?1 ORDER BY rev.id",
            CUSTOMER_COLUMNS
        ))?;
        let customers = stmt
            .query_map([restaurant_id], Customer::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(customers)
    }

    /// Delete a restaurant together with its reviews
    pub fn delete_restaurant(&self, id: i64) -> Result<DeleteOutcome> {
        let outcome = self.transaction(|tx| {
            let reviews = tx.execute("DELETE FROM reviews WHERE restaurant_id = ?1", [id])?;
            let rows = tx.execute("DELETE FROM restaurants WHERE id = ?1", [id])?;
            Ok(DeleteOutcome { entity: rows > 0, reviews })
        })?;
        tracing::info!("Deleted restaurant {}: {:?}", id, outcome);
        Ok(outcome)
    }

    /// Count all restaurants
    pub fn count_restaurants(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM restaurants", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Customer Operations ==========

    /// Persist a customer and return it with its new identity
    pub fn insert_customer(&self, customer: &Customer) -> Result<Customer> {
        let id = self.transaction(|tx| {
            tx.execute(
                "INSERT INTO customers (first_name, last_name) VALUES (?1, ?2)",
                params![customer.first_name, customer.last_name],
            )?;
            Ok(tx.last_insert_rowid())
        })?;
        tracing::info!("Inserted customer {} as id {}", customer.full_name(), id);
        Ok(Customer {
            id: Some(id),
            ..customer.clone()
        })
    }

    /// Get a customer by id
    pub fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM customers c WHERE c.id = ?1", CUSTOMER_COLUMNS),
                [id],
                Customer::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All customers ordered by id
    pub fn list_customers(&self) -> Result<Vec<Customer>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM customers c ORDER BY c.id",
            CUSTOMER_COLUMNS
        ))?;
        let customers = stmt
            .query_map([], Customer::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(customers)
    }

    /// `(first_name, last_name)` of a customer, if it exists
    pub fn customer_name(&self, id: i64) -> Result<Option<(String, String)>> {
        self.conn
            .query_row(
                "SELECT first_name, last_name FROM customers WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Reviews written by a customer
    pub fn reviews_for_customer(&self, customer_id: i64) -> Result<Vec<Review>> {
        tracing::debug!("Loading reviews for customer {}", customer_id);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM reviews rev WHERE rev.customer_id = ?1 ORDER BY rev.id",
            REVIEW_COLUMNS
        ))?;
        let reviews = stmt
            .query_map([customer_id], Review::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }

    /// Restaurants a customer reviewed, one entry per review
    pub fn restaurants_for_customer(&self, customer_id: i64) -> Result<Vec<Restaurant>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM restaurants r JOIN reviews rev ON r.id = rev.restaurant_id \
             WHERE rev.customer_id = ?1 ORDER BY rev.id",
            RESTAURANT_COLUMNS
        ))?;
        let restaurants = stmt
            .query_map([customer_id], Restaurant::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(restaurants)
    }

    /// Restaurant of the customer's highest-rated review; ties go to the
    /// earliest review
    pub fn favorite_restaurant(&self, customer_id: i64) -> Result<Option<Restaurant>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM restaurants r JOIN reviews rev ON r.id = rev.restaurant_id \
                     WHERE rev.customer_id = ?1 ORDER BY rev.star_rating DESC, rev.id LIMIT 1",
                    RESTAURANT_COLUMNS
                ),
                [customer_id],
                Restaurant::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Delete a customer together with their reviews
    pub fn delete_customer(&self, id: i64) -> Result<DeleteOutcome> {
        let outcome = self.transaction(|tx| {
            let reviews = tx.execute("DELETE FROM reviews WHERE customer_id = ?1", [id])?;
            let rows = tx.execute("DELETE FROM customers WHERE id = ?1", [id])?;
            Ok(DeleteOutcome { entity: rows > 0, reviews })
        })?;
        tracing::info!("Deleted customer {}: {:?}", id, outcome);
        Ok(outcome)
    }

    /// Count all customers
    pub fn count_customers(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Review Operations ==========

    /// Persist a review and return it with its new identity.
    ///
    /// Both foreign keys must reference existing rows; SQLite rejects the
    /// insert otherwise.
    pub fn insert_review(&self, review: &Review) -> Result<Review> {
        let id = self.transaction(|tx| {
            tx.execute(
                "INSERT INTO reviews (restaurant_id, customer_id, star_rating) VALUES (?1, ?2, ?3)",
                params![review.restaurant_id, review.customer_id, review.star_rating],
            )?;
            Ok(tx.last_insert_rowid())
        })?;
        tracing::info!(
            "Inserted review {} (restaurant {}, customer {}, {} stars)",
            id,
            review.restaurant_id,
            review.customer_id,
            review.star_rating
        );
        Ok(Review {
            id: Some(id),
            ..review.clone()
        })
    }

    /// Get a review by id
    pub fn get_review(&self, id: i64) -> Result<Option<Review>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM reviews rev WHERE rev.id = ?1", REVIEW_COLUMNS),
                [id],
                Review::from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Delete every review for the (restaurant, customer) pair
    pub fn delete_reviews(&self, restaurant_id: i64, customer_id: i64) -> Result<usize> {
        let deleted = self.transaction(|tx| {
            Ok(tx.execute(
                "DELETE FROM reviews WHERE restaurant_id = ?1 AND customer_id = ?2",
                params![restaurant_id, customer_id],
            )?)
        })?;
        tracing::info!(
            "Deleted {} review(s) for restaurant {} by customer {}",
            deleted,
            restaurant_id,
            customer_id
        );
        Ok(deleted)
    }

    /// Count all reviews
    pub fn count_reviews(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Bulk Operations ==========

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            restaurants: self.count_restaurants()?,
            customers: self.count_customers()?,
            reviews: self.count_reviews()?,
        })
    }
}

/// Result of deleting a restaurant or customer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether the entity row existed
    pub entity: bool,
    /// Reviews removed along with it
    pub reviews: usize,
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub restaurants: usize,
    pub customers: usize,
    pub reviews: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Restaurants: {}", self.restaurants)?;
        writeln!(f, "  Customers: {}", self.customers)?;
        writeln!(f, "  Reviews: {}", self.reviews)
    }
}
