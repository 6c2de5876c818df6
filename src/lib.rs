//! # Restaurant Reviews
//!
//! A small object-relational layer over SQLite for restaurants, customers
//! and their star-rated reviews.
//!
//! - `Restaurant`, `Customer` and `Review` entities with navigation methods
//! - SQLite-backed `ReviewStore` passed explicitly to every query
//! - Scoped transactions for every write
//! - TOML configuration and a `reviews` command-line front end

pub mod restaurant;
pub mod customer;
pub mod review;
pub mod storage;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use restaurant::Restaurant;
pub use customer::Customer;
pub use review::Review;
pub use storage::ReviewStore;

/// Result type alias for review store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for review store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Entity not persisted: {0}")]
    NotPersisted(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Format the one-line summary shared by `Restaurant::all_reviews` and
/// `Review::full_review`.
pub(crate) fn format_review(restaurant_name: &str, first: &str, last: &str, rating: i64) -> String {
    format!("Review for {} by {} {}: {} stars.", restaurant_name, first, last, rating)
}
