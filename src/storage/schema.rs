//! Database schema definitions

/// SQL to create the restaurants table
pub const CREATE_RESTAURANTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS restaurants (
    id INTEGER PRIMARY KEY,
    name TEXT,
    price INTEGER
)
"#;

/// SQL to create the customers table
pub const CREATE_CUSTOMERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY,
    first_name TEXT,
    last_name TEXT
)
"#;

/// SQL to create the reviews table.
/// Deleting a restaurant or customer removes its reviews.
pub const CREATE_REVIEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY,
    restaurant_id INTEGER,
    customer_id INTEGER,
    star_rating INTEGER,
    FOREIGN KEY (restaurant_id) REFERENCES restaurants(id) ON DELETE CASCADE,
    FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_reviews_restaurant ON reviews(restaurant_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_customer ON reviews(customer_id)",
];

/// Connection settings applied before the schema
pub const PRAGMAS: &[&str] = &["PRAGMA foreign_keys = ON"];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_RESTAURANTS_TABLE,
        CREATE_CUSTOMERS_TABLE,
        CREATE_REVIEWS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
