//! Reviews CLI - command-line front end for the restaurant review store

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use restaurant_reviews::config::{self, ReviewsConfig};
use restaurant_reviews::Error;
use restaurant_reviews::ui::{self, Icons};
use restaurant_reviews::{Customer, Restaurant, ReviewStore};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "reviews")]
#[command(version)]
#[command(about = "Restaurants, customers and their star-rated reviews")]
#[command(long_about = r#"
Keeps restaurants, customers and reviews in a SQLite database and lets you
navigate between them.

Example usage:
  reviews demo
  reviews list-restaurants
  reviews add-restaurant --name "Restaurant A" --price 4
  reviews review --customer 1 --restaurant 1 --rating 5
  reviews reviews --restaurant 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Exactly one of restaurant or customer
#[derive(Args)]
#[group(required = true, multiple = false)]
struct ReviewTarget {
    /// Restaurant id
    #[arg(long)]
    restaurant: Option<i64>,

    /// Customer id
    #[arg(long)]
    customer: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demonstration scenario (in memory unless --database is given)
    Demo,

    /// List restaurants, optionally only the one with a given name
    ListRestaurants {
        /// Exact restaurant name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List all customers
    ListCustomers,

    /// Show a single review by id
    ShowReview { id: i64 },

    /// Add a restaurant
    AddRestaurant {
        #[arg(short, long)]
        name: String,

        /// Price tier
        #[arg(short, long)]
        price: i64,
    },

    /// Add a customer
    AddCustomer {
        #[arg(long)]
        first: String,

        #[arg(long)]
        last: String,
    },

    /// Record a review by a customer for a restaurant
    Review {
        /// Customer id
        #[arg(long)]
        customer: i64,

        /// Restaurant id
        #[arg(long)]
        restaurant: i64,

        /// Star rating (1-5 by convention)
        #[arg(long, allow_negative_numbers = true)]
        rating: i64,
    },

    /// Show formatted reviews for a restaurant or by a customer
    Reviews {
        #[command(flatten)]
        target: ReviewTarget,
    },

    /// List customers who reviewed a restaurant
    Customers {
        /// Restaurant id
        #[arg(long)]
        restaurant: i64,
    },

    /// List restaurants a customer reviewed
    Restaurants {
        /// Customer id
        #[arg(long)]
        customer: i64,
    },

    /// Show the restaurant with the highest price tier
    Fanciest,

    /// Show a customer's favorite restaurant
    Favorite {
        /// Customer id
        #[arg(long)]
        customer: i64,
    },

    /// Delete every review a customer wrote for a restaurant
    DeleteReviews {
        /// Customer id
        #[arg(long)]
        customer: i64,

        /// Restaurant id
        #[arg(long)]
        restaurant: i64,
    },

    /// Delete a restaurant and its reviews
    DeleteRestaurant { id: i64 },

    /// Delete a customer and their reviews
    DeleteCustomer { id: i64 },

    /// Show database statistics
    Stats,

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Commands::Init { force } = cli.command {
        let path = cli.config.clone().unwrap_or_else(|| PathBuf::from(config::CONFIG_FILE));
        ReviewsConfig::with_defaults().save(&path, force)?;
        ui::success(&format!("Wrote config to {}", path.display()));
        return Ok(());
    }

    // The demo inserts fixed rows; keep them out of the real database
    // unless one is named explicitly.
    let (store, location) = if matches!(cli.command, Commands::Demo) && cli.database.is_none() {
        tracing::info!("Running demo on an in-memory store (pass --database to keep it)");
        (ReviewStore::open_in_memory()?, ":memory:".to_string())
    } else {
        let loaded = ReviewsConfig::load(cli.config.as_deref())?;
        let database = config::database_path(cli.database.as_deref(), loaded.as_ref())?;
        tracing::debug!("Using database {}", database.display());
        (ReviewStore::open(&database)?, database.display().to_string())
    };
    let json = cli.json;

    match cli.command {
        Commands::Demo => {
            let report = build_demo(&store)?;
            emit(json, &report, || print_demo(&store, &report))?;
        }

        Commands::ListRestaurants { name } => {
            let restaurants = match name {
                Some(name) => vec![store
                    .find_restaurant_by_name(&name)?
                    .ok_or_else(|| anyhow::anyhow!("no restaurant named '{}'", name))?],
                None => store.list_restaurants()?,
            };
            emit(json, &restaurants, || {
                ui::section("Restaurants");
                println!("{}", ui::restaurants_table(&restaurants));
            })?;
        }

        Commands::ListCustomers => {
            let customers = store.list_customers()?;
            emit(json, &customers, || {
                ui::section("Customers");
                println!("{}", ui::customers_table(&customers));
            })?;
        }

        Commands::ShowReview { id } => {
            let review = store
                .get_review(id)?
                .ok_or_else(|| Error::NotFound(format!("review {}", id)))?;
            let line = review.full_review(&store)?;
            emit(json, &review, || print_lines(std::slice::from_ref(&line)))?;
        }

        Commands::AddRestaurant { name, price } => {
            let restaurant = Restaurant::create(&store, name, price)?;
            emit(json, &restaurant, || {
                ui::success(&format!("Added restaurant {} (id {})", restaurant, id_str(restaurant.id)))
            })?;
        }

        Commands::AddCustomer { first, last } => {
            let customer = Customer::create(&store, first, last)?;
            emit(json, &customer, || {
                ui::success(&format!("Added customer {} (id {})", customer, id_str(customer.id)))
            })?;
        }

        Commands::Review { customer, restaurant, rating } => {
            if !(1..=ui::output::MAX_STARS).contains(&rating) {
                tracing::warn!("Rating {} is outside the usual 1-{} range", rating, ui::output::MAX_STARS);
            }
            let customer = load_customer(&store, customer)?;
            let restaurant = load_restaurant(&store, restaurant)?;
            let review = customer.add_review(&store, &restaurant, rating)?;
            emit(json, &review, || {
                ui::success(&format!(
                    "{} rated {} {}",
                    customer,
                    restaurant.name,
                    ui::stars(rating)
                ))
            })?;
        }

        Commands::Reviews { target } => {
            let lines = match (target.restaurant, target.customer) {
                (Some(id), _) => load_restaurant(&store, id)?.all_reviews(&store)?,
                (None, Some(id)) => load_customer(&store, id)?
                    .reviews(&store)?
                    .iter()
                    .map(|review| review.full_review(&store))
                    .collect::<restaurant_reviews::Result<Vec<_>>>()?,
                (None, None) => unreachable!("clap requires one target"),
            };
            emit(json, &lines, || print_lines(&lines))?;
        }

        Commands::Customers { restaurant } => {
            let restaurant = load_restaurant(&store, restaurant)?;
            let customers = restaurant.customers(&store)?;
            emit(json, &customers, || {
                ui::section(&format!("Customers who reviewed {}", restaurant.name));
                println!("{}", ui::customers_table(&customers));
            })?;
        }

        Commands::Restaurants { customer } => {
            let customer = load_customer(&store, customer)?;
            let restaurants = customer.restaurants(&store)?;
            emit(json, &restaurants, || {
                ui::section(&format!("Restaurants reviewed by {}", customer));
                println!("{}", ui::restaurants_table(&restaurants));
            })?;
        }

        Commands::Fanciest => {
            let restaurant = Restaurant::fanciest(&store)?;
            emit(json, &restaurant, || {
                println!("{} Fanciest restaurant: {}", Icons::CROWN, restaurant)
            })?;
        }

        Commands::Favorite { customer } => {
            let customer = load_customer(&store, customer)?;
            let favorite = customer.favorite_restaurant(&store)?;
            emit(json, &favorite, || {
                println!("{} {}'s favorite restaurant is {}", Icons::HEART, customer, favorite.name)
            })?;
        }

        Commands::DeleteReviews { customer, restaurant } => {
            let customer = load_customer(&store, customer)?;
            let restaurant = load_restaurant(&store, restaurant)?;
            let deleted = customer.delete_reviews(&store, &restaurant)?;
            if deleted == 0 {
                ui::warn(&format!("{} has no reviews of {}", customer, restaurant.name));
            }
            emit(json, &serde_json::json!({ "deleted": deleted }), || {
                println!(
                    "{} Deleted {} review(s) of {} by {}",
                    Icons::DEL,
                    deleted,
                    restaurant.name,
                    customer
                )
            })?;
        }

        Commands::DeleteRestaurant { id } => {
            let outcome = store.delete_restaurant(id)?;
            if !outcome.entity {
                anyhow::bail!("restaurant {} not found", id);
            }
            emit(json, &serde_json::json!({ "id": id, "reviews_deleted": outcome.reviews }), || {
                println!("{} Deleted restaurant {} and {} review(s)", Icons::DEL, id, outcome.reviews)
            })?;
        }

        Commands::DeleteCustomer { id } => {
            let outcome = store.delete_customer(id)?;
            if !outcome.entity {
                anyhow::bail!("customer {} not found", id);
            }
            emit(json, &serde_json::json!({ "id": id, "reviews_deleted": outcome.reviews }), || {
                println!("{} Deleted customer {} and {} review(s)", Icons::DEL, id, outcome.reviews)
            })?;
        }

        Commands::Stats => {
            let stats = store.stats()?;
            emit(json, &stats, || {
                println!("{} Review store ({})", Icons::STATS, location);
                println!("{}", ui::stats_table(&stats));
            })?;
        }

        Commands::Init { .. } => unreachable!("handled before opening the store"),
    }

    store.close()?;
    Ok(())
}

/// Print `value` as JSON, or run the human-readable printer
fn emit<T: Serialize, F: FnOnce()>(json: bool, value: &T, human: F) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    if lines.is_empty() {
        println!("{} No reviews.", Icons::CROSS);
    }
    for line in lines {
        println!("  {} {}", Icons::STAR, line);
    }
}

fn id_str(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string())
}

fn load_restaurant(store: &ReviewStore, id: i64) -> anyhow::Result<Restaurant> {
    store
        .get_restaurant(id)?
        .ok_or_else(|| anyhow::anyhow!("restaurant {} not found", id))
}

fn load_customer(store: &ReviewStore, id: i64) -> anyhow::Result<Customer> {
    store
        .get_customer(id)?
        .ok_or_else(|| anyhow::anyhow!("customer {} not found", id))
}

/// Everything the demo scenario observed, in the order it observed it
#[derive(Debug, Serialize)]
struct DemoReport {
    reviewer: Customer,
    fanciest: Restaurant,
    fanciest_reviews: Vec<String>,
    fanciest_customers: Vec<Customer>,
    reviewer_reviews: Vec<String>,
    reviewer_favorite: Restaurant,
    reviewer_reviews_after_delete: Vec<String>,
}

fn full_reviews(store: &ReviewStore, customer: &Customer) -> restaurant_reviews::Result<Vec<String>> {
    customer
        .reviews(store)?
        .iter()
        .map(|review| review.full_review(store))
        .collect()
}

/// Two customers, two restaurants, three reviews, then navigate and delete.
fn build_demo(store: &ReviewStore) -> anyhow::Result<DemoReport> {
    let john = Customer::create(store, "John", "Doe")?;
    let alice = Customer::create(store, "Alice", "Smith")?;

    let restaurant_a = Restaurant::create(store, "Restaurant A", 4)?;
    let restaurant_b = Restaurant::create(store, "Restaurant B", 3)?;

    john.add_review(store, &restaurant_a, 5)?;
    john.add_review(store, &restaurant_b, 4)?;
    alice.add_review(store, &restaurant_a, 3)?;

    let fanciest = Restaurant::fanciest(store)?;
    let fanciest_reviews = fanciest.all_reviews(store)?;
    let fanciest_customers = fanciest.customers(store)?;
    let reviewer_reviews = full_reviews(store, &john)?;
    let reviewer_favorite = john.favorite_restaurant(store)?;

    john.delete_reviews(store, &restaurant_a)?;
    let reviewer_reviews_after_delete = full_reviews(store, &john)?;

    Ok(DemoReport {
        reviewer: john,
        fanciest,
        fanciest_reviews,
        fanciest_customers,
        reviewer_reviews,
        reviewer_favorite,
        reviewer_reviews_after_delete,
    })
}

fn print_demo(store: &ReviewStore, report: &DemoReport) {
    let name = report.reviewer.full_name();

    ui::header(&format!("All reviews for {}:", report.fanciest.name));
    print_lines(&report.fanciest_reviews);

    ui::section(&format!("Customers who reviewed {}", report.fanciest.name));
    println!("{}", ui::customers_table(&report.fanciest_customers));

    ui::section(&format!("All reviews by {}", name));
    print_lines(&report.reviewer_reviews);

    println!();
    ui::info(&format!("{}'s favorite restaurant", name), &report.reviewer_favorite.name);

    ui::section(&format!("Reviews by {} after deletion", name));
    print_lines(&report.reviewer_reviews_after_delete);

    if let Ok(stats) = store.stats() {
        println!();
        ui::summary_row("Restaurants:", &stats.restaurants.to_string());
        ui::summary_row("Customers:", &stats.customers.to_string());
        ui::summary_row("Reviews:", &stats.reviews.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scenario() {
        let store = ReviewStore::open_in_memory().unwrap();
        let report = build_demo(&store).unwrap();

        assert_eq!(report.reviewer.full_name(), "John Doe");
        assert_eq!(report.fanciest.name, "Restaurant A");
        assert_eq!(
            report.fanciest_reviews,
            vec![
                "Review for Restaurant A by John Doe: 5 stars.",
                "Review for Restaurant A by Alice Smith: 3 stars.",
            ]
        );
        let names: Vec<String> = report.fanciest_customers.iter().map(Customer::full_name).collect();
        assert_eq!(names, vec!["John Doe", "Alice Smith"]);
        assert_eq!(
            report.reviewer_reviews,
            vec![
                "Review for Restaurant A by John Doe: 5 stars.",
                "Review for Restaurant B by John Doe: 4 stars.",
            ]
        );
        assert_eq!(report.reviewer_favorite.name, "Restaurant A");
        assert_eq!(
            report.reviewer_reviews_after_delete,
            vec!["Review for Restaurant B by John Doe: 4 stars."]
        );
        assert_eq!(store.count_reviews().unwrap(), 2);
    }

    #[test]
    fn test_cli_parses_listing_commands() {
        let cli = Cli::try_parse_from(["reviews", "list-restaurants", "--name", "Restaurant A"]).unwrap();
        assert!(matches!(cli.command, Commands::ListRestaurants { name: Some(ref n) } if n == "Restaurant A"));

        let cli = Cli::try_parse_from(["reviews", "--json", "show-review", "3"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::ShowReview { id: 3 }));
    }

    #[test]
    fn test_cli_reviews_requires_one_target() {
        assert!(Cli::try_parse_from(["reviews", "reviews"]).is_err());
        assert!(Cli::try_parse_from(["reviews", "reviews", "--restaurant", "1", "--customer", "2"]).is_err());
        assert!(Cli::try_parse_from(["reviews", "reviews", "--customer", "2"]).is_ok());
    }
}
