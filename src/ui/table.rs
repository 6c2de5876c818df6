use tabled::{settings::Style, Table, Tabled};
use crate::{Customer, Restaurant};
use crate::storage::DbStats;

#[derive(Tabled)]
struct RestaurantRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: i64,
}

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: usize,
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn restaurants_table(restaurants: &[Restaurant]) -> String {
    let rows: Vec<RestaurantRow> = restaurants
        .iter()
        .map(|r| RestaurantRow {
            id: id_cell(r.id),
            name: r.name.clone(),
            price: r.price,
        })
        .collect();
    render(&rows)
}

pub fn customers_table(customers: &[Customer]) -> String {
    let rows: Vec<CustomerRow> = customers
        .iter()
        .map(|c| CustomerRow {
            id: id_cell(c.id),
            name: c.full_name(),
        })
        .collect();
    render(&rows)
}

pub fn stats_table(stats: &DbStats) -> String {
    render(&[
        MetricRow { metric: "Restaurants", value: stats.restaurants },
        MetricRow { metric: "Customers", value: stats.customers },
        MetricRow { metric: "Reviews", value: stats.reviews },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_renders_nothing() {
        assert!(restaurants_table(&[]).is_empty());
    }

    #[test]
    fn test_customer_table_has_full_names() {
        let mut john = Customer::new("John", "Doe");
        john.id = Some(1);
        let table = customers_table(&[john, Customer::new("Alice", "Smith")]);
        assert!(table.contains("John Doe"));
        assert!(table.contains("Alice Smith"));
        assert!(table.contains(" - "));
    }
}
