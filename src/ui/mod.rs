pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{header, info, section, stars, success, summary_row, warn};
pub use table::{customers_table, restaurants_table, stats_table};
pub use theme::{theme, Theme};
