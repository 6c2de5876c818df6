use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

/// Upper bound of the conventional rating scale
pub const MAX_STARS: i64 = 5;

pub fn header(text: &str) {
    println!("{} {}", Icons::PLATE, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

/// Render a rating as filled/empty stars, e.g. `★★★☆☆`.
/// Out-of-scale ratings are clamped for display only.
pub fn stars(rating: i64) -> String {
    let filled = rating.clamp(0, MAX_STARS) as usize;
    let empty = MAX_STARS as usize - filled;
    format!(
        "{}{}",
        "★".repeat(filled).style(theme().rating.clone()),
        "☆".repeat(empty).style(theme().dim.clone())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_plain_width() {
        assert_eq!(console::strip_ansi_codes(&stars(3)), "★★★☆☆");
        assert_eq!(console::strip_ansi_codes(&stars(9)), "★★★★★");
        assert_eq!(console::strip_ansi_codes(&stars(-1)), "☆☆☆☆☆");
    }
}
