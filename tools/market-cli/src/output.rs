//! Output formatting for the CLI.

use console::style;
use market_sdk::prelude::{Product, RankedProduct};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print products as a table.
    pub fn products(&self, products: &[Product]) {
        let rows: Vec<(&Product, Option<f64>)> = products.iter().map(|p| (p, None)).collect();
        self.product_rows(&rows);
    }

    /// Print ranked search hits as a table.
    pub fn ranked(&self, items: &[RankedProduct]) {
        let rows: Vec<(&Product, Option<f64>)> = items.iter().map(|i| (&i.product, i.score)).collect();
        self.product_rows(&rows);
    }

    fn product_rows(&self, rows: &[(&Product, Option<f64>)]) {
        const WIDTHS: [usize; 6] = [8, 28, 12, 10, 10, 7];
        self.table_row(&["ID", "NAME", "CATEGORY", "PRICE", "RATING", "SCORE"], &WIDTHS);
        for (product, score) in rows {
            let price = product.price.to_string();
            let rating = format!("{:.1} ({})", product.rating, product.review_count);
            let score = score.map(|s| format!("{:.3}", s)).unwrap_or_else(|| "-".to_string());
            self.table_row(
                &[
                    product.id.as_str(),
                    &truncate(&product.name, WIDTHS[1]),
                    product.category.as_str(),
                    &price,
                    &rating,
                    &score,
                ],
                &WIDTHS,
            );
        }
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Format microseconds as a human-readable duration.
pub fn format_micros(us: u64) -> String {
    if us < 1_000 {
        format!("{}µs", us)
    } else if us < 1_000_000 {
        format!("{:.1}ms", us as f64 / 1_000.0)
    } else {
        format!("{:.2}s", us as f64 / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Lamp", 10), "Lamp");
        assert_eq!(truncate("Wireless Headphones", 8), "Wireles…");
    }

    #[test]
    fn test_format_micros() {
        assert_eq!(format_micros(250), "250µs");
        assert_eq!(format_micros(1_500), "1.5ms");
        assert_eq!(format_micros(2_000_000), "2.00s");
    }
}
