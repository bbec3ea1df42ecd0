//! Row statistics and the end-of-run report

use crate::output::types::RunSummary;
use crate::records::Row;
use std::collections::HashMap;

/// Counts rows per category, largest first (ties by name)
pub fn category_breakdown(rows: &[Row]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.category.as_str()).or_insert(0) += 1;
    }

    let mut breakdown: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(category, count)| (category.to_string(), count))
        .collect();
    breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    breakdown
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Complete ===\n");

    println!("Total rows collected: {}", summary.total_rows);
    println!(
        "Work items: {} succeeded, {} failed",
        summary.items_succeeded(),
        summary.items_failed
    );
    println!();

    if !summary.categories.is_empty() {
        println!("Rows by Category:");
        for (category, count) in &summary.categories {
            println!("  - {}: {} rows", category, count);
        }
        println!();
    }

    match &summary.combined_path {
        Some(path) => println!("Main file: {}", path.display()),
        None => println!("No rows collected; combined file not written"),
    }
}
