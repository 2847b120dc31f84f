//! Terminal output utilities.

use crate::models::Block;
use crate::AllowList;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Addresses covered by `blocks`, saturating at `u128::MAX`.
pub fn address_total(blocks: &[Block]) -> u128 {
    blocks.iter().fold(0u128, |total, b| {
        total.saturating_add(b.address_count().unwrap_or(u128::MAX))
    })
}

/// One summary row per family.
pub fn summary_row(list: &AllowList) -> String {
    format!(
        "{family},{blocks},{addresses},{country},{reserved}",
        family = format_field(list.family, 6),
        blocks = format_field(list.blocks.len(), 8),
        addresses = format_field(address_total(&list.blocks), 42),
        country = format_field(list.country, 48),
        reserved = format_field(list.reserved, 48),
    )
}

/// Print the per-family summary to stdout.
pub fn print_summary(lists: &[AllowList]) {
    println!(
        r#""family", "blocks",                               "addresses",                                    "country pass",                                   "reserved pass""#
    );
    for list in lists {
        let row = summary_row(list);
        if list.blocks.is_empty() {
            println!("{}", row.yellow());
        } else {
            println!("{}", row.green());
        }
    }
}
