//! Output formatting for the allow-lists.
//!
//! - [`formats`] - BIRD, subnet list, MikroTik and JSON files
//! - [`terminal`] - terminal summary

mod formats;
mod terminal;

pub use formats::{file_name, render, write_outputs, RenderOptions};
pub use terminal::{address_total, format_field, print_summary, summary_row};
