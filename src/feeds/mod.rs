//! Input feeds: base blocks and exclusion lists.
//!
//! - [`iana`] - IANA IPv4 address space (base blocks)
//! - [`delegated`] - RIR delegated statistics per country
//! - [`text_list`] - plain country CIDR lists
//! - [`reserved`] - static reserved/bogon tables
//! - [`cache`] - reading feed files, downloading missing ones

mod cache;
mod delegated;
mod iana;
mod reserved;
mod text_list;

// Re-export public types and functions
pub use cache::read_feed;
pub use delegated::{parse_delegated, CountryRanges};
pub use iana::parse_ipv4_address_space;
pub use reserved::{reserved, reserved_with, RESERVED_V4, RESERVED_V6};
pub use text_list::parse_text_list;
