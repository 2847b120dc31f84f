//! IANA IPv4 address space registry.
//!
//! The CSV lists every `/8` with its status; allocated and legacy blocks
//! seed the IPv4 forest.

use crate::error::CidrError;
use crate::models::Block;
use lazy_static::lazy_static;
use regex::Regex;
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr};

const PREFIX_COLUMN: usize = 0;
const STATUS_COLUMN: usize = 5;
const ROUTED_STATUS: [&str; 2] = ["ALLOCATED", "LEGACY"];

lazy_static! {
    // One field per match; quoted fields may hold commas and "" escapes.
    static ref CSV_FIELD: Regex =
        Regex::new(r#"(?:^|,)("(?:[^"]|"")*"|[^,]*)"#).expect("Invalid Regex?");
}

/// Split one CSV line into unquoted fields.
fn split_csv_line(line: &str) -> Vec<String> {
    CSV_FIELD
        .captures_iter(line)
        .map(|c| {
            let field = c.get(1).map_or("", |m| m.as_str());
            match field.strip_prefix('"').and_then(|f| f.strip_suffix('"')) {
                Some(inner) => inner.replace("\"\"", "\""),
                None => field.to_string(),
            }
        })
        .collect()
}

/// Parse the `NNN/8` notation of the prefix column into `N.0.0.0/8`.
fn parse_slash8(field: &str) -> Result<Block, CidrError> {
    let (octet, len) = field
        .trim()
        .split_once('/')
        .ok_or_else(|| CidrError::invalid_prefix(field, "expected NNN/len"))?;
    let octet: u8 = octet
        .parse()
        .map_err(|_| CidrError::invalid_prefix(field, format!("invalid first octet {octet}")))?;
    let len: u8 = len
        .parse()
        .map_err(|_| CidrError::invalid_prefix(field, format!("invalid prefix length {len}")))?;
    Block::new(IpAddr::V4(Ipv4Addr::new(octet, 0, 0, 0)), len)
}

/// Join physical lines into CSV records; a quoted field may span lines.
///
/// Returns each record with the line number it starts on.
fn csv_records(text: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        let (start, record) = match pending.take() {
            Some((start, mut record)) => {
                record.push('\n');
                record.push_str(line);
                (start, record)
            }
            None => (i + 1, line.to_string()),
        };
        if record.matches('"').count() % 2 == 1 {
            pending = Some((start, record));
        } else {
            records.push((start, record));
        }
    }
    records.extend(pending);
    records
}

/// Base IPv4 blocks: the allocated and legacy `/8`s, in file order.
pub fn parse_ipv4_address_space(text: &str) -> Result<Vec<Block>, Box<dyn Error>> {
    let mut blocks = Vec::new();
    // skip the title
    for (line_no, record) in csv_records(text).into_iter().skip(1) {
        if record.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(&record);
        let status = fields
            .get(STATUS_COLUMN)
            .ok_or_else(|| format!("ipv4-address-space line {line_no}: missing status column"))?;
        if !ROUTED_STATUS.contains(&status.trim()) {
            continue;
        }
        let block = parse_slash8(&fields[PREFIX_COLUMN])
            .map_err(|e| format!("ipv4-address-space line {line_no}: {e}"))?;
        blocks.push(block);
    }
    log::info!("IANA: {} allocated/legacy IPv4 blocks", blocks.len());
    Ok(blocks)
}
