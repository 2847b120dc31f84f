//! Reserved and bogon ranges, always excluded.

use crate::models::{Block, Family};
use lazy_static::lazy_static;

const RESERVED_V4_CIDRS: [&str; 17] = [
    "0.0.0.0/8",          // RFC1700, "this" network
    "10.0.0.0/8",         // RFC1918, private network A
    "100.64.0.0/10",      // RFC6598, carrier-grade NAT
    "127.0.0.0/8",        // RFC990, loopback
    "169.254.0.0/16",     // RFC3927, link-local
    "172.16.0.0/12",      // RFC1918, private network B
    "192.0.0.0/24",       // RFC5736, IETF protocol assignments, DS-Lite
    "192.0.2.0/24",       // RFC5737, TEST-NET-1
    "192.88.99.0/24",     // RFC3068, 6to4 relay
    "192.168.0.0/16",     // RFC1918, private network C
    "198.18.0.0/15",      // RFC2544, benchmarking
    "198.51.100.0/24",    // RFC5737, TEST-NET-2
    "203.0.113.0/24",     // RFC5737, TEST-NET-3
    "224.0.0.0/4",        // RFC1112, multicast
    "233.252.0.0/24",     // RFC5771, MCAST-TEST-NET
    "240.0.0.0/4",        // RFC6890, future use
    "255.255.255.255/32", // RFC6890, limited broadcast
];

const RESERVED_V6_CIDRS: [&str; 5] = [
    "2001::/32",     // RFC6890, Teredo
    "2001:10::/28",  // RFC4843, ORCHID
    "2001:20::/28",  // RFC7374, ORCHIDv2
    "2001:db8::/32", // RFC3849, documentation
    "2002::/16",     // RFC3056, 6to4
];

fn parse_table(cidrs: &[&str]) -> Vec<Block> {
    cidrs
        .iter()
        .map(|s| s.parse().expect("Invalid reserved prefix"))
        .collect()
}

lazy_static! {
    pub static ref RESERVED_V4: Vec<Block> = parse_table(&RESERVED_V4_CIDRS);
    pub static ref RESERVED_V6: Vec<Block> = parse_table(&RESERVED_V6_CIDRS);
}

pub fn reserved(family: Family) -> &'static [Block] {
    match family {
        Family::V4 => &RESERVED_V4,
        Family::V6 => &RESERVED_V6,
    }
}

/// Reserved table of `family` followed by the `extra` blocks of that family.
pub fn reserved_with(family: Family, extra: &[Block]) -> Vec<Block> {
    reserved(family)
        .iter()
        .chain(extra.iter().filter(|b| b.family() == family))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_parse() {
        assert_eq!(RESERVED_V4.len(), 17);
        assert_eq!(RESERVED_V6.len(), 5);
        assert!(RESERVED_V4.iter().all(|b| b.family() == Family::V4));
        assert!(RESERVED_V6.iter().all(|b| b.family() == Family::V6));
        assert_eq!(reserved(Family::V4)[13].to_string(), "224.0.0.0/4");
    }

    #[test]
    fn test_reserved_with() {
        let extra: Vec<Block> = vec![
            "100.100.0.0/16".parse().unwrap(),
            "2400:da00::/32".parse().unwrap(),
        ];
        let v4 = reserved_with(Family::V4, &extra);
        assert_eq!(v4.len(), 18);
        assert_eq!(v4.last().unwrap().to_string(), "100.100.0.0/16");

        let v6 = reserved_with(Family::V6, &extra);
        assert_eq!(v6.len(), 6);
        assert_eq!(v6.last().unwrap().to_string(), "2400:da00::/32");

        // the static table is untouched
        assert_eq!(reserved(Family::V4).len(), 17);
    }
}
