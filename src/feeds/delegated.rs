//! RIR delegated statistics (`delegated-apnic-latest`).
//!
//! Records are `registry|cc|type|start|value|date|status`. For `ipv4` the
//! value is an address count, for `ipv6` a prefix length.

use crate::models::{range_to_blocks, Block, Family};
use std::error::Error;
use std::net::IpAddr;

/// Country ranges of both families, in feed order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountryRanges {
    pub v4: Vec<Block>,
    pub v6: Vec<Block>,
}

impl CountryRanges {
    pub fn get(&self, family: Family) -> &[Block] {
        match family {
            Family::V4 => &self.v4,
            Family::V6 => &self.v6,
        }
    }
}

/// Collect the `ipv4` and `ipv6` records delegated to `country`.
pub fn parse_delegated(text: &str, country: &str) -> Result<CountryRanges, Box<dyn Error>> {
    let mut ranges = CountryRanges::default();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('|').collect();
        // version and summary lines never carry a country code
        if fields.len() < 5 || !fields[1].eq_ignore_ascii_case(country) {
            continue;
        }
        let context = |e: &dyn std::fmt::Display| format!("delegated line {}: {e}", i + 1);
        match fields[2] {
            "ipv4" => {
                let start: IpAddr = fields[3]
                    .parse()
                    .map_err(|_| context(&format!("invalid start address {}", fields[3])))?;
                let count: u128 = fields[4]
                    .parse()
                    .map_err(|_| context(&format!("invalid address count {}", fields[4])))?;
                let blocks = range_to_blocks(start, count).map_err(|e| context(&e))?;
                if blocks.iter().any(|b| b.family() != Family::V4) {
                    return Err(context(&format!("{} is not an IPv4 address", fields[3])).into());
                }
                ranges.v4.extend(blocks);
            }
            "ipv6" => {
                let block = Block::parse(&format!("{}/{}", fields[3], fields[4]), Family::V6)
                    .map_err(|e| context(&e))?;
                ranges.v6.push(block);
            }
            _ => continue,
        }
    }
    log::info!(
        "delegated: {} IPv4 and {} IPv6 blocks for {country}",
        ranges.v4.len(),
        ranges.v6.len()
    );
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
2|apnic|20241016|6|19830613|20241015|+1000
# comment line
apnic|*|asn|*|3|summary
apnic|*|ipv4|*|4|summary
apnic|*|ipv6|*|2|summary
apnic|AU|ipv4|1.0.0.0|256|20110811|assigned
apnic|CN|ipv4|1.0.1.0|256|20110414|allocated
apnic|CN|ipv4|1.0.2.0|768|20110414|allocated
apnic|CN|asn|4134|1|20000101|allocated
apnic|CN|ipv6|2001:250::|35|20000426|allocated
apnic|JP|ipv6|2001:200::|35|19990813|allocated
";

    #[test]
    fn test_parse_delegated() {
        let ranges = parse_delegated(SAMPLE, "CN").unwrap();
        let v4: Vec<String> = ranges.v4.iter().map(|b| b.to_string()).collect();
        assert_eq!(v4, vec!["1.0.1.0/24", "1.0.2.0/23", "1.0.4.0/24"]);
        let v6: Vec<String> = ranges.get(Family::V6).iter().map(|b| b.to_string()).collect();
        assert_eq!(v6, vec!["2001:250::/35"]);
    }

    #[test]
    fn test_parse_delegated_other_country() {
        let ranges = parse_delegated(SAMPLE, "jp").unwrap();
        assert!(ranges.v4.is_empty());
        assert_eq!(ranges.v6.len(), 1);
        assert!(parse_delegated(SAMPLE, "NZ").unwrap().v4.is_empty());
    }

    #[test]
    fn test_parse_delegated_bad_record() {
        let err = parse_delegated("apnic|CN|ipv4|1.0.1|256|20110414|allocated\n", "CN").unwrap_err();
        assert_eq!(err.to_string(), "delegated line 1: invalid start address 1.0.1");

        let err =
            parse_delegated("\napnic|CN|ipv6|2001:250::1|35|20000426|allocated\n", "CN").unwrap_err();
        assert!(err.to_string().starts_with("delegated line 2: invalid prefix"));
    }
}
