//! Plain text country lists, one CIDR per line.

use crate::models::{Block, Family};
use std::error::Error;

/// Parse a list of `family` prefixes; blank lines and `#` comments are skipped.
pub fn parse_text_list(text: &str, family: Family, name: &str) -> Result<Vec<Block>, Box<dyn Error>> {
    let mut blocks = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let block = Block::parse(line, family).map_err(|e| format!("{name} line {}: {e}", i + 1))?;
        blocks.push(block);
    }
    log::info!("{name}: {} {family} blocks", blocks.len());
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_list() {
        let text = "1.0.1.0/24\n\n# comment\n 1.0.2.0/23 \r\n";
        let blocks = parse_text_list(text, Family::V4, "all_cn.txt").unwrap();
        assert_eq!(
            blocks,
            vec![
                "1.0.1.0/24".parse::<Block>().unwrap(),
                "1.0.2.0/23".parse::<Block>().unwrap()
            ]
        );
    }

    #[test]
    fn test_parse_text_list_wrong_family() {
        let err = parse_text_list("1.0.1.0/24\n2001:250::/35\n", Family::V4, "all_cn.txt")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "all_cn.txt line 2: invalid prefix '2001:250::/35': expected an IPv4 prefix"
        );
    }

    #[test]
    fn test_parse_text_list_malformed() {
        assert!(parse_text_list("1.0.1.0/33\n", Family::V4, "all_cn.txt").is_err());
        assert!(parse_text_list("not-a-prefix\n", Family::V6, "all_cn_ipv6.txt").is_err());
    }
}
