//! Allow-list generation: every public address minus one country's ranges
//! and the reserved ranges, as a minimal sorted list of CIDR blocks.

pub mod config;
pub mod error;
pub mod feeds;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;

use config::{Config, ListSource};
use models::{Block, Family, Forest};
use processing::{check_disjoint, collect, subtract, SubtractReport};
use std::error::Error;

/// Result of one family's run.
#[derive(Debug, Clone)]
pub struct AllowList {
    pub family: Family,
    /// Live blocks, ordered by address then prefix length.
    pub blocks: Vec<Block>,
    pub country: SubtractReport,
    pub reserved: SubtractReport,
}

/// Blocks the forest of `family` is seeded with.
pub fn base_blocks(config: &Config, family: Family) -> Result<Vec<Block>, Box<dyn Error>> {
    match family {
        Family::V4 => {
            let path = config.feed_path(config::IANA_IPV4_FILE);
            let text = feeds::read_feed(&path, config::IANA_IPV4_URL, config.download)?;
            feeds::parse_ipv4_address_space(&text)
        }
        Family::V6 => Ok(vec![Block::parse(config::IPV6_UNICAST, Family::V6)?]),
    }
}

/// Country ranges of `family` from the configured lists, in pass order.
pub fn country_exclusions(config: &Config, family: Family) -> Result<Vec<Block>, Box<dyn Error>> {
    let sources = match family {
        Family::V4 => &config.ipv4_list,
        Family::V6 => &config.ipv6_list,
    };
    let mut exclusions = Vec::new();

    if sources.contains(&ListSource::Apnic) {
        let path = config.feed_path(config::DELEGATED_FILE);
        let text = feeds::read_feed(&path, config::DELEGATED_URL, config.download)?;
        let ranges = feeds::parse_delegated(&text, &config.country)?;
        exclusions.extend_from_slice(ranges.get(family));
    }
    if sources.contains(&ListSource::Clang) {
        let (file, url) = match family {
            Family::V4 => (config::TEXT_LIST_V4_FILE, config::TEXT_LIST_V4_URL),
            Family::V6 => (config::TEXT_LIST_V6_FILE, config::TEXT_LIST_V6_URL),
        };
        let text = feeds::read_feed(&config.feed_path(file), url, config.download)?;
        exclusions.extend(feeds::parse_text_list(&text, family, file)?);
    }
    Ok(exclusions)
}

/// Subtract the country pass, then the reserved pass (with `extra` merged in).
pub fn build_allow_list(
    family: Family,
    base: Vec<Block>,
    country: &[Block],
    extra: &[Block],
) -> Result<AllowList, Box<dyn Error>> {
    let mut forest = Forest::from_blocks(family, base)?;
    log::info!("{family}: {} base blocks", forest.roots().len());

    let country_report = subtract(&mut forest, country)?;
    log::info!("{family}: country pass {country_report}");

    let reserved = feeds::reserved_with(family, extra);
    let reserved_report = subtract(&mut forest, &reserved)?;
    log::info!("{family}: reserved pass {reserved_report}");
    log::trace!("{family} tree:\n{}", forest.render_tree());

    let blocks = collect(&forest);
    check_disjoint(&blocks)?;
    log::info!("{family}: {} live blocks", blocks.len());

    Ok(AllowList {
        family,
        blocks,
        country: country_report,
        reserved: reserved_report,
    })
}

/// Build both families and write the configured output files.
pub fn run(config: &Config) -> Result<Vec<AllowList>, Box<dyn Error>> {
    let list_name = config.list_name();
    let opts = output::RenderOptions {
        next_hop: &config.next,
        list_name: &list_name,
        generated_at: Some(chrono::Utc::now()),
    };

    let mut lists = Vec::new();
    for family in [Family::V4, Family::V6] {
        let base = base_blocks(config, family)?;
        let country = country_exclusions(config, family)?;
        let list = build_allow_list(family, base, &country, &config.exclude)?;
        output::write_outputs(&config.out_dir, family, &list.blocks, &config.formats, &opts)?;
        lists.push(list);
    }
    Ok(lists)
}
