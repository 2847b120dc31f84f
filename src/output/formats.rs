//! Rendering of the live block list into router and firewall files.

use crate::config::OutputFormat;
use crate::models::{Block, Family};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Values shared by all renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    /// Next hop of the BIRD routes.
    pub next_hop: &'a str,
    /// MikroTik address list name for IPv4; IPv6 appends `v6`.
    pub list_name: &'a str,
    /// Written as a comment into formats that allow one.
    pub generated_at: Option<DateTime<Utc>>,
}

fn family_list_name(list_name: &str, family: Family) -> String {
    match family {
        Family::V4 => list_name.to_string(),
        Family::V6 => format!("{list_name}v6"),
    }
}

fn family_digit(family: Family) -> char {
    match family {
        Family::V4 => '4',
        Family::V6 => '6',
    }
}

/// Output file name, e.g. `routes4.conf` or `noCNv6.rsc`.
pub fn file_name(format: OutputFormat, family: Family, list_name: &str) -> String {
    let digit = family_digit(family);
    match format {
        OutputFormat::Bird => format!("routes{digit}.conf"),
        OutputFormat::Subnet => format!("subnet{digit}.txt"),
        OutputFormat::Mikrotik => format!("{}.rsc", family_list_name(list_name, family)),
        OutputFormat::Json => format!("allow{digit}.json"),
    }
}

fn header(opts: &RenderOptions) -> String {
    match opts.generated_at {
        Some(at) => format!("# generated by cidr-exclude at {}\n", at.to_rfc3339()),
        None => String::new(),
    }
}

/// Render `blocks` (already ordered) in `format`.
pub fn render(
    format: OutputFormat,
    family: Family,
    blocks: &[Block],
    opts: &RenderOptions,
) -> Result<String, Box<dyn Error>> {
    let mut out = String::new();
    match format {
        OutputFormat::Bird => {
            out.push_str(&header(opts));
            for block in blocks {
                out.push_str(&format!("route {block} via \"{}\";\n", opts.next_hop));
            }
        }
        OutputFormat::Subnet => {
            for block in blocks {
                out.push_str(&format!("{block}\n"));
            }
        }
        OutputFormat::Mikrotik => {
            let menu = match family {
                Family::V4 => "/ip",
                Family::V6 => "/ipv6",
            };
            let name = family_list_name(opts.list_name, family);
            out.push_str(&header(opts));
            out.push_str(&format!("{menu} firewall address-list\n"));
            out.push_str(&format!("remove [{menu} firewall address-list find list={name}]\n"));
            let adds = blocks
                .iter()
                .map(|block| format!("add list={name} address={block}\n"))
                .join("");
            out.push_str(&adds);
        }
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(blocks)
                .map_err(|e| format!("Error serializing JSON: {e}"))?;
            out.push('\n');
        }
    }
    Ok(out)
}

/// Write every requested format for one family into `dir`.
pub fn write_outputs(
    dir: &Path,
    family: Family,
    blocks: &[Block],
    formats: &[OutputFormat],
    opts: &RenderOptions,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    std::fs::create_dir_all(dir).map_err(|e| format!("Error creating {}: {e}", dir.display()))?;
    let mut written = Vec::new();
    for format in formats.iter().unique() {
        let path = dir.join(file_name(*format, family, opts.list_name));
        let text = render(*format, family, blocks, opts)?;
        std::fs::write(&path, text)
            .map_err(|e| format!("Error writing output file {}: {e}", path.display()))?;
        log::info!("Wrote {} {family} blocks to {}", blocks.len(), path.display());
        written.push(path);
    }
    Ok(written)
}
