//! Run configuration.
//!
//! Options come from the command line, falling back to environment
//! variables (a `.env` file is loaded first by `main`).

use crate::models::Block;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const IANA_IPV4_FILE: &str = "ipv4-address-space.csv";
pub const IANA_IPV4_URL: &str =
    "https://www.iana.org/assignments/ipv4-address-space/ipv4-address-space.csv";

pub const DELEGATED_FILE: &str = "delegated-apnic-latest";
pub const DELEGATED_URL: &str = "https://ftp.apnic.net/apnic/stats/apnic/delegated-apnic-latest";

pub const TEXT_LIST_V4_FILE: &str = "all_cn.txt";
pub const TEXT_LIST_V4_URL: &str = "https://ispip.clang.cn/all_cn.txt";

pub const TEXT_LIST_V6_FILE: &str = "all_cn_ipv6.txt";
pub const TEXT_LIST_V6_URL: &str = "https://ispip.clang.cn/all_cn_ipv6.txt";

/// Base block for the IPv6 forest: global unicast.
pub const IPV6_UNICAST: &str = "2000::/3";

pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

/// Country IP list a pass can subtract.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    /// RIR delegated statistics feed.
    Apnic,
    /// Plain text list, one CIDR per line.
    Clang,
}

/// Output file kind.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// BIRD static routes.
    Bird,
    /// One CIDR per line.
    Subnet,
    /// MikroTik firewall address-list script.
    Mikrotik,
    /// JSON array of CIDR strings.
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Generate routes and address lists for every public address outside one country"
)]
pub struct Config {
    /// Extra ranges to exclude in CIDR format (IPv4 or IPv6).
    #[arg(long, value_name = "CIDR", num_args = 0..)]
    pub exclude: Vec<Block>,

    /// Next hop for the generated routes, usually the tunnel interface.
    #[arg(long, value_name = "INTERFACE OR IP", default_value = "wg0", env = "ALLOWLIST_NEXT")]
    pub next: String,

    /// IPv4 country lists to subtract.
    #[arg(long = "ipv4-list", value_enum, num_args = 0.., default_values = ["apnic", "clang"])]
    pub ipv4_list: Vec<ListSource>,

    /// IPv6 country lists to subtract.
    #[arg(long = "ipv6-list", value_enum, num_args = 0.., default_values = ["apnic", "clang"])]
    pub ipv6_list: Vec<ListSource>,

    /// Country code matched in the delegated feed.
    #[arg(long, default_value = "CN", env = "ALLOWLIST_COUNTRY")]
    pub country: String,

    /// Directory holding the feed files.
    #[arg(long, default_value = ".", env = "ALLOWLIST_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Directory the output files are written to.
    #[arg(long, default_value = ".", env = "ALLOWLIST_OUT_DIR")]
    pub out_dir: PathBuf,

    /// Output files to write.
    #[arg(long = "format", value_enum, num_args = 1.., default_values = ["bird", "subnet", "mikrotik"])]
    pub formats: Vec<OutputFormat>,

    /// Download missing feed files with curl.
    #[arg(long, env = "ALLOWLIST_DOWNLOAD")]
    pub download: bool,

    /// log4rs configuration file.
    #[arg(long, default_value = LOG_CONFIG_FILE, env = "ALLOWLIST_LOG_CONFIG")]
    pub log_config: PathBuf,
}

impl Config {
    /// Name of the MikroTik address list, e.g. `noCN`.
    pub fn list_name(&self) -> String {
        format!("no{}", self.country.to_uppercase())
    }

    pub fn feed_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}
