//! Address blocks for both address families.
//!
//! A [`Block`] keeps its network address as a `u128` (IPv4 uses the low 32
//! bits) so the prefix arithmetic is shared between families.

use crate::error::CidrError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Maximum prefix length of an IPv4 block.
pub const MAX_LENGTH_V4: u8 = 32;
/// Maximum prefix length of an IPv6 block.
pub const MAX_LENGTH_V6: u8 = 128;

/// IP address family of a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Address width in bits.
    pub const fn max_length(self) -> u8 {
        match self {
            Family::V4 => MAX_LENGTH_V4,
            Family::V6 => MAX_LENGTH_V6,
        }
    }

    pub fn of(addr: &IpAddr) -> Family {
        match addr {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }

    /// All address bits of the family set.
    fn all_bits(self) -> u128 {
        match self {
            Family::V4 => u32::MAX as u128,
            Family::V6 => u128::MAX,
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// Convert a prefix length to a network mask for `family`.
///
/// # Examples
/// ```
/// use cidr_exclude::models::{get_cidr_mask, Family};
/// assert_eq!(get_cidr_mask(Family::V4, 24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(family: Family, len: u8) -> Result<u128, CidrError> {
    let max = family.max_length();
    if len > max {
        return Err(CidrError::invalid_prefix(
            &format!("/{len}"),
            format!("prefix length is longer than {max}"),
        ));
    }
    if len == 0 {
        return Ok(0);
    }
    let right_len = max - len;
    Ok((family.all_bits() >> right_len) << right_len)
}

/// Smallest prefix length `bits` can be the network address of.
pub fn lo_mask(family: Family, bits: u128) -> u8 {
    let max = family.max_length();
    let trailing_zeros = bits.trailing_zeros().min(max as u32) as u8;
    max - trailing_zeros
}

fn addr_bits(addr: &IpAddr) -> u128 {
    match addr {
        IpAddr::V4(a) => u32::from(*a) as u128,
        IpAddr::V6(a) => u128::from(*a),
    }
}

fn bits_to_addr(family: Family, bits: u128) -> IpAddr {
    match family {
        Family::V4 => IpAddr::V4(Ipv4Addr::from(bits as u32)),
        Family::V6 => IpAddr::V6(Ipv6Addr::from(bits)),
    }
}

/// Network prefix: family, network address and prefix length.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub struct Block {
    family: Family,
    bits: u128,
    len: u8,
}

impl Block {
    /// Create a block from a network address and prefix length.
    ///
    /// Host bits beyond `len` must be zero.
    pub fn new(addr: IpAddr, len: u8) -> Result<Block, CidrError> {
        let family = Family::of(&addr);
        let mask = get_cidr_mask(family, len)
            .map_err(|_| CidrError::invalid_prefix(&format!("{addr}/{len}"), "prefix length too long"))?;
        let bits = addr_bits(&addr);
        if bits & !mask != 0 {
            return Err(CidrError::invalid_prefix(
                &format!("{addr}/{len}"),
                "host bits set",
            ));
        }
        Ok(Block { family, bits, len })
    }

    /// Parse `addr/len` text and require it to belong to `family`.
    pub fn parse(s: &str, family: Family) -> Result<Block, CidrError> {
        let block: Block = s.parse()?;
        if block.family != family {
            return Err(CidrError::invalid_prefix(
                s.trim(),
                format!("expected an {family} prefix"),
            ));
        }
        Ok(block)
    }

    /// Build from already-masked bits; callers keep `bits` aligned to `len`.
    pub(crate) fn from_bits(family: Family, bits: u128, len: u8) -> Block {
        debug_assert!(len <= family.max_length());
        Block { family, bits, len }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Network address as an integer.
    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// Lowest (network) address in the block.
    pub fn network(&self) -> IpAddr {
        bits_to_addr(self.family, self.bits)
    }

    /// Highest address in the block as an integer.
    pub fn hi_bits(&self) -> u128 {
        let mask = get_cidr_mask(self.family, self.len).unwrap_or(0);
        self.bits | (!mask & self.family.all_bits())
    }

    /// Highest (broadcast) address in the block.
    pub fn broadcast(&self) -> IpAddr {
        bits_to_addr(self.family, self.hi_bits())
    }

    /// Number of addresses covered, `None` for `::/0` which does not fit a u128.
    pub fn address_count(&self) -> Option<u128> {
        1u128.checked_shl((self.family.max_length() - self.len) as u32)
    }

    /// Network address truncated to its first `len` bits.
    pub fn prefix_bits(&self, len: u8) -> u128 {
        cut_bits(self.family, self.bits, len)
    }

    /// True if `other` lies inside this block (equal blocks included).
    pub fn contains(&self, other: &Block) -> bool {
        self.family == other.family
            && self.len <= other.len
            && cut_bits(self.family, other.bits, self.len) == self.bits
    }

    /// True if `other` lies inside this block and is strictly smaller.
    pub fn is_supernet_of(&self, other: &Block) -> bool {
        self.len < other.len && self.contains(other)
    }

    pub fn overlaps(&self, other: &Block) -> bool {
        self.contains(other) || other.contains(self)
    }
}

/// Truncate `bits` to its first `len` bits.
fn cut_bits(family: Family, bits: u128, len: u8) -> u128 {
    match get_cidr_mask(family, len) {
        Ok(mask) => bits & mask,
        Err(_) => bits,
    }
}

/// Split the range `start .. start + count` into the fewest aligned blocks.
///
/// Delegation feeds give IPv4 ranges as a start address plus an address
/// count that is not always a power of two.
pub fn range_to_blocks(start: IpAddr, count: u128) -> Result<Vec<Block>, CidrError> {
    let family = Family::of(&start);
    let max = family.max_length();
    let range = format!("{start}+{count}");
    if count == 0 {
        return Err(CidrError::invalid_prefix(&range, "empty address range"));
    }

    let mut next = addr_bits(&start);
    let last = next
        .checked_add(count - 1)
        .filter(|last| *last <= family.all_bits())
        .ok_or_else(|| CidrError::invalid_prefix(&range, "range runs past the address space"))?;

    let mut blocks = Vec::new();
    let mut remaining = count;
    while remaining > 0 {
        // Biggest block allowed by alignment, then shrink until it fits.
        let align_bits = max - lo_mask(family, next);
        let fit_bits = (u128::BITS - 1 - remaining.leading_zeros()) as u8;
        let host_bits = align_bits.min(fit_bits);
        blocks.push(Block::from_bits(family, next, max - host_bits));

        let size = 1u128 << host_bits;
        remaining -= size;
        if remaining > 0 {
            next += size;
        }
    }
    debug_assert_eq!(blocks.last().map(|b| b.hi_bits()), Some(last));
    Ok(blocks)
}

impl FromStr for Block {
    type Err = CidrError;

    /// Parse `addr/len`; a bare address is a host prefix.
    fn from_str(s: &str) -> Result<Block, CidrError> {
        let s = s.trim();
        let (addr, len) = match s.split_once('/') {
            Some((addr, len)) => (addr, Some(len)),
            None => (s, None),
        };
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| CidrError::invalid_prefix(s, format!("invalid address {addr}")))?;
        let len = match len {
            Some(len) => len
                .parse::<u8>()
                .map_err(|_| CidrError::invalid_prefix(s, format!("invalid prefix length {len}")))?,
            None => Family::of(&addr).max_length(),
        };
        if len > Family::of(&addr).max_length() {
            return Err(CidrError::invalid_prefix(s, "prefix length too long"));
        }
        Block::new(addr, len).map_err(|e| match e {
            CidrError::InvalidPrefix { reason, .. } => CidrError::invalid_prefix(s, reason),
            other => other,
        })
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}

/// Family first, then network address, then prefix length (broader first).
impl Ord for Block {
    fn cmp(&self, other: &Block) -> Ordering {
        self.family
            .cmp(&other.family)
            .then(self.bits.cmp(&other.bits))
            .then(self.len.cmp(&other.len))
    }
}

impl PartialOrd for Block {
    fn partial_cmp(&self, other: &Block) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Block, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Block::from_str(&s).map_err(de::Error::custom)
    }
}
