//! Parsers for Cisco IOS command output.
//!
//! Nothing here does I/O. Lines that do not look like what a parser expects
//! are skipped rather than reported; device output has no grammar to be
//! strict about.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;

/// Address column value of an interface without an IPv4 address.
pub const UNASSIGNED: &str = "unassigned";

/// Fewest whitespace-separated fields a `show ip interface brief` row has.
const MIN_BRIEF_FIELDS: usize = 6;

static IP_ADDRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ip address\s+(\d+\.\d+\.\d+\.\d+)\s+(\d+\.\d+\.\d+\.\d+)")
        .expect("ip address pattern")
});

/// One row of `show ip interface brief`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceRecord<'a> {
    /// Interface name, e.g. `FastEthernet0/0`.
    pub name: &'a str,

    /// Address as printed, or `unassigned`.
    pub address: &'a str,

    /// Administrative status (`up`, `administratively down`, ...).
    pub status: &'a str,

    /// Line protocol status.
    pub protocol: &'a str,
}

impl InterfaceRecord<'_> {
    /// Whether the interface has no address.
    pub fn is_unassigned(&self) -> bool {
        self.address.eq_ignore_ascii_case(UNASSIGNED)
    }
}

/// Address and mask from an interface's `ip address` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressMaskPair<'a> {
    pub address: &'a str,
    pub mask: &'a str,
}

/// Parse `show ip interface brief` output.
///
/// The iterator is lazy and `Clone`; cloning it gives an independent pass
/// over the same text. Header lines (starting with `interface`, any case)
/// and rows with fewer than six fields are skipped.
///
/// ```
/// let text = "Interface  IP-Address  OK? Method Status Protocol\n\
///             FastEthernet0/0  148.204.58.1  YES  manual  up  up\n";
/// let rows: Vec<_> = hopchain::parse::parse_interface_brief(text).collect();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].address, "148.204.58.1");
/// ```
pub fn parse_interface_brief(
    text: &str,
) -> impl Iterator<Item = InterfaceRecord<'_>> + Clone + '_ {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !starts_with_keyword(line, "interface"))
        .filter_map(parse_brief_row)
}

fn parse_brief_row(line: &str) -> Option<InterfaceRecord<'_>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_BRIEF_FIELDS {
        return None;
    }
    Some(InterfaceRecord {
        name: fields[0],
        address: fields[1],
        status: fields[fields.len() - 2],
        protocol: fields[fields.len() - 1],
    })
}

fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    line.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
}

/// Find the `ip address A B` line inside `interface <name>`'s block of a
/// running configuration.
///
/// The block runs from the line `interface <name>` to the next line that
/// starts with `interface ` or the end of the text. Only the first block
/// for the name is considered and nothing outside it is searched.
pub fn resolve_mask_for_interface<'a>(
    config: &'a str,
    interface: &str,
) -> Option<AddressMaskPair<'a>> {
    let mut lines = config.lines();
    lines.find(|line| is_interface_header(line, interface))?;

    lines
        .take_while(|line| !opens_interface_block(line))
        .find_map(|line| {
            let caps = IP_ADDRESS_LINE.captures(line)?;
            Some(AddressMaskPair {
                address: caps.get(1)?.as_str(),
                mask: caps.get(2)?.as_str(),
            })
        })
}

/// `interface <name>` with nothing else on the line. The name is case-sensitive.
fn is_interface_header(line: &str, interface: &str) -> bool {
    line.trim_end()
        .strip_prefix("interface")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .is_some_and(|rest| rest.trim_start() == interface)
}

fn opens_interface_block(line: &str) -> bool {
    line.strip_prefix("interface")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace) && !rest.trim().is_empty())
}

/// The other usable host of a /30 link.
///
/// Returns `None` when the mask is not exactly /30 or either value does not
/// parse as a dotted-quad address or contiguous netmask.
pub fn peer_address_on_point_to_point(address: &str, mask: &str) -> Option<Ipv4Addr> {
    let address: Ipv4Addr = address.trim().parse().ok()?;
    let mask = u32::from(mask.trim().parse::<Ipv4Addr>().ok()?);

    if prefix_len(mask)? != 30 {
        return None;
    }

    let network = u32::from(address) & mask;
    let first = Ipv4Addr::from(network + 1);
    let second = Ipv4Addr::from(network + 2);

    Some(if address == first { second } else { first })
}

/// Prefix length of a contiguous netmask.
fn prefix_len(mask: u32) -> Option<u32> {
    let host_bits = !mask;
    if host_bits & host_bits.wrapping_add(1) != 0 {
        return None;
    }
    Some(mask.count_ones())
}

/// The neighbor address across the first /30 link found on a device.
///
/// Interfaces are tried in `show ip interface brief` order; unassigned ones
/// are skipped, as are ones whose mask cannot be resolved from `config` or
/// whose subnet is not a /30.
pub fn discover_next_hop(interface_brief: &str, running_config: &str) -> Option<Ipv4Addr> {
    parse_interface_brief(interface_brief)
        .filter(|record| !record.is_unassigned())
        .find_map(|record| {
            let pair = resolve_mask_for_interface(running_config, record.name)?;
            peer_address_on_point_to_point(pair.address, pair.mask)
        })
}
