//! Address parsing and formatting utilities.
//!
//! The encapsulation code never looks inside an address: it hands text to
//! an [`AddrCodec`] and gets opaque bytes back, and the reverse when
//! printing. [`StdAddrCodec`] covers IPv4, IPv6 and MPLS label stacks.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::netlink::types::mpls::{MplsLabelEntry, mpls_label};

/// Maximum number of labels in one MPLS label stack.
pub const MPLS_MAX_LABELS: usize = 8;

/// Error type for address parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddrError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid MPLS label: {0}")]
    InvalidLabel(String),

    #[error("too many MPLS labels: {0} (max {max})", max = MPLS_MAX_LABELS)]
    TooManyLabels(usize),
}

pub type Result<T> = std::result::Result<T, AddrError>;

/// Address family of an encoded address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrFamily {
    Inet,
    Inet6,
    Mpls,
}

impl AddrFamily {
    /// The AF_* value of this family.
    pub fn as_raw(self) -> u8 {
        match self {
            Self::Inet => libc::AF_INET as u8,
            Self::Inet6 => libc::AF_INET6 as u8,
            Self::Mpls => libc::AF_MPLS as u8,
        }
    }

    /// Look up a family by its AF_* value.
    pub fn from_raw(family: u8) -> Option<Self> {
        match family as i32 {
            libc::AF_INET => Some(Self::Inet),
            libc::AF_INET6 => Some(Self::Inet6),
            libc::AF_MPLS => Some(Self::Mpls),
            _ => None,
        }
    }
}

impl fmt::Display for AddrFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inet => "inet",
            Self::Inet6 => "inet6",
            Self::Mpls => "mpls",
        })
    }
}

/// An address in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAddr {
    pub family: AddrFamily,
    pub bytes: Vec<u8>,
}

impl EncodedAddr {
    pub fn new(family: AddrFamily, bytes: Vec<u8>) -> Self {
        Self { family, bytes }
    }

    /// Wire bytes of the address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the wire form.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Converts addresses between text and wire form.
pub trait AddrCodec {
    /// Parse `text` as an address of `family`.
    fn parse(&self, text: &str, family: AddrFamily) -> Result<EncodedAddr>;

    /// Format wire bytes of `family` as text.
    ///
    /// Never fails; malformed input yields a best-effort rendering.
    fn format(&self, family: AddrFamily, bytes: &[u8]) -> String;
}

/// Codec backed by `std::net` and the MPLS label-stack text form
/// (`100/200/300`).
#[derive(Debug, Clone, Copy, Default)]
pub struct StdAddrCodec;

impl AddrCodec for StdAddrCodec {
    fn parse(&self, text: &str, family: AddrFamily) -> Result<EncodedAddr> {
        let bytes = match family {
            AddrFamily::Inet => text
                .parse::<Ipv4Addr>()
                .map(|a| a.octets().to_vec())
                .map_err(|_| AddrError::InvalidAddress(text.to_string()))?,
            AddrFamily::Inet6 => text
                .parse::<Ipv6Addr>()
                .map(|a| a.octets().to_vec())
                .map_err(|_| AddrError::InvalidAddress(text.to_string()))?,
            AddrFamily::Mpls => parse_mpls_labels(text)?,
        };
        Ok(EncodedAddr::new(family, bytes))
    }

    fn format(&self, family: AddrFamily, bytes: &[u8]) -> String {
        let formatted = match family {
            AddrFamily::Inet => format_ipv4(bytes),
            AddrFamily::Inet6 => format_ipv6(bytes),
            AddrFamily::Mpls => return format_mpls_labels(bytes),
        };
        formatted.unwrap_or_else(|| "???".to_string())
    }
}

/// Parse an MPLS label stack like `100/200`.
///
/// Each label may be decimal, `0x` hex or leading-zero octal. The last
/// entry carries the bottom-of-stack bit.
pub fn parse_mpls_labels(s: &str) -> Result<Vec<u8>> {
    let labels = s
        .split('/')
        .map(parse_label)
        .collect::<Result<Vec<u32>>>()?;

    if labels.len() > MPLS_MAX_LABELS {
        return Err(AddrError::TooManyLabels(labels.len()));
    }

    let last = labels.len() - 1;
    let mut out = Vec::with_capacity(labels.len() * MplsLabelEntry::SIZE);
    for (i, &label) in labels.iter().enumerate() {
        let entry = if i == last {
            MplsLabelEntry::bottom(label)
        } else {
            MplsLabelEntry::new(label)
        };
        out.extend_from_slice(entry.as_bytes());
    }
    Ok(out)
}

fn parse_label(s: &str) -> Result<u32> {
    let invalid = || AddrError::InvalidLabel(s.to_string());

    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        u32::from_str_radix(&s[1..], 8)
    } else {
        s.parse()
    };
    let value = parsed.map_err(|_| invalid())?;

    if value > mpls_label::MAX {
        return Err(invalid());
    }
    Ok(value)
}

/// Format an MPLS label stack as `100/200`.
///
/// Stops after the bottom-of-stack entry; a trailing partial entry is
/// ignored.
pub fn format_mpls_labels(bytes: &[u8]) -> String {
    let mut labels = Vec::new();
    for chunk in bytes.chunks_exact(MplsLabelEntry::SIZE) {
        let Some(entry) = MplsLabelEntry::from_bytes(chunk) else {
            break;
        };
        labels.push(entry.label().to_string());
        if entry.is_bos() {
            break;
        }
    }
    labels.join("/")
}

/// Format an IPv4 address from bytes.
pub fn format_ipv4(bytes: &[u8]) -> Option<String> {
    let octets: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    Some(Ipv4Addr::from(octets).to_string())
}

/// Format an IPv6 address from bytes.
pub fn format_ipv6(bytes: &[u8]) -> Option<String> {
    let octets: [u8; 16] = bytes.get(..16)?.try_into().ok()?;
    Some(Ipv6Addr::from(octets).to_string())
}
