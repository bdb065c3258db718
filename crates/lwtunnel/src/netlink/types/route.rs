//! Route message types.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::error::{Error, Result};

/// Route message (struct rtmsg).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RtMsg {
    /// Address family.
    pub rtm_family: u8,
    /// Destination prefix length.
    pub rtm_dst_len: u8,
    /// Source prefix length.
    pub rtm_src_len: u8,
    /// TOS filter.
    pub rtm_tos: u8,
    /// Routing table ID.
    pub rtm_table: u8,
    /// Routing protocol (RTPROT_*).
    pub rtm_protocol: u8,
    /// Route scope (RT_SCOPE_*).
    pub rtm_scope: u8,
    /// Route type (RTN_*).
    pub rtm_type: u8,
    /// Route flags.
    pub rtm_flags: u32,
}

impl RtMsg {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new route message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.rtm_family = family;
        self
    }

    /// Set the destination prefix length.
    pub fn with_dst_len(mut self, len: u8) -> Self {
        self.rtm_dst_len = len;
        self
    }

    /// Parse from bytes (copied out, no alignment requirement).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: Self::SIZE,
                actual: data.len(),
            })
    }
}

/// Route attributes (RTA_*) that route encapsulation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum RtaAttr {
    Unspec = 0,
    Dst = 1,
    Oif = 4,
    Gateway = 5,
    Multipath = 9,
    Table = 15,
    EncapType = 21,
    Encap = 22,
}

impl From<u16> for RtaAttr {
    fn from(val: u16) -> Self {
        match val {
            1 => Self::Dst,
            4 => Self::Oif,
            5 => Self::Gateway,
            9 => Self::Multipath,
            15 => Self::Table,
            21 => Self::EncapType,
            22 => Self::Encap,
            _ => Self::Unspec,
        }
    }
}

/// Multipath nexthop entry header (struct rtnexthop).
///
/// Inside `RTA_MULTIPATH` each entry is this header followed by the
/// attributes of that nexthop; `rtnh_len` covers both.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RtNexthop {
    /// Length of the entry including attributes.
    pub rtnh_len: u16,
    /// Nexthop flags (RTNH_F_*).
    pub rtnh_flags: u8,
    /// Weight minus one.
    pub rtnh_hops: u8,
    /// Output interface index.
    pub rtnh_ifindex: i32,
}

impl RtNexthop {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create an entry header with a placeholder length.
    pub fn new(ifindex: u32, flags: u8, weight: u8) -> Self {
        Self {
            rtnh_len: Self::SIZE as u16,
            rtnh_flags: flags,
            rtnh_hops: weight.saturating_sub(1),
            rtnh_ifindex: ifindex as i32,
        }
    }

    /// Get the weight (hops + 1).
    pub fn weight(&self) -> u16 {
        self.rtnh_hops as u16 + 1
    }

    /// Parse from bytes (copied out, no alignment requirement).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: Self::SIZE,
                actual: data.len(),
            })
    }
}

/// Nexthop flags (RTNH_F_*).
pub mod rtnh_flags {
    pub const ONLINK: u8 = 4;
}
