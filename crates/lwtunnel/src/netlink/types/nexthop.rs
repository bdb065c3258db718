//! Nexthop object message types (Linux 5.3+).
//!
//! `RTM_NEWNEXTHOP` carries its encapsulation under `NHA_ENCAP_TYPE` /
//! `NHA_ENCAP` instead of the route-level `RTA_ENCAP_TYPE` / `RTA_ENCAP`.

use crate::netlink::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Nexthop message header (struct nhmsg).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NhMsg {
    pub nh_family: u8,
    pub nh_scope: u8,
    pub nh_protocol: u8,
    /// Reserved, must be zero.
    pub resvd: u8,
    pub nh_flags: u32,
}

impl NhMsg {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Header for a nexthop of `family`.
    pub fn new(family: u8) -> Self {
        Self {
            nh_family: family,
            ..Default::default()
        }
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

/// Nexthop attributes (NHA_*) that carry an encapsulation.
pub mod nha {
    /// Encapsulation type (u16).
    pub const ENCAP_TYPE: u16 = 7;
    /// Encapsulation data (nested).
    pub const ENCAP: u16 = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nhmsg_header() {
        assert_eq!(NhMsg::SIZE, 8);

        let msg = NhMsg::new(libc::AF_MPLS as u8);
        let parsed = NhMsg::from_bytes(msg.as_bytes()).unwrap();
        assert_eq!(parsed.nh_family, libc::AF_MPLS as u8);
        assert_eq!(parsed.nh_flags, 0);
        assert!(matches!(
            NhMsg::from_bytes(&[0u8; 4]),
            Err(Error::Truncated { expected: 8, actual: 4 })
        ));
    }
}
