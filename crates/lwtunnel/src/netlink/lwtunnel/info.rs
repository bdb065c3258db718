//! Decoding and printing encapsulation attributes.

use std::fmt;

use super::{EncapAttrIds, EncapType};
use crate::netlink::attr::get;
use crate::netlink::parse::AttrTable;
use crate::netlink::types::mpls::mpls_tunnel;
use crate::util::addr::{AddrCodec, AddrFamily};

/// Type-specific part of a decoded encapsulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncapPayload {
    /// MPLS label push.
    Mpls {
        /// Encoded label stack (MPLS_IPTUNNEL_DST), if present.
        dst: Option<Vec<u8>>,
    },
    /// A type this crate cannot look into.
    Opaque,
}

/// A decoded encapsulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncapInfo {
    pub encap_type: EncapType,
    pub payload: EncapPayload,
}

impl EncapInfo {
    /// Decode from the type tag attribute and the nested payload attribute.
    ///
    /// Returns `None` if the type tag is missing or too short. A missing
    /// or malformed payload decodes as an empty one.
    pub fn decode(type_attr: Option<&[u8]>, payload_attr: Option<&[u8]>) -> Option<Self> {
        let tag = get::u16_ne(type_attr?).ok()?;
        let encap_type = EncapType::from(tag);

        let payload = match encap_type {
            EncapType::Mpls => {
                let dst = payload_attr
                    .map(AttrTable::parse)
                    .and_then(|t| t.get(mpls_tunnel::DST))
                    .map(<[u8]>::to_vec);
                EncapPayload::Mpls { dst }
            }
            _ => EncapPayload::Opaque,
        };

        Some(Self {
            encap_type,
            payload,
        })
    }

    /// Decode from a table of route or nexthop attributes.
    pub fn from_table(table: &AttrTable<'_>, ids: EncapAttrIds) -> Option<Self> {
        Self::decode(table.get(ids.encap_type), table.get(ids.encap))
    }

    /// Encoded MPLS destination, if this is an MPLS encapsulation that
    /// carries one.
    pub fn mpls_dst(&self) -> Option<&[u8]> {
        match &self.payload {
            EncapPayload::Mpls { dst } => dst.as_deref(),
            EncapPayload::Opaque => None,
        }
    }

    /// Render with `codec` formatting any addresses.
    pub fn display<'a, C: AddrCodec + ?Sized>(&'a self, codec: &'a C) -> EncapDisplay<'a, C> {
        EncapDisplay { info: self, codec }
    }
}

/// Text rendering of an [`EncapInfo`], as in `ip route` output.
pub struct EncapDisplay<'a, C: ?Sized> {
    info: &'a EncapInfo,
    codec: &'a C,
}

impl<C: AddrCodec + ?Sized> EncapDisplay<'_, C> {
    /// The decoded encapsulation.
    pub fn info(&self) -> &EncapInfo {
        self.info
    }

    /// Destination formatted with the codec, if any.
    pub fn dst(&self) -> Option<String> {
        self.info
            .mpls_dst()
            .map(|dst| self.codec.format(AddrFamily::Mpls, dst))
    }
}

impl<C: AddrCodec + ?Sized> fmt::Display for EncapDisplay<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " encap {}", self.info.encap_type)?;
        if let Some(dst) = self.dst() {
            write!(f, " {} ", dst)?;
        }
        Ok(())
    }
}

/// Print an encapsulation as ` encap <type> [<args> ]`.
///
/// Returns an empty string when there is no type tag. Never fails.
pub fn print_encap<C: AddrCodec + ?Sized>(
    type_attr: Option<&[u8]>,
    payload_attr: Option<&[u8]>,
    codec: &C,
) -> String {
    EncapInfo::decode(type_attr, payload_attr)
        .map(|info| info.display(codec).to_string())
        .unwrap_or_default()
}
