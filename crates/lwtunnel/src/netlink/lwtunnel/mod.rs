//! Lightweight tunnel encapsulation (`encap ...`) attributes.
//!
//! A route or nexthop carries its encapsulation as two attributes: a u16
//! holding the type tag, and a nested attribute holding the per-type
//! payload. This module turns command arguments into those attributes
//! and decodes them back into text.
//!
//! Encoding works against any [`EncapSink`]: a whole message built with
//! [`MessageBuilder`], or the attributes of one multipath nexthop built
//! with [`RtAttrBuilder`]. The sink decides which attribute ids are used.
//!
//! # Example
//!
//! ```ignore
//! use lwtunnel::netlink::builder::MessageBuilder;
//! use lwtunnel::netlink::lwtunnel::{parse_encap, print_encap, EncapInfo};
//! use lwtunnel::netlink::message::{NlMsgType, NLM_F_REQUEST};
//! use lwtunnel::util::{StdAddrCodec, TokenCursor};
//!
//! let args = ["mpls", "100/200"];
//! let mut cursor = TokenCursor::new(&args);
//! let mut builder = MessageBuilder::new(NlMsgType::RTM_NEWROUTE, NLM_F_REQUEST);
//! parse_encap(&mut builder, &mut cursor, &StdAddrCodec)?;
//!
//! // Later, from a decoded route:
//! let text = print_encap(table.get(21), table.get(22), &StdAddrCodec);
//! assert_eq!(text, " encap mpls 100/200 ");
//! ```

mod encap_type;
mod error;
mod info;
mod parse;

pub use encap_type::EncapType;
pub use error::ParseError;
pub use info::{EncapDisplay, EncapInfo, EncapPayload, print_encap};
pub use parse::parse_encap;

use super::builder::{AttrSink, MessageBuilder, RtAttrBuilder};
use super::message::NlMsgType;
use super::types::nexthop::nha;
use super::types::route::RtaAttr;

/// Attribute ids that carry an encapsulation in one message family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncapAttrIds {
    /// Id of the u16 type tag attribute.
    pub encap_type: u16,
    /// Id of the nested payload attribute.
    pub encap: u16,
}

impl EncapAttrIds {
    /// Route messages and multipath nexthops (RTA_ENCAP_TYPE, RTA_ENCAP).
    pub const ROUTE: Self = Self {
        encap_type: RtaAttr::EncapType as u16,
        encap: RtaAttr::Encap as u16,
    };

    /// Nexthop object messages (NHA_ENCAP_TYPE, NHA_ENCAP).
    pub const NEXTHOP: Self = Self {
        encap_type: nha::ENCAP_TYPE,
        encap: nha::ENCAP,
    };

    /// Ids used by messages of the given type.
    pub fn for_msg_type(msg_type: u16) -> Self {
        if NlMsgType::is_nexthop(msg_type) {
            Self::NEXTHOP
        } else {
            Self::ROUTE
        }
    }
}

/// An attribute sink that knows which ids carry an encapsulation.
pub trait EncapSink: AttrSink {
    /// Ids of the type and payload attributes in this context.
    fn encap_ids(&self) -> EncapAttrIds;
}

impl EncapSink for MessageBuilder {
    fn encap_ids(&self) -> EncapAttrIds {
        EncapAttrIds::for_msg_type(self.msg_type())
    }
}

impl EncapSink for RtAttrBuilder {
    fn encap_ids(&self) -> EncapAttrIds {
        EncapAttrIds::ROUTE
    }
}
