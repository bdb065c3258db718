//! Netlink attribute encoding for route encapsulation.
//!
//! This module builds and decodes the attribute streams carried by
//! rtnetlink route and nexthop messages, with a focus on lightweight
//! tunnel encapsulation (`encap mpls ...`).
//!
//! # Quick Start
//!
//! ```ignore
//! use lwtunnel::netlink::{MessageBuilder, NlMsgType};
//! use lwtunnel::netlink::lwtunnel::parse_encap;
//! use lwtunnel::util::{StdAddrCodec, TokenCursor};
//!
//! let mut builder = MessageBuilder::new(NlMsgType::RTM_NEWROUTE, NLM_F_REQUEST);
//! parse_encap(&mut builder, &mut TokenCursor::new(&["mpls", "100"]), &StdAddrCodec)?;
//! let msg = builder.finish()?;
//! ```
//!
//! # Multipath
//!
//! Encapsulations can also be attached to a single nexthop of a
//! multipath route:
//!
//! ```ignore
//! use lwtunnel::netlink::multipath::{MultipathBuilder, NexthopIter};
//!
//! let mut mp = MultipathBuilder::new();
//! let nh = mp.nexthop_start(2, 0, 1)?;
//! mp.encap(&mut TokenCursor::new(&["mpls", "100/200"]), &StdAddrCodec)?;
//! mp.nexthop_end(nh)?;
//! mp.into_attr(&mut builder)?;
//!
//! for (nh, attrs) in NexthopIter::new(multipath_payload) {
//!     let info = EncapInfo::from_table(&attrs, EncapAttrIds::ROUTE);
//! }
//! ```

pub mod attr;
pub mod builder;
mod error;
pub mod lwtunnel;
pub mod message;
pub mod multipath;
pub mod parse;
pub mod types;

pub use attr::NlAttr;
pub use builder::{AttrSink, MessageBuilder, NestToken, RtAttrBuilder};
pub use error::{Error, Result};
pub use lwtunnel::{EncapAttrIds, EncapInfo, EncapSink, EncapType, ParseError};
pub use message::{NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
pub use parse::AttrTable;
