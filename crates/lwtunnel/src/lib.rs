//! Lightweight tunnel encapsulation attributes for Linux routes.
//!
//! This crate encodes the `encap <type> <args...>` part of a route or
//! nexthop command into rtnetlink attributes, and decodes those
//! attributes back into the text `ip route` prints. It does no socket
//! I/O: messages are built into byte buffers and handed to the caller.
//!
//! # Features
//!
//! - `output` - JSON/text output formatting
//! - `full` - All features enabled
//!
//! # Example
//!
//! ```ignore
//! use lwtunnel::netlink::lwtunnel::{parse_encap, print_encap};
//! use lwtunnel::netlink::{AttrTable, MessageBuilder, NlMsgType, NLMSG_HDRLEN};
//! use lwtunnel::util::{StdAddrCodec, TokenCursor};
//!
//! let args = ["mpls", "100/200"];
//! let mut builder = MessageBuilder::new(NlMsgType::RTM_NEWROUTE, 0);
//! parse_encap(&mut builder, &mut TokenCursor::new(&args), &StdAddrCodec)?;
//! let msg = builder.finish()?;
//!
//! let attrs = AttrTable::parse(&msg[NLMSG_HDRLEN..]);
//! let text = print_encap(attrs.get(21), attrs.get(22), &StdAddrCodec);
//! assert_eq!(text, " encap mpls 100/200 ");
//! ```

// Core modules (always available)
pub mod netlink;
pub mod util;

// Feature-gated modules
#[cfg(feature = "output")]
pub mod output;

// Re-export common types at crate root for convenience
pub use netlink::lwtunnel::{parse_encap, print_encap};
pub use netlink::{Error, ParseError, Result};
