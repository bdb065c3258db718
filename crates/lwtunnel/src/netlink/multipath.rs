//! Multipath nexthops (`RTA_MULTIPATH`).
//!
//! The payload of `RTA_MULTIPATH` is a run of `struct rtnexthop` records,
//! each followed by the attributes of that nexthop (gateway, encap, ...).
//! Record lengths are patched the same way as nested attributes.
//!
//! # Example
//!
//! ```ignore
//! use lwtunnel::netlink::multipath::MultipathBuilder;
//! use lwtunnel::util::{StdAddrCodec, TokenCursor};
//!
//! let mut mp = MultipathBuilder::new();
//! let nh = mp.nexthop_start(2, 0, 1)?;
//! mp.gateway(&StdAddrCodec.parse("10.0.0.1", AddrFamily::Inet)?)?;
//! mp.encap(&mut TokenCursor::new(&["mpls", "100"]), &StdAddrCodec)?;
//! mp.nexthop_end(nh)?;
//! mp.into_attr(&mut builder)?;
//! ```

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;
use zerocopy::IntoBytes;

use super::attr::{NLA_HDRLEN, nla_align};
use super::builder::{AttrSink, NestToken, RtAttrBuilder};
use super::error::Result;
use super::lwtunnel::{ParseError, parse_encap};
use super::parse::{AttrTable, PResult};
use super::types::route::{RtNexthop, RtaAttr};
use crate::util::addr::{AddrCodec, EncodedAddr};
use crate::util::args::TokenCursor;

/// Token returned when starting a nexthop record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NexthopToken(NestToken);

/// Builder for the payload of `RTA_MULTIPATH`.
#[derive(Debug, Clone)]
pub struct MultipathBuilder {
    inner: RtAttrBuilder,
}

impl Default for MultipathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipathBuilder {
    /// Create an empty multipath attribute.
    pub fn new() -> Self {
        Self {
            inner: RtAttrBuilder::new(RtaAttr::Multipath as u16),
        }
    }

    /// Set the bound on the whole multipath attribute.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.inner = self.inner.with_max_len(max_len);
        self
    }

    /// Start a nexthop record. Attributes appended until
    /// [`nexthop_end`](Self::nexthop_end) belong to this nexthop.
    pub fn nexthop_start(&mut self, ifindex: u32, flags: u8, weight: u8) -> Result<NexthopToken> {
        let header = RtNexthop::new(ifindex, flags, weight);
        self.inner.record_start(header.as_bytes()).map(NexthopToken)
    }

    /// Close a nexthop record and patch its length.
    pub fn nexthop_end(&mut self, token: NexthopToken) -> Result<()> {
        self.inner.record_end(token.0)
    }

    /// Append the gateway of the current nexthop.
    pub fn gateway(&mut self, addr: &EncodedAddr) -> Result<()> {
        self.inner.append_attr(RtaAttr::Gateway as u16, addr.as_bytes())
    }

    /// Parse `encap` arguments into the current nexthop.
    pub fn encap<T, C>(
        &mut self,
        cursor: &mut TokenCursor<'_, T>,
        codec: &C,
    ) -> std::result::Result<(), ParseError>
    where
        T: AsRef<str>,
        C: AddrCodec + ?Sized,
    {
        parse_encap(&mut self.inner, cursor, codec)
    }

    /// Direct access to the underlying attribute sink.
    pub fn sink(&mut self) -> &mut RtAttrBuilder {
        &mut self.inner
    }

    /// Length of the multipath attribute, header included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if no nexthop has been written.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Bytes under the multipath header.
    pub fn payload(&self) -> &[u8] {
        self.inner.payload()
    }

    /// Finalize and return the multipath attribute bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        self.inner.finish()
    }

    /// Finalize and append the multipath attribute to `sink`.
    pub fn into_attr<S: AttrSink + ?Sized>(self, sink: &mut S) -> Result<()> {
        let attr_type = self.inner.attr_type();
        let buf = self.inner.finish()?;
        sink.append_attr(attr_type, &buf[NLA_HDRLEN..])
    }
}

/// Parse one `rtnexthop` record and its attributes.
fn parse_nexthop<'a>(input: &mut &'a [u8]) -> PResult<(RtNexthop, AttrTable<'a>)> {
    let header: &[u8] = take(RtNexthop::SIZE).parse_next(input)?;
    let nh = RtNexthop::from_bytes(header).map_err(|_| ErrMode::Cut(ContextError::new()))?;

    let len = nh.rtnh_len as usize;
    if len < RtNexthop::SIZE {
        return Err(ErrMode::Cut(ContextError::new()));
    }

    let attrs: &[u8] = take(len - RtNexthop::SIZE).parse_next(input)?;
    let padding = (nla_align(len) - len).min(input.len());
    let _: &[u8] = take(padding).parse_next(input)?;

    Ok((nh, AttrTable::parse(attrs)))
}

/// Iterator over the nexthops of an `RTA_MULTIPATH` payload.
///
/// Stops at the first truncated or malformed record.
#[derive(Debug, Clone)]
pub struct NexthopIter<'a> {
    input: &'a [u8],
}

impl<'a> NexthopIter<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { input: payload }
    }
}

impl<'a> Iterator for NexthopIter<'a> {
    type Item = (RtNexthop, AttrTable<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.input.len() < RtNexthop::SIZE {
            return None;
        }
        match parse_nexthop(&mut self.input) {
            Ok(item) => Some(item),
            Err(_) => {
                tracing::trace!(remaining = self.input.len(), "stopping at malformed nexthop");
                self.input = &[];
                None
            }
        }
    }
}
