//! Attribute builders for constructing netlink messages.
//!
//! Two kinds of flat buffer receive attributes:
//!
//! - [`MessageBuilder`] writes a whole netlink message: `nlmsghdr`, an
//!   optional fixed family header, then attributes.
//! - [`RtAttrBuilder`] writes inside a single root attribute (for example
//!   the payload of `RTA_MULTIPATH`), keeping the root length current after
//!   every write.
//!
//! Both implement [`AttrSink`], so encoders written against the trait work
//! in either context. Both share one buffer core: capacity checks, the
//! open-nest stack and the length back-patch are implemented once.
//!
//! # Example
//!
//! ```ignore
//! use lwtunnel::netlink::builder::{AttrSink, MessageBuilder};
//! use lwtunnel::netlink::message::{NlMsgType, NLM_F_REQUEST};
//!
//! let mut builder = MessageBuilder::new(NlMsgType::RTM_NEWROUTE, NLM_F_REQUEST);
//! let nest = builder.nest_start(22)?;
//! builder.append_attr(1, &[0x00, 0x06, 0x41, 0x00])?;
//! builder.nest_end(nest)?;
//! let msg = builder.finish()?;
//! ```

use zerocopy::{Immutable, IntoBytes};

use super::attr::{NLA_F_NESTED, NLA_HDRLEN, NlAttr, nla_align, patch_len};
use super::error::{Error, Result};
use super::message::{NLMSG_HDRLEN, NlMsgHdr, nlmsg_align};

/// Default bound on the size of a built buffer, in bytes.
pub const DEFAULT_MAX_LEN: usize = 1024;

/// Token returned when starting a nested attribute.
/// Used to finalize the nested attribute length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestToken {
    /// Offset of the nested attribute header in the buffer.
    offset: usize,
}

impl NestToken {
    /// Offset of the header this token will patch.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Destination for netlink attributes.
///
/// Every write is bounded by the sink's capacity. Once a write fails with
/// [`Error::CapacityExceeded`] the sink is poisoned: all later writes fail
/// with the same error and the buffer must be thrown away.
pub trait AttrSink {
    /// Append an attribute with the given type and data.
    fn append_attr(&mut self, attr_type: u16, data: &[u8]) -> Result<()>;

    /// Start a nested attribute. Returns a token to finalize it.
    fn nest_start(&mut self, attr_type: u16) -> Result<NestToken>;

    /// End a nested attribute started with `nest_start`.
    ///
    /// Nests must be closed innermost first.
    fn nest_end(&mut self, token: NestToken) -> Result<()>;

    /// Append a u8 attribute.
    fn append_attr_u8(&mut self, attr_type: u16, value: u8) -> Result<()> {
        self.append_attr(attr_type, &[value])
    }

    /// Append a u16 attribute (native endian).
    fn append_attr_u16(&mut self, attr_type: u16, value: u16) -> Result<()> {
        self.append_attr(attr_type, &value.to_ne_bytes())
    }

    /// Append a u32 attribute (native endian).
    fn append_attr_u32(&mut self, attr_type: u16, value: u32) -> Result<()> {
        self.append_attr(attr_type, &value.to_ne_bytes())
    }
}

/// Buffer core shared by the concrete sinks.
#[derive(Debug, Clone)]
struct AttrBuf {
    buf: Vec<u8>,
    max_len: usize,
    /// Header offsets of the nests (and records) still open, innermost last.
    open: Vec<usize>,
    /// First capacity failure; replayed on every later write.
    overflow: Option<Error>,
}

impl AttrBuf {
    fn new(header: &[u8], max_len: usize) -> Self {
        let mut buf = vec![0u8; nlmsg_align(header.len())];
        buf[..header.len()].copy_from_slice(header);
        Self {
            buf,
            max_len,
            open: Vec::new(),
            overflow: None,
        }
    }

    fn check(&self) -> Result<()> {
        match self.overflow {
            Some(ref err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Make sure `len` more bytes (before padding) fit under the bound.
    fn reserve(&mut self, len: usize) -> Result<()> {
        self.check()?;
        let needed = nla_align(self.buf.len()) + nla_align(len);
        if needed > self.max_len {
            let err = Error::CapacityExceeded {
                needed,
                max: self.max_len,
            };
            self.overflow = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }

    fn pad(&mut self) {
        let aligned = nla_align(self.buf.len());
        self.buf.resize(aligned, 0);
    }

    fn append_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.reserve(data.len())?;
        self.buf.extend_from_slice(data);
        self.pad();
        Ok(())
    }

    fn append_attr(&mut self, attr_type: u16, data: &[u8]) -> Result<()> {
        let len = NLA_HDRLEN + data.len();
        if len > u16::MAX as usize {
            return Err(Error::AttributeTooLarge { len });
        }
        self.reserve(len)?;
        let attr = NlAttr::new(attr_type, data.len());
        self.buf.extend_from_slice(attr.as_bytes());
        self.buf.extend_from_slice(data);
        self.pad();
        Ok(())
    }

    /// Open a length-prefixed record whose header is `header`.
    fn record_start(&mut self, header: &[u8]) -> Result<NestToken> {
        self.reserve(header.len())?;
        let offset = self.buf.len();
        self.buf.extend_from_slice(header);
        self.pad();
        self.open.push(offset);
        Ok(NestToken { offset })
    }

    fn record_end(&mut self, token: NestToken) -> Result<()> {
        self.check()?;
        if self.open.last() != Some(&token.offset) {
            return Err(Error::NestMismatch {
                offset: token.offset,
            });
        }
        patch_len(&mut self.buf, token.offset)?;
        self.open.pop();
        self.pad();
        Ok(())
    }

    fn nest_start(&mut self, attr_type: u16) -> Result<NestToken> {
        // Write placeholder header with nested flag
        let attr = NlAttr::new(attr_type | NLA_F_NESTED, 0);
        self.record_start(attr.as_bytes())
    }

    /// Fail if the buffer is poisoned or still has open nests.
    fn ensure_complete(&self) -> Result<()> {
        self.check()?;
        match self.open.last() {
            Some(&offset) => Err(Error::UnterminatedNest { offset }),
            None => Ok(()),
        }
    }
}

/// Builder for constructing netlink messages.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    inner: AttrBuf,
}

impl MessageBuilder {
    /// Create a new message builder with the given type and flags.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self::with_header(NlMsgHdr::new(msg_type, flags))
    }

    /// Create a builder from an existing header.
    pub fn with_header(header: NlMsgHdr) -> Self {
        Self {
            inner: AttrBuf::new(header.as_bytes(), DEFAULT_MAX_LEN),
        }
    }

    /// Set the bound on the total message length.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.inner.max_len = max_len;
        self
    }

    /// Get the bound on the total message length.
    pub fn max_len(&self) -> usize {
        self.inner.max_len
    }

    /// Get the message type from the header.
    pub fn msg_type(&self) -> u16 {
        u16::from_ne_bytes([self.inner.buf[4], self.inner.buf[5]])
    }

    /// Get the current message length.
    pub fn len(&self) -> usize {
        self.inner.buf.len()
    }

    /// Check if the message is empty (header only).
    pub fn is_empty(&self) -> bool {
        self.inner.buf.len() == NLMSG_HDRLEN
    }

    /// Number of nests that are open.
    pub fn open_nests(&self) -> usize {
        self.inner.open.len()
    }

    /// Append a fixed-size header struct (rtmsg, nhmsg, ...) to the message.
    pub fn append_struct<T: IntoBytes + Immutable>(&mut self, data: &T) -> Result<()> {
        self.inner.append_bytes(data.as_bytes())
    }

    /// Finalize and return the message bytes.
    ///
    /// Fails if a write overflowed the bound or a nest is still open.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.inner.ensure_complete()?;
        // Update message length in header
        let len = self.inner.buf.len() as u32;
        self.inner.buf[0..4].copy_from_slice(&len.to_ne_bytes());
        Ok(self.inner.buf)
    }

    /// Get the current buffer for inspection.
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner.buf
    }
}

impl AttrSink for MessageBuilder {
    fn append_attr(&mut self, attr_type: u16, data: &[u8]) -> Result<()> {
        self.inner.append_attr(attr_type, data)
    }

    fn nest_start(&mut self, attr_type: u16) -> Result<NestToken> {
        self.inner.nest_start(attr_type)
    }

    fn nest_end(&mut self, token: NestToken) -> Result<()> {
        self.inner.record_end(token)
    }
}

/// Builder for attributes nested under a single root attribute.
///
/// The root header sits at offset 0 and its length always equals the
/// number of bytes written so far, mirroring `rta_addattr_l()`.
#[derive(Debug, Clone)]
pub struct RtAttrBuilder {
    inner: AttrBuf,
}

impl RtAttrBuilder {
    /// Create a builder rooted at an attribute of the given type.
    pub fn new(attr_type: u16) -> Self {
        let root = NlAttr::new(attr_type, 0);
        Self {
            inner: AttrBuf::new(root.as_bytes(), DEFAULT_MAX_LEN),
        }
    }

    /// Set the bound on the root attribute length.
    ///
    /// Clamped to what the 16-bit length field can describe.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.inner.max_len = max_len.min(u16::MAX as usize);
        self
    }

    /// Get the bound on the root attribute length.
    pub fn max_len(&self) -> usize {
        self.inner.max_len
    }

    /// Get the root attribute type.
    pub fn attr_type(&self) -> u16 {
        u16::from_ne_bytes([self.inner.buf[2], self.inner.buf[3]])
    }

    /// Get the root attribute length, header included.
    pub fn len(&self) -> usize {
        self.inner.buf.len()
    }

    /// Check if nothing has been written under the root.
    pub fn is_empty(&self) -> bool {
        self.inner.buf.len() == NLA_HDRLEN
    }

    /// Number of nests (and records) that are open.
    pub fn open_nests(&self) -> usize {
        self.inner.open.len()
    }

    /// Bytes under the root header.
    pub fn payload(&self) -> &[u8] {
        &self.inner.buf[NLA_HDRLEN..]
    }

    /// Get the current buffer (root header included) for inspection.
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner.buf
    }

    /// Open a length-prefixed record that is not an attribute, such as a
    /// `struct rtnexthop`. Its first two bytes are patched on close.
    pub(crate) fn record_start(&mut self, header: &[u8]) -> Result<NestToken> {
        let token = self.inner.record_start(header)?;
        self.sync_root()?;
        Ok(token)
    }

    /// Close a record opened with `record_start`.
    pub(crate) fn record_end(&mut self, token: NestToken) -> Result<()> {
        self.inner.record_end(token)?;
        self.sync_root()
    }

    /// Finalize and return the root attribute bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        self.inner.ensure_complete()?;
        Ok(self.inner.buf)
    }

    fn sync_root(&mut self) -> Result<()> {
        patch_len(&mut self.inner.buf, 0).map(|_| ())
    }
}

impl AttrSink for RtAttrBuilder {
    fn append_attr(&mut self, attr_type: u16, data: &[u8]) -> Result<()> {
        self.inner.append_attr(attr_type, data)?;
        self.sync_root()
    }

    fn nest_start(&mut self, attr_type: u16) -> Result<NestToken> {
        let token = self.inner.nest_start(attr_type)?;
        self.sync_root()?;
        Ok(token)
    }

    fn nest_end(&mut self, token: NestToken) -> Result<()> {
        self.record_end(token)
    }
}
