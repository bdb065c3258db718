//! Parser combinators for decoding attribute streams.
//!
//! Decoding is the inverse of [`builder`](super::builder): a flat run of
//! attributes becomes an [`AttrTable`] keyed by attribute type. Any member
//! can be opened as a further table, so nesting depth is unbounded.
//!
//! # Example
//!
//! ```ignore
//! use lwtunnel::netlink::parse::AttrTable;
//!
//! let table = AttrTable::parse(route_attrs);
//! if let Some(encap) = table.nested(22) {
//!     let dst = encap.get(1);
//! }
//! ```

use std::collections::BTreeMap;

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;

use super::attr::{NLA_HDRLEN, NLA_TYPE_MASK, nla_align};

/// Result type for winnow parsers.
pub type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

/// Parse a u16 in native endian.
pub fn parse_u16_ne(input: &mut &[u8]) -> PResult<u16> {
    let bytes: &[u8] = take(2usize).parse_next(input)?;
    Ok(u16::from_ne_bytes([bytes[0], bytes[1]]))
}

/// Parse one attribute and return (type without flags, payload).
///
/// Trailing alignment padding is consumed when present.
pub fn parse_attr<'a>(input: &mut &'a [u8]) -> PResult<(u16, &'a [u8])> {
    let len = parse_u16_ne(input)? as usize;
    let attr_type = parse_u16_ne(input)?;

    if len < NLA_HDRLEN {
        return Err(ErrMode::Cut(ContextError::new()));
    }

    let payload: &[u8] = take(len - NLA_HDRLEN).parse_next(input)?;

    // Align to 4 bytes; the last attribute may omit its padding
    let padding = (nla_align(len) - len).min(input.len());
    let _: &[u8] = take(padding).parse_next(input)?;

    Ok((attr_type & NLA_TYPE_MASK, payload))
}

/// Parse all attributes from remaining input.
///
/// Stops at the first record that is truncated or malformed; everything
/// before it is returned.
pub fn parse_attrs<'a>(input: &mut &'a [u8]) -> PResult<Vec<(u16, &'a [u8])>> {
    let mut attrs = Vec::new();
    while input.len() >= NLA_HDRLEN {
        match parse_attr(input) {
            Ok(attr) => attrs.push(attr),
            Err(_) => {
                tracing::trace!(remaining = input.len(), "stopping at malformed attribute");
                break;
            }
        }
    }
    Ok(attrs)
}

/// One level of decoded attributes, keyed by attribute type.
///
/// A type that appears more than once maps to its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrTable<'a> {
    attrs: BTreeMap<u16, &'a [u8]>,
}

impl<'a> AttrTable<'a> {
    /// Decode a run of attributes.
    pub fn parse(data: &'a [u8]) -> Self {
        let mut input = data;
        let attrs = parse_attrs(&mut input)
            .unwrap_or_default()
            .into_iter()
            .collect();
        Self { attrs }
    }

    /// Get the payload of an attribute.
    pub fn get(&self, attr_type: u16) -> Option<&'a [u8]> {
        self.attrs.get(&attr_type).copied()
    }

    /// Check if an attribute is present.
    pub fn contains(&self, attr_type: u16) -> bool {
        self.attrs.contains_key(&attr_type)
    }

    /// Decode the payload of an attribute as a further table.
    pub fn nested(&self, attr_type: u16) -> Option<AttrTable<'a>> {
        self.get(attr_type).map(AttrTable::parse)
    }

    /// Number of distinct attribute types.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Check if no attribute was decoded.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterate over (type, payload) in ascending type order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &'a [u8])> + '_ {
        self.attrs.iter().map(|(&k, &v)| (k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::NLA_F_NESTED;
    use crate::netlink::builder::{AttrSink, RtAttrBuilder};

    fn attr(attr_type: u16, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&((NLA_HDRLEN + payload.len()) as u16).to_ne_bytes());
        out.extend_from_slice(&attr_type.to_ne_bytes());
        out.extend_from_slice(payload);
        out.resize(nla_align(out.len()), 0);
        out
    }

    #[test]
    fn test_parse_attr_strips_flags_and_padding() {
        let data = attr(22 | NLA_F_NESTED, &[1, 2, 3]);
        let mut input = data.as_slice();
        let (kind, payload) = parse_attr(&mut input).unwrap();
        assert_eq!(kind, 22);
        assert_eq!(payload, &[1, 2, 3]);
        assert!(input.is_empty());
    }

    #[test]
    fn test_parse_attr_rejects_short_length() {
        let data = [2u8, 0, 1, 0];
        let mut input = &data[..];
        assert!(parse_attr(&mut input).is_err());
    }

    #[test]
    fn test_table_lookup() {
        let mut data = attr(1, &[10, 0, 0, 1]);
        data.extend(attr(2, &[64]));
        let table = AttrTable::parse(&data);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some(&[10, 0, 0, 1][..]));
        assert_eq!(table.get(2), Some(&[64][..]));
        assert!(!table.contains(3));
    }

    #[test]
    fn test_table_last_duplicate_wins() {
        let mut data = attr(1, &[1, 0, 0, 0]);
        data.extend(attr(1, &[2, 0, 0, 0]));
        let table = AttrTable::parse(&data);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1), Some(&[2, 0, 0, 0][..]));
    }

    #[test]
    fn test_table_truncated_tail() {
        let mut data = attr(1, &[1, 0, 0, 0]);
        // Claims 16 bytes, only 6 present.
        data.extend_from_slice(&[16, 0, 2, 0, 9, 9]);
        let table = AttrTable::parse(&data);
        assert_eq!(table.len(), 1);
        assert!(table.contains(1));
        assert!(!table.contains(2));
    }

    #[test]
    fn test_table_garbage_is_empty() {
        assert!(AttrTable::parse(&[]).is_empty());
        assert!(AttrTable::parse(&[0xff, 0xff]).is_empty());
        assert!(AttrTable::parse(&[0, 0, 0, 0, 0, 0]).is_empty());
    }

    #[test]
    fn test_nested_tables_any_depth() {
        let mut builder = RtAttrBuilder::new(9);
        let l1 = builder.nest_start(1).unwrap();
        let l2 = builder.nest_start(2).unwrap();
        let l3 = builder.nest_start(3).unwrap();
        builder.append_attr_u32(4, 0xdead).unwrap();
        builder.nest_end(l3).unwrap();
        builder.nest_end(l2).unwrap();
        builder.nest_end(l1).unwrap();

        let root = AttrTable::parse(builder.payload());
        let leaf = root
            .nested(1)
            .and_then(|t| t.nested(2))
            .and_then(|t| t.nested(3))
            .unwrap();
        assert_eq!(leaf.get(4), Some(&0xdeadu32.to_ne_bytes()[..]));
        assert!(root.nested(7).is_none());
    }

    #[test]
    fn test_iter_in_type_order() {
        let mut data = attr(5, &[]);
        data.extend(attr(2, &[]));
        let kinds: Vec<u16> = AttrTable::parse(&data).iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![2, 5]);
    }
}
