//! MPLS structures for netlink.
//!
//! Kernel-level layout of MPLS label stack entries and the attribute ids
//! used inside an MPLS lightweight tunnel.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// MPLS label entry (struct mpls_label).
///
/// The entry is a big-endian 32-bit value with:
/// - Bits 31-12: Label (20 bits)
/// - Bits 11-9: Traffic Class (3 bits)
/// - Bit 8: Bottom-of-Stack (S bit)
/// - Bits 7-0: TTL (8 bits)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct MplsLabelEntry {
    /// Big-endian encoded label entry.
    pub entry: u32,
}

impl MplsLabelEntry {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new label entry (not bottom of stack).
    ///
    /// Creates an entry with TC=0, S=0, TTL=0.
    pub fn new(label: u32) -> Self {
        Self {
            entry: ((label & mpls_label::MAX) << 12).to_be(),
        }
    }

    /// Create a bottom-of-stack entry (TC=0, S=1, TTL=0).
    pub fn bottom(label: u32) -> Self {
        let entry = ((label & mpls_label::MAX) << 12) | (1 << 8);
        Self {
            entry: entry.to_be(),
        }
    }

    /// Get the label value (20 bits).
    pub fn label(&self) -> u32 {
        (u32::from_be(self.entry) >> 12) & mpls_label::MAX
    }

    /// Check if this is the bottom of stack.
    pub fn is_bos(&self) -> bool {
        (u32::from_be(self.entry) & 0x100) != 0
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Read an entry from the front of `data`.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        Self::read_from_prefix(data).map(|(r, _)| r).ok()
    }
}

/// MPLS tunnel attributes (MPLS_IPTUNNEL_*), nested under the encap
/// attribute of an MPLS lightweight tunnel.
pub mod mpls_tunnel {
    /// Unspecified.
    pub const UNSPEC: u16 = 0;
    /// Destination label stack.
    pub const DST: u16 = 1;
}

/// Lightweight tunnel encapsulation types (LWTUNNEL_ENCAP_*).
pub mod lwtunnel_encap {
    /// No encapsulation.
    pub const NONE: u16 = 0;
    /// MPLS encapsulation.
    pub const MPLS: u16 = 1;
}

/// MPLS label limits.
pub mod mpls_label {
    /// Maximum valid label value.
    pub const MAX: u32 = 0xFFFFF; // 2^20 - 1 = 1048575
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mpls_label_entry_size() {
        assert_eq!(MplsLabelEntry::SIZE, 4);
    }

    #[test]
    fn test_mpls_label_entry_new() {
        let entry = MplsLabelEntry::new(100);
        assert_eq!(entry.label(), 100);
        assert!(!entry.is_bos());
    }

    #[test]
    fn test_mpls_label_entry_bottom() {
        let entry = MplsLabelEntry::bottom(200);
        assert_eq!(entry.label(), 200);
        assert!(entry.is_bos());
    }

    #[test]
    fn test_wire_order_is_big_endian() {
        // label 100 << 12 | S = 0x00064100
        assert_eq!(MplsLabelEntry::bottom(100).as_bytes(), &[0x00, 0x06, 0x41, 0x00]);
        let parsed = MplsLabelEntry::from_bytes(&[0x00, 0x06, 0x41, 0x00, 0xff]).unwrap();
        assert_eq!(parsed.label(), 100);
        assert!(parsed.is_bos());
        assert!(MplsLabelEntry::from_bytes(&[0x00, 0x06]).is_none());
    }

    #[test]
    fn test_mpls_label_entry_max_label() {
        let entry = MplsLabelEntry::new(mpls_label::MAX);
        assert_eq!(entry.label(), mpls_label::MAX);
    }
}
