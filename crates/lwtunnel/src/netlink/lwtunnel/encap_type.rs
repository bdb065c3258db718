//! Registry of lightweight tunnel encapsulation types.

use std::fmt;

use crate::netlink::types::mpls::lwtunnel_encap;

/// A lightweight tunnel encapsulation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncapType {
    /// No (or unrecognised) encapsulation.
    #[default]
    None,
    /// MPLS label push.
    Mpls,
    /// A numeric tag this crate has no entry for.
    Unknown(u16),
}

/// One registered encapsulation type.
struct RegistryEntry {
    name: &'static str,
    kind: EncapType,
    /// Tokens the type consumes after its name.
    payload_args: usize,
}

/// Every encapsulation type that can be parsed and printed.
///
/// Adding a type means one row here plus its arms in the parser and the
/// printer.
const REGISTRY: &[RegistryEntry] = &[RegistryEntry {
    name: "mpls",
    kind: EncapType::Mpls,
    payload_args: 1,
}];

impl EncapType {
    /// Look up a type by its command-line name.
    ///
    /// Matching is exact and case-sensitive. Unknown names give
    /// [`EncapType::None`].
    pub fn resolve(name: &str) -> Self {
        REGISTRY
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.kind)
            .unwrap_or(Self::None)
    }

    fn entry(self) -> Option<&'static RegistryEntry> {
        REGISTRY.iter().find(|e| e.kind == self)
    }

    /// Registered name, if this type has one.
    pub fn name(self) -> Option<&'static str> {
        self.entry().map(|e| e.name)
    }

    /// Display name; `"unknown"` for anything without a registry entry.
    pub fn format(self) -> &'static str {
        self.name().unwrap_or("unknown")
    }

    /// Numeric tag (LWTUNNEL_ENCAP_*).
    pub fn tag(self) -> u16 {
        match self {
            Self::None => lwtunnel_encap::NONE,
            Self::Mpls => lwtunnel_encap::MPLS,
            Self::Unknown(tag) => tag,
        }
    }

    /// Check if this type has a registry entry.
    pub fn is_known(self) -> bool {
        self.entry().is_some()
    }

    /// Number of tokens following the type name on the command line.
    pub fn payload_args(self) -> usize {
        self.entry().map_or(0, |e| e.payload_args)
    }
}

impl From<u16> for EncapType {
    fn from(tag: u16) -> Self {
        match tag {
            lwtunnel_encap::NONE => Self::None,
            lwtunnel_encap::MPLS => Self::Mpls,
            other => Self::Unknown(other),
        }
    }
}

impl From<EncapType> for u16 {
    fn from(kind: EncapType) -> Self {
        kind.tag()
    }
}

impl fmt::Display for EncapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format())
    }
}
