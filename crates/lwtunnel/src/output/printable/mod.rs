//! Printable implementations.

mod encap;
