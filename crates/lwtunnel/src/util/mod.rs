//! Shared utilities for lwtunnel.

pub mod addr;
pub mod args;

pub use addr::{AddrCodec, AddrError, AddrFamily, EncodedAddr, StdAddrCodec};
pub use args::TokenCursor;
