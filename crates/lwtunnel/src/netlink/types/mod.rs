//! Kernel structures and attribute ids.

pub mod mpls;
pub mod nexthop;
pub mod route;
