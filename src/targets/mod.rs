//! Target parsing, expansion and classification.
//!
//! Key functions:
//! - `expand_targets()` - Turns IPs and CIDR ranges into individual addresses
//! - `expand_targets_detailed()` - Same, plus the list of dropped entries
//! - `prepare_targets()` - Newline-separated input to a validated expansion
//! - `*_with_limit()` variants - Same, with a custom per-network host limit
//! - `is_private_ip()` - Private/reserved address check

mod classify;
mod expand;

pub use classify::{is_private_addr, is_private_ip, is_valid_ip};
pub use expand::{
    expand_targets, expand_targets_detailed, expand_targets_with_limit, prepare_targets,
    prepare_targets_with_limit, Expansion, RejectReason, Rejected,
};
