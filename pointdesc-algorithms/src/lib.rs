//! # pointdesc Algorithms
//!
//! Numeric routines behind descriptor comparison.
//!
//! This crate provides the descriptor distance (L1 norm of the difference of two
//! descriptor vectors), batch comparison of one reference descriptor against every
//! point, nearest neighbor search, and the average nearest neighbor spacing estimate.

pub mod descriptors;
pub mod nearest_neighbor;
pub mod spacing;

// Re-export commonly used items
pub use descriptors::*;
pub use nearest_neighbor::*;
pub use spacing::*;
