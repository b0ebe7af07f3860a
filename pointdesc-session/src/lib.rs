//! Descriptor comparison session
//!
//! The state behind an interactive comparison view: the loaded cloud, the array
//! being compared, the selected reference point and its marker, and the difference
//! overlay handed to whatever renders it. Nothing here depends on a windowing or
//! rendering toolkit; a presentation layer drives the session through
//! [`PointSelection`](pointdesc_core::PointSelection) and receives results through
//! [`ScalarOverlay`](pointdesc_core::ScalarOverlay).

pub mod config;
pub mod selection;
pub mod session;

pub use config::*;
pub use selection::*;
pub use session::*;
