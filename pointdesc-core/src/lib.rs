//! Core data structures and traits for pointdesc
//! 
//! This crate provides the fundamental types for comparing per-point feature
//! descriptors: points, point clouds, named descriptor arrays and the
//! capability traits the numeric core reports through.

pub mod point;
pub mod point_cloud;
pub mod descriptor;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use descriptor::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

// Type aliases for easier imports
pub type Point = Point3f;
