//! **npcpath-core**: geometry shared by the *npcpath* crates.
//!
//! This crate provides the world-space primitives the search engine and the
//! terrain maps agree on: horizontal points and rectangles, 3D world
//! positions, and the eight compass step directions.

pub mod direction;
pub mod geom;

pub use direction::Direction;
pub use geom::{Point, Point3, Range};
