//! Tile terrain for driving `npcpath` searches.
//!
//! [`TerrainMap`] is a rectangular world of [`Tile`]s, each with a floor
//! elevation. It implements [`MoveOracle`](npcpath_paths::MoveOracle), ruling
//! on steps with walls, doors, movable obstacles, climb limits and corner
//! cutting taken into account.
//!
//! Maps are usually written as ASCII art (see [`Layout`]) and can be salted
//! with random obstacles via [`scatter`].

mod layout;
mod map;
mod scatter;

pub use layout::{Layout, TerrainError};
pub use map::{DEFAULT_MAX_CLIMB, TerrainMap, Tile};
pub use scatter::scatter;
