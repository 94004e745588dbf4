//! Bounded-window A* search for moving NPCs one tick at a time.
//!
//! The engine answers a single question: which compass steps take an agent
//! from `start` to `goal`, given a movement oracle that rules on each
//! individual step? Searches run inside a small 3D window anchored on the
//! start/goal pair and stop after a fixed number of expansions, so the cost of
//! a call is bounded no matter how the world looks.
//!
//! All state lives in [`FastAstar`], which allocates its node pool once and
//! reuses it for every search.
//!
//! # Trait seams
//!
//! | Trait | Implemented by | Role |
//! |---|---|---|
//! | [`Agent`] | the moving entity | reports traversal [`Capabilities`] |
//! | [`MoveOracle`] | the map / collision system | rules on single steps |
//! | [`PathAlgorithm`] | [`FastAstar`] | the search entry point |

mod astar;
mod config;
mod distance;
mod driver;
mod pool;
mod successors;
mod traits;
mod window;

pub use config::{ConfigError, SearchConfig};
pub use distance::{chebyshev, in_range};
pub use driver::{FastAstar, NoPath, SearchStats};
pub use traits::{Agent, Capabilities, MoveOracle, PathAlgorithm, StepQuery};

pub use npcpath_core::{Direction, Point, Point3};
