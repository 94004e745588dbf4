use npcpath_core::{Direction, Point3};

/// Traversal capabilities of one agent, fixed for the duration of a search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capabilities {
    /// The agent may pass through closed doors.
    pub open_doors: bool,
    /// The agent may step over movable obstacles.
    pub cross_obstacles: bool,
}

impl Capabilities {
    /// No special traversal abilities.
    pub const NONE: Self = Self {
        open_doors: false,
        cross_obstacles: false,
    };

    /// Every traversal ability.
    pub const ALL: Self = Self {
        open_doors: true,
        cross_obstacles: true,
    };
}

/// An entity that can be moved by a search.
pub trait Agent {
    /// Capabilities consulted by the movement oracle. Read once per search.
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }
}

/// A bare capability set is the simplest agent there is.
impl Agent for Capabilities {
    fn capabilities(&self) -> Capabilities {
        *self
    }
}

/// One step proposed to a [`MoveOracle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepQuery {
    /// World position the step starts from.
    pub from: Point3,
    /// Direction of the step.
    pub dir: Direction,
    /// Capabilities of the moving agent.
    pub caps: Capabilities,
    /// Where the search is heading. Oracles may relax rules for the goal cell.
    pub goal: Point3,
}

/// Authority on whether a single step is legal.
///
/// Typically implemented by the map or collision layer. The oracle is called
/// up to eight times per expanded node and must not block. The cell a query
/// steps onto always has coordinates representable as `i32`.
pub trait MoveOracle<A: ?Sized> {
    /// Rule on `query` for `agent`. Returns the elevation the agent ends up
    /// at if the step is allowed, `None` otherwise.
    fn check_step(&self, agent: &A, query: &StepQuery) -> Option<i32>;
}

/// A step-path search over a map `M` for agents of type `A`.
pub trait PathAlgorithm<A: ?Sized, M: ?Sized> {
    /// Cheap applicability check: would [`find`](Self::find) attempt this
    /// search at all? Never mutates state.
    fn check_condition(&self, agent: &A, map: &M, start: Point3, goal: Point3) -> bool;

    /// Compass steps leading from `start` to `goal`, or `None` if no path was
    /// found. An empty slice means the agent is already there.
    fn find(&mut self, agent: &A, map: &M, start: Point3, goal: Point3) -> Option<&[Direction]>;
}
