use std::fmt;

use npcpath_core::{Direction, Point, Point3};

use crate::config::{ConfigError, SearchConfig};
use crate::pool::NodePool;
use crate::successors::Successors;
use crate::traits::{Agent, MoveOracle, PathAlgorithm};
use crate::window::Window;

/// Why a search produced no path.
///
/// None of these are faults: an agent that gets one should idle, pick a new
/// goal, or retry on a later tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoPath {
    /// Start and goal do not fit in one search window. No work was done.
    OutOfRange,
    /// Every reachable cell in the window was explored without meeting the goal.
    Exhausted,
    /// The node taken for expansion had no legal step in any direction.
    NoSuccessors,
    /// The expansion budget ran out before the goal was reached.
    DepthExceeded,
}

impl fmt::Display for NoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "start and goal are too far apart"),
            Self::Exhausted => write!(f, "open list exhausted"),
            Self::NoSuccessors => write!(f, "dead end: no legal step"),
            Self::DepthExceeded => write!(f, "expansion budget exceeded"),
        }
    }
}

/// Work done by the most recent search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the open list and expanded.
    pub expanded: u32,
    /// Calls made to the movement oracle.
    pub oracle_calls: u32,
    /// Steps in the returned path (0 on failure).
    pub steps: usize,
}

// ---------------------------------------------------------------------------
// FastAstar
// ---------------------------------------------------------------------------

/// Bounded-window A* search driver.
///
/// `FastAstar` owns the node pool, the successor buffer and the path buffer,
/// all sized once from its [`SearchConfig`]. Every search resets and reuses
/// them, so steady-state searches do not allocate.
///
/// One instance serves one search at a time; the `&mut self` receiver on
/// [`search`](Self::search) is what keeps two searches from sharing a pool.
/// Hold one instance per simulation thread.
pub struct FastAstar {
    pub(crate) cfg: SearchConfig,
    pub(crate) window: Window,
    pub(crate) pool: NodePool,
    pub(crate) succ: Successors,
    pub(crate) steps: Vec<Direction>,
    pub(crate) goal: Point3,
    pub(crate) goal_cell: Point,
    pub(crate) stats: SearchStats,
}

impl FastAstar {
    /// Create a driver with the default window and budget.
    pub fn new() -> Self {
        Self::build(SearchConfig::default())
    }

    /// Create a driver from a custom configuration.
    pub fn with_config(cfg: SearchConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self::build(cfg))
    }

    fn build(cfg: SearchConfig) -> Self {
        let window = Window::new(&cfg);
        let area = cfg.area_size as usize;
        Self {
            pool: NodePool::new(window.len()),
            window,
            succ: Successors::default(),
            steps: Vec::with_capacity(area * area),
            goal: Point3::ZERO,
            goal_cell: Point::ZERO,
            stats: SearchStats::default(),
            cfg,
        }
    }

    /// The configuration this driver was built with.
    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    /// Work done by the most recent search.
    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Whether a search from `start` to `goal` would be attempted.
    ///
    /// Pure: it neither touches the pool nor consults the oracle.
    pub fn can_search(&self, start: Point3, goal: Point3) -> bool {
        self.window.fits(start, goal)
    }

    /// Compass steps from `start` to `goal`, or `None` if no path was found.
    ///
    /// Shorthand for [`search`](Self::search) that drops the failure reason.
    pub fn find<A, M>(
        &mut self,
        agent: &A,
        map: &M,
        start: Point3,
        goal: Point3,
    ) -> Option<&[Direction]>
    where
        A: Agent + ?Sized,
        M: MoveOracle<A> + ?Sized,
    {
        self.search(agent, map, start, goal).ok()
    }
}

impl Default for FastAstar {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, M> PathAlgorithm<A, M> for FastAstar
where
    A: Agent + ?Sized,
    M: MoveOracle<A> + ?Sized,
{
    fn check_condition(&self, _agent: &A, _map: &M, start: Point3, goal: Point3) -> bool {
        self.can_search(start, goal)
    }

    fn find(&mut self, agent: &A, map: &M, start: Point3, goal: Point3) -> Option<&[Direction]> {
        FastAstar::find(self, agent, map, start, goal)
    }
}
