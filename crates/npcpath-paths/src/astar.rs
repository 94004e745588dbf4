use log::{debug, trace};
use npcpath_core::{Direction, Point, Point3};

use crate::FastAstar;
use crate::driver::{NoPath, SearchStats};
use crate::pool::NIL;
use crate::traits::{Agent, MoveOracle};

impl FastAstar {
    /// Search for compass steps leading `agent` from `start` to `goal`.
    ///
    /// The search is confined to one window around the pair and stops after
    /// `max_depth` expansions, whether or not open nodes remain. The goal is
    /// accepted the moment it is first reached, which favours a quick answer
    /// over the shortest one.
    ///
    /// On success the returned slice borrows the driver's path buffer; it is
    /// empty when `start` and `goal` share a cell.
    pub fn search<A, M>(
        &mut self,
        agent: &A,
        map: &M,
        start: Point3,
        goal: Point3,
    ) -> Result<&[Direction], NoPath>
    where
        A: Agent + ?Sized,
        M: MoveOracle<A> + ?Sized,
    {
        self.stats = SearchStats::default();
        self.steps.clear();

        if !self.window.fits(start, goal) {
            trace!("search {start} -> {goal}: out of range");
            return Err(NoPath::OutOfRange);
        }

        self.pool.reset();
        self.window.anchor(start, goal);
        self.goal = goal;

        let (Some(from), Some(dest)) = (self.window.index(start), self.window.index(goal)) else {
            return Err(NoPath::OutOfRange);
        };
        if from == dest {
            debug!("search {start} -> {goal}: already there");
            return Ok(&self.steps);
        }
        self.goal_cell = self.window.cell(dest);

        let h = self.heuristic(self.window.cell(from), start.z);
        self.pool.seed(from, h, start.z);

        let caps = agent.capabilities();
        let max_depth = self.cfg.max_depth;
        let mut depth = 0u32;

        let outcome = 'search: loop {
            let Some(best) = self.pool.extract_best() else {
                break 'search Err(NoPath::Exhausted);
            };

            depth += 1;
            if depth > max_depth {
                break 'search Err(NoPath::DepthExceeded);
            }
            self.stats.expanded = depth;

            if self.expand(agent, map, best, caps) == 0 {
                break 'search Err(NoPath::NoSuccessors);
            }

            let cost = self.pool.node(best).cost + 1;
            let succ = self.succ;
            for &next in succ.as_slice() {
                if self.pool.is_touched(next) {
                    continue;
                }
                let total = cost.saturating_add(self.heuristic(self.window.cell(next), self.pool.node(next).z));
                if !self.pool.relax(next, cost, total, best) {
                    continue;
                }
                if self.pool.is_open(next) {
                    continue;
                }
                self.pool.insert(next);

                if next == dest {
                    self.reconstruct(from, dest);
                    break 'search Ok(());
                }
            }
        };

        match outcome {
            Ok(()) => {
                self.stats.steps = self.steps.len();
                debug!(
                    "search {start} -> {goal}: {} steps, {} expansions",
                    self.stats.steps, self.stats.expanded
                );
                Ok(&self.steps)
            }
            Err(reason) => {
                debug!(
                    "search {start} -> {goal}: {reason} after {} expansions (open list {})",
                    self.stats.expanded,
                    if self.pool.open_is_empty() { "empty" } else { "not empty" }
                );
                Err(reason)
            }
        }
    }

    /// Weighted squared distance from a window cell at elevation `z` to the goal.
    ///
    /// Horizontal offsets are scaled before squaring, so the estimate strongly
    /// prefers cells that head straight for the goal. It overestimates.
    pub(crate) fn heuristic(&self, cell: Point, z: i32) -> i32 {
        let goal = self.goal_cell;
        let w = self.cfg.heuristic_weight;
        let dx = (cell.x - goal.x).saturating_mul(w);
        let dy = (cell.y - goal.y).saturating_mul(w);
        let dz = z.saturating_sub(self.goal.z);
        dx.saturating_mul(dx)
            .saturating_add(dy.saturating_mul(dy))
            .saturating_add(dz.saturating_mul(dz))
    }

    /// Rebuild the step list by following parent links from `dest` to `from`.
    fn reconstruct(&mut self, from: usize, dest: usize) {
        self.steps.clear();

        let mut node = dest;
        let mut parent = self.pool.get(dest).map_or(NIL, |n| n.parent);
        while parent != NIL {
            if let Some(dir) = Direction::toward(self.window.cell(parent), self.window.cell(node)) {
                self.steps.push(dir);
            }
            node = parent;
            if node == from {
                break;
            }
            parent = self.pool.get(node).map_or(NIL, |n| n.parent);
        }

        self.steps.reverse();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use log::{LevelFilter, Log, Metadata, Record};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::config::SearchConfig;
    use crate::traits::{Capabilities, StepQuery};

    /// Flat world where the listed cells are impassable.
    #[derive(Default)]
    struct Walls {
        blocked: HashSet<Point>,
    }

    impl Walls {
        fn new(cells: impl IntoIterator<Item = (i32, i32)>) -> Self {
            Self {
                blocked: cells.into_iter().map(|(x, y)| Point::new(x, y)).collect(),
            }
        }
    }

    impl<A: ?Sized> MoveOracle<A> for Walls {
        fn check_step(&self, _agent: &A, query: &StepQuery) -> Option<i32> {
            let to = query.from.xy().step(query.dir);
            (!self.blocked.contains(&to)).then_some(query.from.z)
        }
    }

    /// Floor rises 10 units per cell eastward.
    struct Ramp;

    impl<A: ?Sized> MoveOracle<A> for Ramp {
        fn check_step(&self, _agent: &A, query: &StepQuery) -> Option<i32> {
            Some(query.from.xy().step(query.dir).x * 10)
        }
    }

    const NPC: Capabilities = Capabilities::NONE;

    /// Keeps every formatted log message for inspection.
    struct Capture;

    static LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static CAPTURE: Capture = Capture;

    impl Log for Capture {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            if let Ok(mut lines) = LINES.lock() {
                lines.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(LevelFilter::Trace);
    }

    fn walk(start: Point3, steps: &[Direction]) -> Point {
        steps.iter().fold(start.xy(), |p, &d| p.step(d))
    }

    #[test]
    fn open_field_diagonal() {
        let mut fa = FastAstar::new();
        let goal = Point3::new(5, 5, 0);
        let steps = fa.search(&NPC, &Walls::default(), Point3::ZERO, goal).unwrap().to_vec();
        assert_eq!(steps, vec![Direction::SouthEast; 5]);
        assert_eq!(walk(Point3::ZERO, &steps), goal.xy());
        // The goal is accepted when relaxed from (4, 4), never expanded itself.
        assert_eq!(fa.stats().expanded, 5);
        assert_eq!(fa.stats().steps, 5);
    }

    #[test]
    fn start_equals_goal_is_an_empty_success() {
        let mut fa = FastAstar::new();
        let p = Point3::new(12, -4, 30);
        let steps = fa.search(&NPC, &Walls::default(), p, p).unwrap();
        assert!(steps.is_empty());
        assert_eq!(fa.stats().expanded, 0);
        assert_eq!(fa.stats().oracle_calls, 0);
    }

    #[test]
    fn start_equals_goal_is_logged() {
        capture_logs();
        let mut fa = FastAstar::new();
        let p = Point3::new(-7, 13, 21);
        assert_eq!(fa.search(&NPC, &Walls::default(), p, p), Ok(&[][..]));
        let lines = LINES.lock().unwrap();
        assert!(
            lines.iter().any(|l| l.contains("(-7, 13, 21) -> (-7, 13, 21): already there")),
            "{lines:?}"
        );
    }

    #[test]
    fn out_of_range_does_no_work() {
        let mut fa = FastAstar::new();
        let far = Point3::new(39, 0, 0);
        assert_eq!(
            fa.search(&NPC, &Walls::default(), Point3::ZERO, far),
            Err(NoPath::OutOfRange)
        );
        assert_eq!(fa.stats(), SearchStats::default());
        assert_eq!(fa.find(&NPC, &Walls::default(), Point3::ZERO, far), None);

        let too_high = Point3::new(1, 0, 200);
        assert_eq!(
            fa.search(&NPC, &Walls::default(), Point3::ZERO, too_high),
            Err(NoPath::OutOfRange)
        );
    }

    #[test]
    fn extreme_coordinates_are_out_of_range() {
        let mut fa = FastAstar::new();
        let sky = Point3::new(0, 0, i32::MAX);
        assert_eq!(
            fa.search(&NPC, &Walls::default(), Point3::ZERO, sky),
            Err(NoPath::OutOfRange)
        );
        assert_eq!(fa.stats(), SearchStats::default());
        assert!(!fa.can_search(Point3::new(i32::MIN, 0, 0), Point3::new(1, 0, 0)));
        assert!(!fa.can_search(Point3::new(0, i32::MIN, 0), Point3::new(0, i32::MAX, 0)));
    }

    #[test]
    fn searches_run_at_the_ends_of_the_axis() {
        let mut fa = FastAstar::new();
        let open = Walls::default();

        let east = (Point3::new(i32::MAX - 3, 0, 0), Point3::new(i32::MAX - 1, 0, 0));
        let steps = fa.search(&NPC, &open, east.0, east.1).unwrap();
        assert_eq!(steps, [Direction::East; 2]);

        let west = (Point3::new(i32::MAX, 0, 0), Point3::new(i32::MAX - 2, 0, 0));
        let steps = fa.search(&NPC, &open, west.0, west.1).unwrap();
        assert_eq!(steps, [Direction::West; 2]);

        let low = (Point3::new(i32::MIN, 5, 0), Point3::new(i32::MIN + 3, 5, 0));
        let steps = fa.search(&NPC, &open, low.0, low.1).unwrap();
        assert_eq!(steps, [Direction::East; 3]);

        let corner = Point3::new(i32::MIN, i32::MIN, 0);
        let steps = fa.search(&NPC, &open, corner, Point3::new(i32::MIN + 4, i32::MIN + 4, 0));
        assert_eq!(steps.unwrap(), [Direction::SouthEast; 4]);
    }

    #[test]
    fn boxed_in_start_fails_after_one_expansion() {
        let mut fa = FastAstar::new();
        let ring = Point::ZERO.with_z(0);
        let walls = Walls::new([(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)]);
        assert_eq!(
            fa.search(&NPC, &walls, ring, Point3::new(6, 0, 0)),
            Err(NoPath::NoSuccessors)
        );
        assert_eq!(fa.stats().expanded, 1);
        assert_eq!(fa.stats().oracle_calls, 8);
    }

    #[test]
    fn sealed_room_exhausts_open_list() {
        // 3×3 room centred on the origin, goal outside.
        let mut walls = Vec::new();
        for i in -2..=2 {
            walls.extend([(i, -2), (i, 2), (-2, i), (2, i)]);
        }
        let mut fa = FastAstar::new();
        assert_eq!(
            fa.search(&NPC, &Walls::new(walls), Point3::ZERO, Point3::new(8, 0, 0)),
            Err(NoPath::Exhausted)
        );
        assert_eq!(fa.stats().expanded, 9);
    }

    #[test]
    fn depth_cap_is_a_hard_limit() {
        let cfg = SearchConfig {
            max_depth: 5,
            ..SearchConfig::default()
        };
        let mut fa = FastAstar::with_config(cfg).unwrap();
        let goal = Point3::new(20, 0, 0);
        assert_eq!(
            fa.search(&NPC, &Walls::default(), Point3::ZERO, goal),
            Err(NoPath::DepthExceeded)
        );
        assert_eq!(fa.stats().expanded, 5);
        // Open nodes were left behind when the cap hit.
        assert!(!fa.pool.open_is_empty());

        // The same driver still answers reachable queries.
        let near = Point3::new(3, 0, 0);
        let steps = fa.search(&NPC, &Walls::default(), Point3::ZERO, near).unwrap();
        assert_eq!(steps, [Direction::East; 3]);
    }

    #[test]
    fn detours_around_a_wall() {
        // Wall at x = 3 from y = -5 to y = 5, goal straight behind it.
        let walls = Walls::new((-5..=5).map(|y| (3, y)));
        let mut fa = FastAstar::new();
        let goal = Point3::new(6, 0, 0);
        let steps = fa.search(&NPC, &walls, Point3::ZERO, goal).unwrap().to_vec();
        assert_eq!(walk(Point3::ZERO, &steps), goal.xy());

        let mut p = Point::ZERO;
        for d in &steps {
            p = p.step(*d);
            assert!(!walls.blocked.contains(&p), "stepped into wall at {p}");
        }
        assert!(steps.len() >= 12);
    }

    #[test]
    fn follows_terrain_elevation() {
        let mut fa = FastAstar::new();
        let goal = Point3::new(5, 0, 50);
        let steps = fa.search(&NPC, &Ramp, Point3::ZERO, goal).unwrap();
        assert_eq!(steps, [Direction::East; 5]);
    }

    #[test]
    fn goal_in_another_band_is_not_reached() {
        // Flat world at z = 0 never produces the band holding z = 60.
        let cfg = SearchConfig {
            max_depth: 40,
            ..SearchConfig::default()
        };
        let mut fa = FastAstar::with_config(cfg).unwrap();
        let goal = Point3::new(4, 0, 60);
        assert!(fa.search(&NPC, &Walls::default(), Point3::ZERO, goal).is_err());
    }

    #[test]
    fn heuristic_weights_horizontal_offsets() {
        let mut fa = FastAstar::new();
        fa.goal = Point3::new(5, 5, 10);
        fa.window.anchor(Point3::ZERO, fa.goal);
        fa.goal_cell = fa.window.local(fa.goal.xy()).unwrap();
        let cell = fa.window.local(Point::ZERO).unwrap();
        assert_eq!(fa.heuristic(cell, 0), 55 * 55 * 2 + 100);
        assert_eq!(fa.heuristic(fa.goal_cell, 10), 0);
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let walls = Walls::new([(2, 0), (2, 1), (2, -1), (5, 3), (4, 4), (6, 2)]);
        let mut fa = FastAstar::new();
        let a = (Point3::ZERO, Point3::new(9, 4, 0));
        let b = (Point3::new(30, 30, 0), Point3::new(10, 25, 0));

        let first = fa.search(&NPC, &walls, a.0, a.1).unwrap().to_vec();
        let other = fa.search(&NPC, &walls, b.0, b.1).unwrap().to_vec();
        let again = fa.search(&NPC, &walls, a.0, a.1).unwrap().to_vec();
        assert_eq!(first, again);
        assert_eq!(walk(b.0, &other), b.1.xy());

        let mut fresh = FastAstar::new();
        assert_eq!(fresh.search(&NPC, &walls, a.0, a.1).unwrap(), first.as_slice());
    }

    #[test]
    fn random_obstacles_yield_valid_paths() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut fa = FastAstar::new();
        let mut found = 0;

        for _ in 0..60 {
            let mut walls = Walls::default();
            for _ in 0..150 {
                walls
                    .blocked
                    .insert(Point::new(rng.random_range(-18..18), rng.random_range(-18..18)));
            }
            let start = Point3::new(rng.random_range(-15..15), rng.random_range(-15..15), 0);
            let goal = Point3::new(rng.random_range(-15..15), rng.random_range(-15..15), 0);
            walls.blocked.remove(&start.xy());
            walls.blocked.remove(&goal.xy());

            let result = fa.search(&NPC, &walls, start, goal).map(<[Direction]>::to_vec);
            let stats = fa.stats();
            assert!(stats.expanded <= fa.config().max_depth);
            assert!(stats.oracle_calls <= 8 * stats.expanded);

            match result {
                Ok(steps) => {
                    found += 1;
                    assert!(steps.len() <= fa.config().max_depth as usize);
                    let mut p = start.xy();
                    for d in &steps {
                        p = p.step(*d);
                        assert!(!walls.blocked.contains(&p));
                    }
                    assert_eq!(p, goal.xy());
                    let again = fa.search(&NPC, &walls, start, goal).unwrap();
                    assert_eq!(again, steps.as_slice());
                }
                Err(reason) => assert_ne!(reason, NoPath::OutOfRange),
            }
        }
        assert!(found > 0);
    }
}
