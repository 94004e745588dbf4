//! Shared pieces of the `walk` demo: layout loading, route overlays and a
//! small crowd of NPCs that wander a map one step per tick.

use log::{debug, info};
use npcpath_core::{Direction, Point, Point3};
use npcpath_paths::{Agent, Capabilities, FastAstar, MoveOracle, StepQuery, chebyshev};
use npcpath_terrain::{Layout, TerrainError, TerrainMap, Tile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Height of one elevation digit in a layout file.
pub const ELEVATION_UNIT: i32 = 10;

/// Line separating the tile grid from the elevation grid in a layout file.
pub const ELEVATION_SEPARATOR: &str = "---";

/// Layout used when no map file is given.
pub const SAMPLE: &str = "\
##########################
#S.......#...............#
#........#.......o.......#
#........+.......o.......#
#........#.......o.......#
######.###########...#####
#........................#
#....ooo.........#.......#
#................#......G#
##########################
---
00000000000000000000000000
00000000000000000000000000
00000000000000000000000000
00000000000000000000000000
00000000000000000000000000
00000000000001111111111000
00000000000011222222221000
00000000000112233333321000
00000000001122334444321000
00000000000000000000000000";

/// Install the stderr logger. The filter is read from `NPCPATH_LOG`.
pub fn init_logger() {
    let env = env_logger::Env::default().filter_or("NPCPATH_LOG", "warn");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

/// Parse a layout file: a tile grid, optionally followed by a
/// [`ELEVATION_SEPARATOR`] line and a digit grid of elevations.
pub fn load_layout(text: &str) -> Result<Layout, TerrainError> {
    let mut tiles = String::new();
    let mut heights: Option<String> = None;
    for line in text.lines() {
        if heights.is_none() && line.trim() == ELEVATION_SEPARATOR {
            heights = Some(String::new());
            continue;
        }
        let buf = heights.as_mut().unwrap_or(&mut tiles);
        buf.push_str(line);
        buf.push('\n');
    }
    let mut layout = Layout::parse(&tiles)?;
    if let Some(heights) = heights {
        layout.map.parse_elevations(&heights, ELEVATION_UNIT)?;
    }
    Ok(layout)
}

/// Cells visited by following `steps` from `start`, excluding `start`.
pub fn route(start: Point, steps: &[Direction]) -> Vec<Point> {
    steps
        .iter()
        .scan(start, |p, &dir| {
            *p = p.step(dir);
            Some(*p)
        })
        .collect()
}

/// Render `layout` with the route drawn as `*` and the endpoints marked.
pub fn render_route(layout: &Layout, steps: &[Direction]) -> String {
    let cells = route(layout.start, steps);
    layout.map.render_with(|p| {
        if p == layout.start {
            Some('S')
        } else if p == layout.goal {
            Some('G')
        } else {
            cells.contains(&p).then_some('*')
        }
    })
}

// ---------------------------------------------------------------------------
// Crowd
// ---------------------------------------------------------------------------

/// An NPC wandering between random goals.
#[derive(Clone, Debug)]
pub struct Npc {
    pub glyph: char,
    pub pos: Point3,
    pub caps: Capabilities,
    goal: Point3,
    plan: Vec<Direction>,
    next: usize,
    waits: u32,
}

impl Npc {
    fn new(glyph: char, pos: Point3, caps: Capabilities) -> Self {
        Self {
            glyph,
            pos,
            caps,
            goal: pos,
            plan: Vec::new(),
            next: 0,
            waits: 0,
        }
    }

    /// Steps of the current plan not yet taken.
    pub fn remaining(&self) -> &[Direction] {
        &self.plan[self.next..]
    }
}

impl Agent for Npc {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }
}

/// What happened during one [`Crowd::tick`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// NPCs that took a step.
    pub moved: usize,
    /// NPCs whose next cell was occupied.
    pub waited: usize,
    /// NPCs that dropped their plan after waiting too long.
    pub gave_up: usize,
    /// New plans found.
    pub planned: usize,
    /// Searches that came back without a path.
    pub failed: usize,
}

const GLYPHS: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
const SPAWN_ATTEMPTS: usize = 500;
const GOAL_ATTEMPTS: usize = 8;

/// Consecutive blocked ticks after which an NPC abandons its plan.
pub const MAX_WAITS: u32 = 3;

/// A few NPCs sharing one map and one search driver.
///
/// NPCs act in order each tick. One without a plan picks a random
/// walkable cell within search range and plans toward it; one with a plan
/// takes its next step unless another NPC stands there. After [`MAX_WAITS`]
/// blocked ticks in a row the plan is dropped, so two NPCs heading through
/// each other replan instead of standing still forever.
pub struct Crowd {
    map: TerrainMap,
    npcs: Vec<Npc>,
    pather: FastAstar,
    rng: StdRng,
    ticks: u32,
}

impl Crowd {
    /// Spawn up to `count` NPCs on distinct floor cells. Every other NPC can
    /// open doors; the rest cannot.
    pub fn new(map: TerrainMap, pather: FastAstar, count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let size = map.size();
        let mut npcs: Vec<Npc> = Vec::new();
        let mut attempts = 0;
        while npcs.len() < count && attempts < SPAWN_ATTEMPTS {
            attempts += 1;
            let p = Point::new(rng.random_range(0..size.x), rng.random_range(0..size.y));
            if map.tile(p) != Some(Tile::Floor) || npcs.iter().any(|n| n.pos.xy() == p) {
                continue;
            }
            let caps = Capabilities {
                open_doors: npcs.len() % 2 == 0,
                ..Capabilities::NONE
            };
            let z = map.elevation(p).unwrap_or_default();
            npcs.push(Npc::new(GLYPHS[npcs.len() % GLYPHS.len()], p.with_z(z), caps));
        }
        info!("spawned {} of {count} npcs", npcs.len());
        Self {
            map,
            npcs,
            pather,
            rng,
            ticks: 0,
        }
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn map(&self) -> &TerrainMap {
        &self.map
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Advance every NPC by at most one step.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        for i in 0..self.npcs.len() {
            if self.npcs[i].remaining().is_empty() {
                self.plan(i, &mut report);
                continue;
            }
            self.advance(i, &mut report);
        }
        self.ticks += 1;
        report
    }

    /// Render the map with every NPC drawn as its glyph.
    pub fn render(&self) -> String {
        self.map.render_with(|p| {
            self.npcs
                .iter()
                .find(|n| n.pos.xy() == p)
                .map(|n| n.glyph)
        })
    }

    fn pick_goal(&mut self, npc: usize) -> Option<Point3> {
        let from = self.npcs[npc].pos.xy();
        let caps = self.npcs[npc].caps;
        let reach = self.pather.config().area_size - 1;
        for _ in 0..GOAL_ATTEMPTS {
            let p = from.shift(
                self.rng.random_range(-reach..=reach),
                self.rng.random_range(-reach..=reach),
            );
            if p != from && self.map.passable(p, caps) {
                return self.map.elevation(p).map(|z| p.with_z(z));
            }
        }
        None
    }

    fn plan(&mut self, i: usize, report: &mut TickReport) {
        let Some(goal) = self.pick_goal(i) else {
            return;
        };
        let npc = &self.npcs[i];
        match self.pather.search(npc, &self.map, npc.pos, goal) {
            Ok(steps) => {
                debug!("{} heads for {goal}: {} steps", npc.glyph, steps.len());
                let npc = &mut self.npcs[i];
                npc.plan.clear();
                npc.plan.extend_from_slice(steps);
                npc.next = 0;
                npc.waits = 0;
                npc.goal = goal;
                report.planned += 1;
            }
            Err(reason) => {
                debug!("{} cannot reach {goal}: {reason}", npc.glyph);
                report.failed += 1;
            }
        }
    }

    fn advance(&mut self, i: usize, report: &mut TickReport) {
        let npc = &self.npcs[i];
        let dir = npc.plan[npc.next];
        let target = npc.pos.xy().step(dir);
        if self.npcs.iter().any(|n| n.pos.xy() == target) {
            let npc = &mut self.npcs[i];
            npc.waits += 1;
            report.waited += 1;
            if npc.waits >= MAX_WAITS {
                debug!("{} gives up on {} after {} waits", npc.glyph, npc.goal, npc.waits);
                npc.plan.clear();
                npc.next = 0;
                npc.waits = 0;
                report.gave_up += 1;
            }
            return;
        }

        let query = StepQuery {
            from: npc.pos,
            dir,
            caps: npc.caps,
            goal: npc.goal,
        };
        let resolved = self.map.check_step(npc, &query);
        let npc = &mut self.npcs[i];
        match resolved {
            Some(z) => {
                npc.pos = target.with_z(z);
                npc.next += 1;
                npc.waits = 0;
                report.moved += 1;
            }
            None => {
                debug!("{} lost its way at {}", npc.glyph, npc.pos);
                npc.plan.clear();
                npc.next = 0;
            }
        }
    }
}

/// Whether every NPC stands on a distinct, walkable cell.
pub fn crowd_is_consistent(crowd: &Crowd) -> bool {
    let npcs = crowd.npcs();
    npcs.iter().enumerate().all(|(i, n)| {
        crowd.map().passable(n.pos.xy(), n.caps)
            && crowd.map().elevation(n.pos.xy()) == Some(n.pos.z)
            && npcs[i + 1..].iter().all(|m| chebyshev(m.pos.xy(), n.pos.xy()) > 0)
    })
}
