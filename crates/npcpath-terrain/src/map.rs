use npcpath_core::{Point, Range};
use npcpath_paths::{Capabilities, MoveOracle, StepQuery};

/// Largest elevation change a single step may make.
pub const DEFAULT_MAX_CLIMB: i32 = 16;

/// What occupies a map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    /// Passable for agents that can open doors.
    Door,
    /// Passable for agents that can move over obstacles.
    Obstacle,
}

impl Tile {
    /// ASCII glyph used by layouts.
    pub const fn glyph(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Door => '+',
            Tile::Obstacle => 'o',
        }
    }

    /// Tile for a layout glyph. Start and goal markers sit on floor.
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '.' | 'S' | 'G' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            '+' => Some(Tile::Door),
            'o' => Some(Tile::Obstacle),
            _ => None,
        }
    }

    /// Whether an agent with `caps` may stand on this tile.
    pub const fn passable(self, caps: Capabilities) -> bool {
        match self {
            Tile::Floor => true,
            Tile::Wall => false,
            Tile::Door => caps.open_doors,
            Tile::Obstacle => caps.cross_obstacles,
        }
    }
}

/// A rectangular tile map with a floor elevation per cell.
///
/// Covers world cells `(0, 0)` to `(width - 1, height - 1)`; everything
/// outside is impassable.
#[derive(Debug, Clone)]
pub struct TerrainMap {
    bounds: Range,
    tiles: Vec<Tile>,
    heights: Vec<i32>,
    max_climb: i32,
}

impl TerrainMap {
    /// Create a flat, open map at elevation 0.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            bounds,
            tiles: vec![Tile::Floor; bounds.len()],
            heights: vec![0; bounds.len()],
            max_climb: DEFAULT_MAX_CLIMB,
        }
    }

    /// Replace the per-step climb limit.
    pub fn with_max_climb(mut self, max_climb: i32) -> Self {
        self.max_climb = max_climb;
        self
    }

    /// The per-step climb limit.
    pub fn max_climb(&self) -> i32 {
        self.max_climb
    }

    /// The world cells covered by the map.
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size as (width, height).
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        self.contains(p).then(|| (p.y * self.bounds.width() + p.x) as usize)
    }

    /// Tile at `p`, or `None` off the map.
    pub fn tile(&self, p: Point) -> Option<Tile> {
        self.index(p).map(|i| self.tiles[i])
    }

    /// Set the tile at `p`. Does nothing off the map.
    pub fn set_tile(&mut self, p: Point, tile: Tile) {
        if let Some(i) = self.index(p) {
            self.tiles[i] = tile;
        }
    }

    /// Floor elevation at `p`, or `None` off the map.
    pub fn elevation(&self, p: Point) -> Option<i32> {
        self.index(p).map(|i| self.heights[i])
    }

    /// Set the floor elevation at `p`. Does nothing off the map.
    pub fn set_elevation(&mut self, p: Point, z: i32) {
        if let Some(i) = self.index(p) {
            self.heights[i] = z;
        }
    }

    /// Set the floor elevation of every on-map cell in `rng`.
    pub fn fill_elevation(&mut self, rng: Range, z: i32) {
        for p in rng {
            self.set_elevation(p, z);
        }
    }

    /// Whether `p` is on the map and walkable with `caps`.
    pub fn passable(&self, p: Point, caps: Capabilities) -> bool {
        self.tile(p).is_some_and(|t| t.passable(caps))
    }

    /// Number of cells holding `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Render the map as ASCII, one row per line.
    pub fn render(&self) -> String {
        self.render_with(|_| None)
    }

    /// Render the map, letting `overlay` replace the glyph of any cell.
    pub fn render_with(&self, overlay: impl Fn(Point) -> Option<char>) -> String {
        let (w, h) = (self.bounds.width(), self.bounds.height());
        let mut out = String::with_capacity(self.tiles.len() + h as usize);
        for y in 0..h {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..w {
                let ch = overlay(Point::new(x, y))
                    .unwrap_or_else(|| self.tiles[(y * w + x) as usize].glyph());
                out.push(ch);
            }
        }
        out
    }
}

impl<A: ?Sized> MoveOracle<A> for TerrainMap {
    /// A step is legal when the destination is on the map and walkable, the
    /// floor there is within `max_climb` of the current elevation, and, for
    /// diagonal steps, both cells beside the corner are walkable too.
    ///
    /// The goal cell is always walkable unless it is a wall, so an agent may
    /// path into the doorway or obstacle it was sent to.
    fn check_step(&self, _agent: &A, query: &StepQuery) -> Option<i32> {
        let from = query.from.xy();
        let to = from.step(query.dir);
        let tile = self.tile(to)?;

        let enterable = if to == query.goal.xy() {
            tile != Tile::Wall
        } else {
            tile.passable(query.caps)
        };
        if !enterable {
            return None;
        }

        if query.dir.is_diagonal() {
            let d = query.dir.delta();
            if !self.passable(from.shift(d.x, 0), query.caps)
                || !self.passable(from.shift(0, d.y), query.caps)
            {
                return None;
            }
        }

        let z = self.elevation(to)?;
        ((z - query.from.z).abs() <= self.max_climb).then_some(z)
    }
}
