//! Terrain built from ASCII art.
//!
//! Each character is one cell: `.` floor, `#` wall, `+` door, `o` obstacle.
//! A [`Layout`] additionally carries one `S` (start) and one `G` (goal)
//! marker, both standing on floor. Elevations come from a second grid of the
//! same size whose digits are multiplied by a unit height.

use std::fmt;

use npcpath_core::{Point, Point3};

use crate::map::{TerrainMap, Tile};

/// Errors from parsing terrain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerrainError {
    /// The text has no cells.
    Empty,
    /// A line is not as wide as the first one.
    InconsistentSize {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character with no meaning in this grid.
    InvalidGlyph { ch: char, pos: Point },
    /// A required marker does not appear.
    MissingMarker(char),
    /// A marker appears more than once.
    DuplicateMarker { ch: char, pos: Point },
    /// An elevation grid does not match the map it applies to.
    SizeMismatch { expected: Point, found: Point },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "terrain: empty layout"),
            Self::InconsistentSize {
                line,
                expected,
                found,
            } => write!(
                f,
                "terrain: line {line} is {found} cells wide, expected {expected}"
            ),
            Self::InvalidGlyph { ch, pos } => {
                write!(f, "terrain: invalid glyph \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::MissingMarker(ch) => write!(f, "terrain: no \u{201c}{ch}\u{201d} marker"),
            Self::DuplicateMarker { ch, pos } => {
                write!(f, "terrain: second \u{201c}{ch}\u{201d} marker at {pos}")
            }
            Self::SizeMismatch { expected, found } => write!(
                f,
                "terrain: elevation grid is {}x{}, map is {}x{}",
                found.x, found.y, expected.x, expected.y
            ),
        }
    }
}

impl std::error::Error for TerrainError {}

/// Split trimmed text into a rectangle of characters, row-major.
fn read_grid(s: &str) -> Result<(Point, Vec<char>), TerrainError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TerrainError::Empty);
    }
    let mut width: Option<usize> = None;
    let mut height = 0;
    let mut cells = Vec::with_capacity(s.len());
    for (line, row) in s.lines().enumerate() {
        let row = row.trim_end_matches('\r');
        let found = row.chars().count();
        match width {
            None => width = Some(found),
            Some(expected) if expected != found => {
                return Err(TerrainError::InconsistentSize {
                    line,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
        cells.extend(row.chars());
        height += 1;
    }
    let width = width.unwrap_or_default() as i32;
    Ok((Point::new(width, height), cells))
}

fn cell_pos(i: usize, width: i32) -> Point {
    let i = i as i32;
    Point::new(i % width, i / width)
}

impl TerrainMap {
    /// Parse a flat map from ASCII art.
    ///
    /// Surrounding whitespace is trimmed; every line must then have the same
    /// width. `S` and `G` are accepted and read as floor.
    pub fn parse(s: &str) -> Result<Self, TerrainError> {
        parse_tiles(s).map(|(map, _)| map)
    }

    /// Apply an elevation grid to this map.
    ///
    /// Each cell must be a digit; its floor is set to `digit * unit`. The grid
    /// must have exactly the map's size.
    pub fn parse_elevations(&mut self, s: &str, unit: i32) -> Result<(), TerrainError> {
        let (size, cells) = read_grid(s)?;
        if size != self.size() {
            return Err(TerrainError::SizeMismatch {
                expected: self.size(),
                found: size,
            });
        }
        for (i, ch) in cells.into_iter().enumerate() {
            let pos = cell_pos(i, size.x);
            let digit = ch
                .to_digit(10)
                .ok_or(TerrainError::InvalidGlyph { ch, pos })?;
            self.set_elevation(pos, digit as i32 * unit);
        }
        Ok(())
    }
}

/// Parse tiles and collect start and goal markers in reading order.
fn parse_tiles(s: &str) -> Result<(TerrainMap, Vec<(char, Point)>), TerrainError> {
    let (size, cells) = read_grid(s)?;
    let mut map = TerrainMap::new(size.x, size.y);
    let mut markers = Vec::new();
    for (i, ch) in cells.into_iter().enumerate() {
        let pos = cell_pos(i, size.x);
        let tile = Tile::from_glyph(ch).ok_or(TerrainError::InvalidGlyph { ch, pos })?;
        map.set_tile(pos, tile);
        if matches!(ch, 'S' | 'G') {
            markers.push((ch, pos));
        }
    }
    Ok((map, markers))
}

/// A map together with the start and goal of a walk across it.
#[derive(Debug, Clone)]
pub struct Layout {
    pub map: TerrainMap,
    pub start: Point,
    pub goal: Point,
}

impl Layout {
    /// Parse a layout holding exactly one `S` and one `G`.
    pub fn parse(s: &str) -> Result<Self, TerrainError> {
        let (map, markers) = parse_tiles(s)?;
        let mut start = None;
        let mut goal = None;
        for (ch, pos) in markers {
            let slot = if ch == 'S' { &mut start } else { &mut goal };
            if slot.replace(pos).is_some() {
                return Err(TerrainError::DuplicateMarker { ch, pos });
            }
        }
        Ok(Self {
            map,
            start: start.ok_or(TerrainError::MissingMarker('S'))?,
            goal: goal.ok_or(TerrainError::MissingMarker('G'))?,
        })
    }

    /// Start and goal lifted to the floor elevation of their cells.
    pub fn endpoints(&self) -> (Point3, Point3) {
        let lift = |p: Point| p.with_z(self.map.elevation(p).unwrap_or_default());
        (lift(self.start), lift(self.goal))
    }
}
