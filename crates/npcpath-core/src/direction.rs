//! The eight compass step directions.

use std::fmt;

use crate::geom::Point;

/// A single-cell horizontal step.
///
/// Discriminants follow clockwise compass order starting at north, which is
/// also the order successors are proposed in during a search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    /// All directions in compass order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Horizontal offset of one step. North is `-y`.
    #[inline]
    pub const fn delta(self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::NorthEast => Point::new(1, -1),
            Direction::East => Point::new(1, 0),
            Direction::SouthEast => Point::new(1, 1),
            Direction::South => Point::new(0, 1),
            Direction::SouthWest => Point::new(-1, 1),
            Direction::West => Point::new(-1, 0),
            Direction::NorthWest => Point::new(-1, -1),
        }
    }

    /// The direction that best approximates the heading `from → to`.
    ///
    /// Only the sign of each axis matters, so adjacent cells map exactly.
    /// Returns `None` when both points coincide.
    pub fn toward(from: Point, to: Point) -> Option<Self> {
        let d = to - from;
        let dir = match (d.x.signum(), d.y.signum()) {
            (0, -1) => Direction::North,
            (1, -1) => Direction::NorthEast,
            (1, 0) => Direction::East,
            (1, 1) => Direction::SouthEast,
            (0, 1) => Direction::South,
            (-1, 1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            (-1, -1) => Direction::NorthWest,
            _ => return None,
        };
        Some(dir)
    }

    /// Whether the step moves along both axes.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        (self as u8) & 1 == 1
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        };
        f.write_str(s)
    }
}

impl Point {
    /// The neighbouring point one step in `dir`.
    #[inline]
    pub const fn step(self, dir: Direction) -> Point {
        let d = dir.delta();
        self.shift(d.x, d.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_order_matches_discriminants() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(*dir as usize, i);
        }
    }

    #[test]
    fn deltas_are_unit_steps() {
        assert_eq!(Direction::North.delta(), Point::new(0, -1));
        assert_eq!(Direction::SouthEast.delta(), Point::new(1, 1));
        assert_eq!(Direction::West.delta(), Point::new(-1, 0));
        for dir in Direction::ALL {
            let d = dir.delta();
            assert!(d.x.abs() <= 1 && d.y.abs() <= 1 && d != Point::ZERO);
            assert_eq!(dir.is_diagonal(), d.x != 0 && d.y != 0);
        }
    }

    #[test]
    fn toward_inverts_delta() {
        let origin = Point::new(10, -3);
        for dir in Direction::ALL {
            assert_eq!(Direction::toward(origin, origin.step(dir)), Some(dir));
        }
        assert_eq!(Direction::toward(origin, origin), None);
        // Longer headings collapse onto the signs of each axis.
        assert_eq!(
            Direction::toward(Point::new(0, 0), Point::new(5, -2)),
            Some(Direction::NorthEast)
        );
    }

    #[test]
    fn display_uses_compass_abbreviations() {
        let s: Vec<String> = Direction::ALL.iter().map(|d| d.to_string()).collect();
        assert_eq!(s, ["N", "NE", "E", "SE", "S", "SW", "W", "NW"]);
    }
}
