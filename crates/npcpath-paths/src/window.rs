use npcpath_core::{Point, Point3, Range};

use crate::config::SearchConfig;
use crate::distance;

/// Maps world positions onto the flat node pool of one search.
///
/// The window is `area × area` cells horizontally and `planes` bands deep. Its
/// horizontal origin moves with every search (see [`Window::anchor`]), so pool
/// indices are only meaningful until the next anchor.
#[derive(Clone, Debug)]
pub(crate) struct Window {
    area: i32,
    planes: i32,
    plane_height: i32,
    plane_offset: i32,
    bounds: Range,
    // Kept wide: the window may hang past the ends of the i32 axis.
    origin: (i64, i64),
}

impl Window {
    pub(crate) fn new(cfg: &SearchConfig) -> Self {
        Self {
            area: cfg.area_size,
            planes: cfg.plane_count,
            plane_height: cfg.plane_height,
            plane_offset: cfg.plane_offset,
            bounds: Range::new(0, 0, cfg.area_size, cfg.area_size),
            origin: (0, 0),
        }
    }

    /// Total number of cells across all bands.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.bounds.len() * self.planes as usize
    }

    /// Whether a search between `start` and `goal` fits in one window.
    ///
    /// The pair must be strictly closer than the window width on both axes,
    /// and both elevations must fall inside the band range.
    pub(crate) fn fits(&self, start: Point3, goal: Point3) -> bool {
        distance::in_range(start, goal, self.area - 1)
            && self.band(start.z).is_some()
            && self.band(goal.z).is_some()
    }

    /// Centre the window on the midpoint of `start` and `goal`.
    ///
    /// Rounds so that both endpoints land inside whenever [`fits`](Self::fits)
    /// holds, including odd separations of `area - 1`.
    pub(crate) fn anchor(&mut self, start: Point3, goal: Point3) {
        let span = i64::from(self.area) - 1;
        let mid = |a: i32, b: i32| (i64::from(a) + i64::from(b) - span).div_euclid(2);
        self.origin = (mid(start.x, goal.x), mid(start.y, goal.y));
    }

    /// Elevation band of world `z`, if it is inside the window.
    #[inline]
    pub(crate) fn band(&self, z: i32) -> Option<i32> {
        let shifted = i64::from(z) + i64::from(self.plane_offset);
        let b = shifted.div_euclid(i64::from(self.plane_height));
        (0..i64::from(self.planes)).contains(&b).then_some(b as i32)
    }

    /// Pool index of a world position, or `None` outside the window.
    pub(crate) fn index(&self, p: Point3) -> Option<usize> {
        let local = self.local(p.xy())?;
        let band = self.band(p.z)?;
        let area = self.area as usize;
        Some(local.x as usize + local.y as usize * area + band as usize * area * area)
    }

    /// Window-local horizontal cell of a pool index.
    #[inline]
    pub(crate) fn cell(&self, idx: usize) -> Point {
        let area = self.area as usize;
        Point::new((idx % area) as i32, (idx / area % area) as i32)
    }

    /// Whether a window-local cell lies inside the window.
    #[inline]
    pub(crate) fn contains(&self, local: Point) -> bool {
        self.bounds.contains(local)
    }

    /// Window-local coordinates of a world point, or `None` outside the window.
    pub(crate) fn local(&self, world: Point) -> Option<Point> {
        let x = i64::from(world.x) - self.origin.0;
        let y = i64::from(world.y) - self.origin.1;
        let area = i64::from(self.area);
        let inside = (0..area).contains(&x) && (0..area).contains(&y);
        inside.then(|| Point::new(x as i32, y as i32))
    }

    /// World coordinates of a window-local cell, or `None` past the end of
    /// the i32 axis.
    pub(crate) fn world(&self, local: Point) -> Option<Point> {
        let x = i32::try_from(i64::from(local.x) + self.origin.0).ok()?;
        let y = i32::try_from(i64::from(local.y) + self.origin.1).ok()?;
        Some(Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Window {
        Window::new(&SearchConfig::default())
    }

    #[test]
    fn len_covers_every_band() {
        assert_eq!(window().len(), 38 * 38 * 13);
    }

    #[test]
    fn bands_follow_offset_and_height() {
        let w = window();
        assert_eq!(w.band(0), Some(6)); // (0 + 128) / 20
        assert_eq!(w.band(-128), Some(0));
        assert_eq!(w.band(131), Some(12));
        assert_eq!(w.band(132), None);
        assert_eq!(w.band(-129), None);
    }

    #[test]
    fn anchor_centres_both_endpoints() {
        let mut w = window();
        let start = Point3::new(100, 200, 0);
        let goal = Point3::new(110, 190, 0);
        w.anchor(start, goal);
        assert!(w.local(start.xy()).is_some() && w.local(goal.xy()).is_some());
        // Midpoint sits near the centre of the window.
        let mid = w.local(Point::new(105, 195)).unwrap();
        assert!((mid.x - 19).abs() <= 1 && (mid.y - 19).abs() <= 1);
    }

    #[test]
    fn anchor_handles_widest_separation() {
        let mut w = window();
        for (sx, gx) in [(0, 37), (1, 38), (-38, -1), (-20, 17), (37, 0)] {
            let start = Point3::new(sx, 0, 0);
            let goal = Point3::new(gx, 0, 0);
            assert!(w.fits(start, goal));
            w.anchor(start, goal);
            assert!(w.index(start).is_some(), "start {sx} -> {gx}");
            assert!(w.index(goal).is_some(), "goal {sx} -> {gx}");
        }
    }

    #[test]
    fn fits_rejects_far_pairs_and_bad_elevations() {
        let w = window();
        let o = Point3::ZERO;
        assert!(!w.fits(o, Point3::new(38, 0, 0)));
        assert!(!w.fits(o, Point3::new(0, -40, 0)));
        assert!(!w.fits(o, Point3::new(1, 1, 500)));
        assert!(!w.fits(Point3::new(0, 0, -200), Point3::new(1, 1, 0)));
        assert!(w.fits(o, Point3::new(-37, 37, 131)));
    }

    #[test]
    fn index_round_trips_through_cell() {
        let mut w = window();
        w.anchor(Point3::new(50, 50, 0), Point3::new(60, 55, 0));
        let p = Point3::new(57, 48, 45);
        let idx = w.index(p).unwrap();
        assert!(idx < w.len());
        assert_eq!(w.world(w.cell(idx)), Some(p.xy()));
    }

    #[test]
    fn index_is_bounds_checked() {
        let mut w = window();
        w.anchor(Point3::ZERO, Point3::ZERO);
        let o = w.world(Point::ZERO).unwrap();
        assert!(w.index(Point3::new(o.x - 1, o.y, 0)).is_none());
        assert!(w.index(Point3::new(o.x + 38, o.y, 0)).is_none());
        assert!(w.index(Point3::new(o.x, o.y + 38, 0)).is_none());
        assert!(w.index(Point3::new(o.x, o.y, 400)).is_none());
        assert_eq!(w.index(Point3::new(o.x, o.y, -128)), Some(0));
        assert!(w.index(Point3::new(i32::MIN, i32::MAX, 0)).is_none());
    }

    #[test]
    fn extreme_elevations_have_no_band() {
        let w = window();
        assert_eq!(w.band(i32::MAX), None);
        assert_eq!(w.band(i32::MIN), None);
        assert!(!w.fits(Point3::ZERO, Point3::new(0, 0, i32::MAX)));
    }

    #[test]
    fn windows_at_the_ends_of_the_axis() {
        let mut w = window();
        let pairs = [
            (i32::MAX - 3, i32::MAX - 1),
            (i32::MIN, i32::MIN + 37),
            (i32::MAX, i32::MAX),
        ];
        for (s, g) in pairs {
            let start = Point3::new(s, s, 0);
            let goal = Point3::new(g, s, 0);
            assert!(w.fits(start, goal));
            w.anchor(start, goal);
            let idx = w.index(goal).unwrap();
            assert_eq!(w.world(w.cell(idx)), Some(goal.xy()));
            assert!(w.index(start).is_some());
        }
        // Cells hanging past i32::MAX exist in the window but not in the world.
        w.anchor(Point3::new(i32::MAX, 0, 0), Point3::new(i32::MAX, 0, 0));
        let edge = w.local(Point::new(i32::MAX, 0)).unwrap();
        assert_eq!(w.world(edge.shift(1, 0)), None);
        assert!(!w.fits(Point3::new(i32::MIN, 0, 0), Point3::new(1, 0, 0)));
    }
}
