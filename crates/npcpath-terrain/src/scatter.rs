use npcpath_core::Point;
use rand::Rng;

use crate::map::{TerrainMap, Tile};

/// Randomly turn floor cells into `tile`.
///
/// Each floor cell not listed in `keep_clear` is replaced with probability
/// `density` (clamped to `0.0..=1.0`). Other tiles are left alone. Returns the
/// number of cells replaced.
pub fn scatter(
    map: &mut TerrainMap,
    rng: &mut impl Rng,
    tile: Tile,
    density: f64,
    keep_clear: &[Point],
) -> usize {
    let density = density.clamp(0.0, 1.0);
    let mut placed = 0;
    for p in map.bounds() {
        if map.tile(p) != Some(Tile::Floor) || keep_clear.contains(&p) {
            continue;
        }
        let r: f64 = rng.random();
        if r < density {
            map.set_tile(p, tile);
            placed += 1;
        }
    }
    placed
}
