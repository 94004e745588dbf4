//! Search window and budget configuration.

use std::fmt;

/// Tunables for a [`FastAstar`](crate::FastAstar) instance.
///
/// The defaults describe a 38×38 cell window with 13 elevation bands of 20
/// world units each, covering elevations `-128..132`, and a budget of 300
/// expansions per search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Cells per horizontal axis of the search window.
    pub area_size: i32,
    /// Number of elevation bands.
    pub plane_count: i32,
    /// World-z units covered by one band.
    pub plane_height: i32,
    /// Added to world z before banding so negative elevations map to band 0+.
    pub plane_offset: i32,
    /// Maximum number of node expansions per search.
    pub max_depth: u32,
    /// Horizontal scale applied before squaring in the heuristic.
    pub heuristic_weight: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            area_size: 38,
            plane_count: 13,
            plane_height: 20,
            plane_offset: 128,
            max_depth: 300,
            heuristic_weight: 11,
        }
    }
}

impl SearchConfig {
    /// Number of nodes in the pool: one per window cell per band.
    pub fn node_count(&self) -> usize {
        let area = self.area_size.max(0) as usize;
        area * area * self.plane_count.max(0) as usize
    }

    /// Lowest world elevation that maps into the window. Saturates for
    /// offsets [`validate`](Self::validate) rejects.
    pub fn min_elevation(&self) -> i32 {
        self.plane_offset.saturating_neg()
    }

    /// One past the highest world elevation that maps into the window.
    pub fn max_elevation(&self) -> i32 {
        self.plane_count
            .saturating_mul(self.plane_height)
            .saturating_sub(self.plane_offset)
    }

    /// Check that the configuration describes a usable window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.area_size < 2 {
            return Err(ConfigError::AreaTooSmall(self.area_size));
        }
        if self.plane_count < 1 || self.plane_height < 1 {
            return Err(ConfigError::InvalidPlanes {
                count: self.plane_count,
                height: self.plane_height,
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.heuristic_weight < 1 {
            return Err(ConfigError::InvalidWeight(self.heuristic_weight));
        }
        let area = i64::from(self.area_size);
        let nodes = (area * area).saturating_mul(i64::from(self.plane_count));
        if nodes > i64::from(i32::MAX) {
            return Err(ConfigError::WindowTooLarge(nodes));
        }

        // Both ends of the band range must be representable elevations.
        let span = i64::from(self.plane_count) * i64::from(self.plane_height);
        let low = -i64::from(self.plane_offset);
        let high = span + low;
        if i32::try_from(low).is_err() || i32::try_from(high).is_err() {
            return Err(ConfigError::InvalidOffset(self.plane_offset));
        }

        // Largest heuristic plus the longest possible path cost must fit an i32.
        let reach = area * i64::from(self.heuristic_weight);
        let worst = reach
            .checked_mul(reach)
            .and_then(|r| r.checked_mul(2))
            .and_then(|r| r.checked_add(span.checked_mul(span)?))
            .and_then(|h| h.checked_add(i64::from(self.max_depth)));
        if worst.is_none_or(|w| w > i64::from(i32::MAX)) {
            return Err(ConfigError::Overflow);
        }
        Ok(())
    }
}

/// Reasons a [`SearchConfig`] is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The window must be at least 2 cells wide.
    AreaTooSmall(i32),
    /// Band count and band height must both be positive.
    InvalidPlanes { count: i32, height: i32 },
    /// A search needs at least one expansion.
    ZeroDepth,
    /// The heuristic weight must be positive.
    InvalidWeight(i32),
    /// The pool would hold more nodes than an `i32` can count.
    WindowTooLarge(i64),
    /// The offset pushes one end of the band range past the `i32` axis.
    InvalidOffset(i32),
    /// Window and weight are large enough to overflow path totals.
    Overflow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaTooSmall(n) => write!(f, "search area of {n} cells is too small"),
            Self::InvalidPlanes { count, height } => {
                write!(f, "invalid elevation bands: {count} bands of height {height}")
            }
            Self::ZeroDepth => write!(f, "max depth must be at least 1"),
            Self::InvalidWeight(w) => write!(f, "heuristic weight {w} must be positive"),
            Self::WindowTooLarge(n) => write!(f, "window of {n} nodes is too large"),
            Self::InvalidOffset(o) => {
                write!(f, "elevation offset {o} puts the band range out of bounds")
            }
            Self::Overflow => write!(f, "window too large: path totals would overflow"),
        }
    }
}

impl std::error::Error for ConfigError {}
