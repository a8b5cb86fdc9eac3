//! Coordinate types for chunks and world x-space.
//!
//! The world is infinite along x only. A chunk is a fixed-width slice of
//! x-space `[min_x, max_x)` where `min_x = x * chunk_width`.
//!
//! World x is an `i32` inside a chunk span, so chunk coordinates are limited
//! to `±limit(chunk_width)`. Positions beyond that map to the outermost
//! representable chunk, and span math saturates instead of overflowing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Chunk coordinate (identifies a chunk along the x axis).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32) -> Self {
        Self { x }
    }

    /// Largest chunk coordinate magnitude whose span fits in `i32` world x.
    #[must_use]
    pub const fn limit(chunk_width: u32) -> i32 {
        i32::MAX / width(chunk_width) - 1
    }

    /// Returns the chunk containing the given world x position.
    ///
    /// Uses floor division, so `-1.0` maps to chunk `-1`, not `0`. Positions
    /// past `limit` (and NaN, which maps to 0) are clamped.
    #[must_use]
    pub fn from_world_x(world_x: f32, chunk_width: u32) -> Self {
        let x = (f64::from(world_x) / f64::from(width(chunk_width))).floor();
        let limit = f64::from(Self::limit(chunk_width));
        Self {
            x: x.clamp(-limit, limit) as i32,
        }
    }

    /// Returns the chunk containing the given integer world x position.
    #[must_use]
    pub const fn from_block_x(world_x: i32, chunk_width: u32) -> Self {
        Self {
            x: world_x.div_euclid(width(chunk_width)),
        }
    }

    /// Returns the first world x of this chunk (inclusive).
    #[must_use]
    pub const fn min_x(self, chunk_width: u32) -> i32 {
        self.x.saturating_mul(width(chunk_width))
    }

    /// Returns the end world x of this chunk (exclusive).
    #[must_use]
    pub const fn max_x(self, chunk_width: u32) -> i32 {
        self.x.saturating_add(1).saturating_mul(width(chunk_width))
    }

    /// Pulls this coordinate in so a window of `radius` around it stays
    /// within `±limit(chunk_width)`.
    #[must_use]
    pub fn clamp_for_window(self, radius: u32, chunk_width: u32) -> Self {
        let radius = radius.min(i32::MAX as u32) as i32;
        let bound = Self::limit(chunk_width).saturating_sub(radius).max(0);
        Self {
            x: self.x.clamp(-bound, bound),
        }
    }

    /// Checks whether a world x position falls inside this chunk.
    #[must_use]
    pub fn contains_x(self, world_x: f32, chunk_width: u32) -> bool {
        Self::from_world_x(world_x, chunk_width) == self
    }

    /// Returns the coordinate `delta` chunks away.
    #[must_use]
    pub const fn offset(self, delta: i32) -> Self {
        Self {
            x: self.x.saturating_add(delta),
        }
    }

    /// Returns every chunk overlapping the half-open world range `[min_x, max_x)`.
    ///
    /// An empty or inverted range yields an empty iterator.
    #[must_use]
    pub fn covering(min_x: i32, max_x: i32, chunk_width: u32) -> ChunkRange {
        if max_x <= min_x {
            return ChunkRange::empty();
        }
        let first = Self::from_block_x(min_x, chunk_width);
        let last = Self::from_block_x(max_x - 1, chunk_width);
        ChunkRange {
            inner: first.x..=last.x,
        }
    }

    /// Returns the window of chunks within `radius` of this one, inclusive.
    #[must_use]
    pub fn window(self, radius: u32) -> ChunkRange {
        let r = radius.min(i32::MAX as u32) as i32;
        ChunkRange {
            inner: self.x.saturating_sub(r)..=self.x.saturating_add(r),
        }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk({})", self.x)
    }
}

/// Chunk width as a divisor; a zero width is treated as 1.
const fn width(chunk_width: u32) -> i32 {
    if chunk_width == 0 {
        1
    } else if chunk_width > i32::MAX as u32 {
        i32::MAX
    } else {
        chunk_width as i32
    }
}

/// Contiguous, ascending run of chunk coordinates.
#[derive(Debug, Clone)]
pub struct ChunkRange {
    inner: RangeInclusive<i32>,
}

impl ChunkRange {
    #[allow(clippy::reversed_empty_ranges)]
    fn empty() -> Self {
        Self { inner: 1..=0 }
    }

    /// Returns true if the range contains no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Checks whether a coordinate lies in this range.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.inner.contains(&coord.x)
    }
}

impl Iterator for ChunkRange {
    type Item = ChunkCoord;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(ChunkCoord::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for ChunkRange {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(ChunkCoord::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDTH: u32 = 300;

    #[test]
    fn test_negative_positions_floor() {
        assert_eq!(ChunkCoord::from_world_x(-1.0, WIDTH), ChunkCoord::new(-1));
        assert_eq!(ChunkCoord::from_world_x(-300.0, WIDTH), ChunkCoord::new(-1));
        assert_eq!(ChunkCoord::from_world_x(-300.5, WIDTH), ChunkCoord::new(-2));
        assert_eq!(ChunkCoord::from_block_x(-1, WIDTH), ChunkCoord::new(-1));
    }

    #[test]
    fn test_covering_half_open() {
        let coords: Vec<_> = ChunkCoord::covering(0, 600, WIDTH).collect();
        assert_eq!(coords, vec![ChunkCoord::new(0), ChunkCoord::new(1)]);

        let coords: Vec<_> = ChunkCoord::covering(-10, 10, WIDTH).collect();
        assert_eq!(coords, vec![ChunkCoord::new(-1), ChunkCoord::new(0)]);

        assert!(ChunkCoord::covering(300, 300, WIDTH).is_empty());
        assert!(ChunkCoord::covering(600, 0, WIDTH).is_empty());
    }

    #[test]
    fn test_window() {
        let window: Vec<_> = ChunkCoord::new(0).window(5).collect();
        assert_eq!(window.len(), 11);
        assert_eq!(window.first(), Some(&ChunkCoord::new(-5)));
        assert_eq!(window.last(), Some(&ChunkCoord::new(5)));
        assert_eq!(ChunkCoord::new(-5).min_x(WIDTH), -1500);
        assert_eq!(ChunkCoord::new(5).max_x(WIDTH), 1800);
    }

    #[test]
    fn test_far_positions_clamp_to_limit() {
        let limit = ChunkCoord::limit(WIDTH);
        assert_eq!(limit, i32::MAX / 300 - 1);

        let far = ChunkCoord::from_world_x(1.0e10, WIDTH);
        assert_eq!(far.x, limit);
        assert!(far.min_x(WIDTH) < far.max_x(WIDTH));
        assert_eq!(ChunkCoord::from_world_x(-1.0e10, WIDTH).x, -limit);
        assert_eq!(ChunkCoord::from_world_x(f32::INFINITY, WIDTH).x, limit);
        assert_eq!(ChunkCoord::from_world_x(f32::NAN, WIDTH).x, 0);
    }

    #[test]
    fn test_window_clamp_keeps_spans_representable() {
        let center = ChunkCoord::from_world_x(1.0e10, WIDTH).clamp_for_window(5, WIDTH);
        let window: Vec<_> = center.window(5).collect();
        assert_eq!(window.len(), 11);
        let last = window[10];
        assert_eq!(last.x, ChunkCoord::limit(WIDTH));
        assert_eq!(last.max_x(WIDTH) - last.min_x(WIDTH), 300);

        let center = ChunkCoord::from_world_x(-1.0e10, WIDTH).clamp_for_window(5, WIDTH);
        let first = center.window(5).next().expect("non-empty window");
        assert_eq!(first.max_x(WIDTH) - first.min_x(WIDTH), 300);
    }

    #[test]
    fn test_zero_width_does_not_panic() {
        assert_eq!(ChunkCoord::from_block_x(7, 0), ChunkCoord::new(7));
        assert_eq!(ChunkCoord::new(3).max_x(0), 4);
    }

    proptest! {
        #[test]
        fn prop_world_x_lies_in_its_chunk(x in -1_000_000i32..1_000_000) {
            let coord = ChunkCoord::from_block_x(x, WIDTH);
            prop_assert!(coord.min_x(WIDTH) <= x);
            prop_assert!(x < coord.max_x(WIDTH));
            prop_assert_eq!(coord, ChunkCoord::from_world_x(x as f32, WIDTH));
        }

        #[test]
        fn prop_covering_is_contiguous(min in -50_000i32..50_000, len in 1i32..5_000) {
            let coords: Vec<_> = ChunkCoord::covering(min, min + len, WIDTH).collect();
            prop_assert!(!coords.is_empty());
            prop_assert_eq!(coords[0], ChunkCoord::from_block_x(min, WIDTH));
            for pair in coords.windows(2) {
                prop_assert_eq!(pair[1].x, pair[0].x + 1);
            }
        }
    }
}
