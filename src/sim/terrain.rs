//! Endless ground made of fixed-width segments with random gaps
//!
//! Segments scroll left with the world. Each frame the generator checks the
//! rightmost segment and, if it has come inside the horizon, lays the next one
//! one width further on (sometimes leaving a gap first).

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::tuning::Tuning;

/// Scrolling accumulates float error at segment seams; anything narrower than
/// this is not a gap
const SEAM_TOLERANCE: f32 = 0.5;

/// A ground tile, anchored at its bottom-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    /// Leading (left) edge in world units
    pub x: f32,
    pub width: f32,
}

impl Segment {
    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether the horizontal position `x` is over this segment
    #[inline]
    pub fn covers(&self, x: f32) -> bool {
        x >= self.x - SEAM_TOLERANCE && x < self.right()
    }
}

/// Owns the live ground segments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGenerator {
    /// Live segments in spawn order (ascending x)
    pub segments: Vec<Segment>,
    /// Width of every segment, fixed once the first one is measured
    pub segment_width: f32,
    /// Top surface of the ground
    pub surface_y: f32,
    viewport_width: f32,
    gap_chance: f32,
    gap_sizes: Vec<f32>,
    next_id: u32,
}

impl TerrainGenerator {
    /// Create the generator and lay the opening stretch of gapless ground
    pub fn new(tuning: &Tuning) -> Self {
        let mut terrain = Self {
            segments: Vec::new(),
            segment_width: tuning.segment_width(),
            surface_y: tuning.ground_baseline - tuning.segment_height,
            viewport_width: tuning.viewport.width,
            gap_chance: tuning.gap_chance,
            gap_sizes: tuning.gap_sizes.clone(),
            next_id: 1,
        };
        terrain.fill_initial();
        terrain
    }

    /// Lay contiguous segments from x = 0 until the buffer reaches two widths
    /// past the right edge of the viewport
    pub fn fill_initial(&mut self) {
        self.segments.clear();
        let mut next_x = 0.0;
        while next_x < self.viewport_width + self.segment_width * 2.0 {
            self.place(next_x);
            next_x += self.segment_width;
        }
        log::debug!(
            "Initial ground: {} segments of width {}",
            self.segments.len(),
            self.segment_width
        );
    }

    fn place(&mut self, x: f32) {
        let id = self.next_id;
        self.next_id += 1;
        self.segments.push(Segment {
            id,
            x,
            width: self.segment_width,
        });
    }

    /// Scroll every segment left and drop those fully behind the cleanup line
    pub fn advance(&mut self, dt: f32, scroll_speed: f32) {
        let dx = scroll_speed * dt;
        for segment in &mut self.segments {
            segment.x -= dx;
        }

        let cleanup_x = self.cleanup_x();
        self.segments.retain(|s| {
            let keep = s.right() >= cleanup_x;
            if !keep {
                log::trace!("Culled segment {}", s.id);
            }
            keep
        });
    }

    /// Left-side boundary behind which scrolled objects are destroyed
    #[inline]
    pub fn cleanup_x(&self) -> f32 {
        -self.segment_width * 2.0
    }

    /// Leading edge of the rightmost live segment, or `-segment_width` when
    /// the ground is gone so regeneration restarts at x = 0
    pub fn rightmost_x(&self) -> f32 {
        self.segments
            .iter()
            .map(|s| s.x)
            .reduce(f32::max)
            .unwrap_or(-self.segment_width)
    }

    /// Lay the next segment if the rightmost one has come inside the horizon.
    /// Returns the new segment's id.
    pub fn maybe_spawn_next(&mut self, rng: &mut impl RandomSource) -> Option<u32> {
        let mut rightmost = self.rightmost_x();
        if rightmost >= self.viewport_width + self.segment_width {
            return None;
        }

        if rng.chance(self.gap_chance) {
            let gap = rng.pick(&self.gap_sizes);
            rightmost += self.segment_width * gap;
            log::debug!("Gap of {} segments", gap);
        }

        self.place(rightmost + self.segment_width);
        self.segments.last().map(|s| s.id)
    }

    /// Whether any live segment is under the horizontal position `x`
    pub fn has_ground_under(&self, x: f32) -> bool {
        self.segments.iter().any(|s| s.covers(x))
    }

    /// Left edge of the first hole at or after `x` within `range` units.
    /// Holes include the empty space past the rightmost segment.
    pub fn next_gap_within(&self, x: f32, range: f32) -> Option<f32> {
        let mut probe = x;
        while probe <= x + range {
            match self.segments.iter().find(|s| s.covers(probe)) {
                Some(s) => probe = s.right(),
                None => return Some(probe),
            }
        }
        None
    }
}
