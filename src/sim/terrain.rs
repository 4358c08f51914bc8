//! Procedural terrain with embedded landing pads
//!
//! The surface is a single polyline across the playfield, built segment by
//! segment from random samples:
//! - `segment_count` equal-width segments
//! - a handful of them are flat landing pads, never adjacent to each other
//! - the rest are cubic Bézier curves whose control points follow the slope
//!   at either end, so neighbouring curves join without kinks
//!
//! The polyline plus two baseline corners closes into a solid polygon.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::TerrainError;
use super::random::RandomDistribution;
use crate::config::TerrainConfig;

/// Lowest segment index a pad may occupy
const FIRST_PAD_SEGMENT: usize = 2;

/// A flat, scoreable strip of terrain covering exactly one segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingPad {
    pub segment_index: usize,
    pub x_start: f32,
    pub x_end: f32,
    pub y: f32,
}

impl LandingPad {
    /// Strict interior containment; touching down on an edge does not count
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x > self.x_start && x < self.x_end
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x_end - self.x_start
    }

    /// Middle of the pad surface
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.x_start + self.x_end) * 0.5, self.y)
    }
}

/// Generated surface, immutable once built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    /// Surface polyline, x strictly increasing from 0 to `width`
    pub points: Vec<Vec2>,
    /// Landing pads, ordered by segment index
    pub pads: Vec<LandingPad>,
    /// Surface height at each segment boundary (`segment_count + 1` values)
    pub segment_heights: Vec<f32>,
    pub segment_width: f32,
    pub width: f32,
    /// Bottom edge of the closed polygon
    pub baseline: f32,
}

impl Terrain {
    /// Build a straight-edged terrain from boundary heights.
    ///
    /// Segments listed in `pad_segments` are flattened to their left height
    /// and become landing pads. Handy for scripted levels and tests.
    pub fn from_heights(
        width: f32,
        heights: &[f32],
        pad_segments: &[usize],
        baseline: f32,
    ) -> Result<Self, TerrainError> {
        if heights.len() < 2 {
            return Err(TerrainError::InvalidConfig(
                "at least two boundary heights are required".to_string(),
            ));
        }
        if width <= 0.0 {
            return Err(TerrainError::InvalidConfig("width must be positive".to_string()));
        }

        let segment_count = heights.len() - 1;
        if let Some(&bad) = pad_segments.iter().find(|&&s| s >= segment_count) {
            return Err(TerrainError::InvalidConfig(format!(
                "pad segment {bad} out of range (0..{segment_count})"
            )));
        }

        let segment_width = width / segment_count as f32;
        let mut segment_heights = vec![heights[0]];
        let mut points = vec![Vec2::new(0.0, heights[0])];
        let mut pads = Vec::new();

        for i in 0..segment_count {
            let x_start = boundary_x(i, segment_count, segment_width, width);
            let x_end = boundary_x(i + 1, segment_count, segment_width, width);
            let y_start = segment_heights[i];
            let y_end = if pad_segments.contains(&i) {
                pads.push(LandingPad {
                    segment_index: i,
                    x_start,
                    x_end,
                    y: y_start,
                });
                y_start
            } else {
                heights[i + 1]
            };
            segment_heights.push(y_end);
            points.push(Vec2::new(x_end, y_end));
        }

        Ok(Self {
            points,
            pads,
            segment_heights,
            segment_width,
            width,
            baseline,
        })
    }

    pub fn segment_count(&self) -> usize {
        self.segment_heights.len().saturating_sub(1)
    }

    /// Closed polygon: the surface, then down to the baseline and back
    pub fn outline(&self) -> Vec<Vec2> {
        let mut outline = self.points.clone();
        outline.push(Vec2::new(self.width, self.baseline));
        outline.push(Vec2::new(0.0, self.baseline));
        outline
    }

    /// Exact surface height at `x`, `None` outside the playfield
    pub fn height_at(&self, x: f32) -> Option<f32> {
        if !(0.0..=self.width).contains(&x) {
            return None;
        }
        let idx = self.points.partition_point(|p| p.x <= x);
        if idx == 0 {
            return self.points.first().map(|p| p.y);
        }
        if idx >= self.points.len() {
            return self.points.last().map(|p| p.y);
        }
        let a = self.points[idx - 1];
        let b = self.points[idx];
        let t = (x - a.x) / (b.x - a.x);
        Some(a.y + (b.y - a.y) * t)
    }

    /// Index of the segment under `x`
    pub fn segment_index_at(&self, x: f32) -> Option<usize> {
        if !(0.0..=self.width).contains(&x) || self.segment_width <= 0.0 {
            return None;
        }
        let idx = (x / self.segment_width).floor() as usize;
        Some(idx.min(self.segment_count().saturating_sub(1)))
    }

    /// Coarse ground height of the segment under `x` (mean of its two ends)
    pub fn segment_ground_height(&self, x: f32) -> Option<f32> {
        let i = self.segment_index_at(x)?;
        Some(0.5 * (self.segment_heights[i] + self.segment_heights[i + 1]))
    }

    /// Landing pad whose interior contains `x`
    pub fn pad_containing(&self, x: f32) -> Option<&LandingPad> {
        self.pads.iter().find(|pad| pad.contains_x(x))
    }
}

/// Builds [`Terrain`] from a [`TerrainConfig`]
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    config: TerrainConfig,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Result<Self, TerrainError> {
        if config.segment_count < 4 {
            return Err(TerrainError::InvalidConfig(format!(
                "segment_count must be at least 4, got {}",
                config.segment_count
            )));
        }
        if config.playfield_width <= 0.0 {
            return Err(TerrainError::InvalidConfig(
                "playfield_width must be positive".to_string(),
            ));
        }
        if config.curve_resolution == 0 {
            return Err(TerrainError::InvalidConfig(
                "curve_resolution must be positive".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Pick pad segment indices in `[2, segment_count - 2]`, no two equal or adjacent.
    ///
    /// Each pad is drawn from the free indices that still leave room for the
    /// pads after it, so a feasible request never dead-ends. A request that
    /// cannot fit fails before anything is sampled.
    pub fn select_pad_segments(
        &self,
        rng: &mut RandomDistribution,
    ) -> Result<BTreeSet<usize>, TerrainError> {
        let segment_count = self.config.segment_count;
        let landing_pad_count = self.config.landing_pad_count;

        if landing_pad_count > max_spaced_pads(segment_count) {
            return Err(TerrainError::PadPlacement {
                segment_count,
                landing_pad_count,
            });
        }

        let first = FIRST_PAD_SEGMENT;
        let last = segment_count - 2;
        let mut pads = BTreeSet::new();

        while pads.len() < landing_pad_count {
            let still_needed = landing_pad_count - pads.len() - 1;
            let candidates: Vec<usize> = (first..=last)
                .filter(|&s| is_free(&pads, s))
                .filter(|&s| {
                    let mut with = pads.clone();
                    with.insert(s);
                    spare_capacity(&with, first, last) >= still_needed
                })
                .collect();

            // Unreachable for feasible counts
            if candidates.is_empty() {
                return Err(TerrainError::PadPlacement {
                    segment_count,
                    landing_pad_count,
                });
            }
            let pick = rng.next_int(0, candidates.len() as i32 - 1)? as usize;
            pads.insert(candidates[pick]);
        }

        Ok(pads)
    }

    /// Generate a full terrain
    pub fn generate(&self, rng: &mut RandomDistribution) -> Result<Terrain, TerrainError> {
        let cfg = &self.config;
        let pad_segments = self.select_pad_segments(rng)?;

        let segment_count = cfg.segment_count;
        let segment_width = cfg.segment_width();
        let step = cfg.max_height_step;

        // +1 climbs, -1 descends
        let mut sign: i32 = 1;
        let mut y = rng.next_int(cfg.start_height_min, cfg.start_height_max)? as f32;
        let mut slope = (rng.next_int(0, step)? * sign) as f32 / segment_width;

        let mut points = Vec::with_capacity(segment_count * cfg.curve_resolution + 1);
        points.push(Vec2::new(0.0, y));
        let mut segment_heights = Vec::with_capacity(segment_count + 1);
        segment_heights.push(y);
        let mut pads = Vec::with_capacity(pad_segments.len());

        for i in 0..segment_count {
            let x_start = boundary_x(i, segment_count, segment_width, cfg.playfield_width);
            let x_end = boundary_x(i + 1, segment_count, segment_width, cfg.playfield_width);
            let start = Vec2::new(x_start, y);

            if pad_segments.contains(&i) {
                points.push(Vec2::new(x_end, y));
                pads.push(LandingPad {
                    segment_index: i,
                    x_start,
                    x_end,
                    y,
                });
                // Leave the pad level
                slope = 0.0;
            } else {
                let last_slope = slope;
                slope = (rng.next_int(0, step)? * sign) as f32 / segment_width;
                y += (rng.next_int(0, step)? * sign) as f32;

                let end = Vec2::new(x_end, y);
                let half = (x_end - x_start) * 0.5;
                let control1 = Vec2::new(x_start + half, start.y + last_slope * half);
                let control2 = Vec2::new(x_end - half, end.y - slope * half);

                let resolution = cfg.curve_resolution;
                for k in 1..resolution {
                    let t = k as f32 / resolution as f32;
                    points.push(cubic_bezier(start, control1, control2, end, t));
                }
                points.push(end);
            }

            segment_heights.push(y);

            // Keep the surface on screen, otherwise change course now and then
            if y > cfg.upper_bound {
                sign = -1;
            } else if y < cfg.lower_bound {
                sign = 1;
            } else if rng.next_int(0, segment_count as i32)? == 0 {
                sign = -sign;
            }
        }

        log::info!(
            "Generated terrain: {} vertices, pads at segments {:?}",
            points.len(),
            pad_segments
        );

        Ok(Terrain {
            points,
            pads,
            segment_heights,
            segment_width,
            width: cfg.playfield_width,
            baseline: cfg.baseline,
        })
    }
}

/// Most pads that fit in `[2, segment_count - 2]` with a gap between each
pub fn max_spaced_pads(segment_count: usize) -> usize {
    if segment_count < 4 {
        return 0;
    }
    let slots = segment_count - 3;
    slots.div_ceil(2)
}

/// How many more pads fit in `[first, last]` around the ones already placed
fn spare_capacity(pads: &BTreeSet<usize>, first: usize, last: usize) -> usize {
    let mut count = 0;
    let mut previous: Option<usize> = None;
    for segment in first..=last {
        if is_free(pads, segment) && previous.is_none_or(|p| segment > p + 1) {
            count += 1;
            previous = Some(segment);
        }
    }
    count
}

fn is_free(pads: &BTreeSet<usize>, segment: usize) -> bool {
    !pads.contains(&segment)
        && !pads.contains(&(segment + 1))
        && (segment == 0 || !pads.contains(&(segment - 1)))
}

/// X of the boundary between segments `i - 1` and `i`; the last one is pinned to `width`
#[inline]
fn boundary_x(i: usize, segment_count: usize, segment_width: f32, width: f32) -> f32 {
    if i >= segment_count {
        width
    } else {
        segment_width * i as f32
    }
}

fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
