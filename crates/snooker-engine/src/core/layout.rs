//! Initial ball arrangements.
//!
//! Pure functions of the table geometry and a random source. Nothing here
//! touches the registry; the game maps the returned positions onto balls.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::ball::BallRole;
use crate::core::table::TableGeometry;

/// Number of reds in a full rack.
pub const RED_COUNT: usize = 15;

/// Attempts per ball before a random position is accepted even if it overlaps.
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// How balls are arranged when a frame starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Reds in the triangle, colors and cue on their spots.
    #[default]
    Standard,
    /// Reds scattered, colors and cue on their spots.
    RandomReds,
    /// Reds and colors scattered, cue on its spot.
    RandomAll,
}

impl LayoutMode {
    /// Mode selected by the number keys 1, 2 and 3.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            1 => Some(LayoutMode::Standard),
            2 => Some(LayoutMode::RandomReds),
            3 => Some(LayoutMode::RandomAll),
            _ => None,
        }
    }

    /// Inverse of [`LayoutMode::from_index`].
    pub fn index(self) -> u32 {
        match self {
            LayoutMode::Standard => 1,
            LayoutMode::RandomReds => 2,
            LayoutMode::RandomAll => 3,
        }
    }
}

/// Positions for every ball of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub reds: Vec<Vec2>,
    /// One entry per color, in ascending value order.
    pub colors: Vec<(BallRole, Vec2)>,
    pub cue: Vec2,
}

/// Red triangle with the apex pointing at the cue ball (left), rows spreading right.
///
/// ```text
///  0             <- apex, row 0
///  1  2          <- row 1
///  3  4  5       <- row 2
///  6  7  8  9    <- row 3
/// 10 11 12 13 14 <- row 4
/// ```
pub fn red_triangle(apex: Vec2, ball_radius: f32) -> [Vec2; RED_COUNT] {
    // Tight rack with a hairline gap.
    let gap = ball_radius * 2.0 + 1.0;
    let row_offset = gap * 0.866; // sqrt(3)/2 for an equilateral triangle

    let mut positions = [Vec2::ZERO; RED_COUNT];
    let mut i = 0;
    for row in 0..5 {
        for col in 0..=row {
            let x = apex.x + row as f32 * row_offset;
            let y = apex.y + (col as f32 - row as f32 / 2.0) * gap;
            positions[i] = Vec2::new(x, y);
            i += 1;
        }
    }
    positions
}

/// Fully standard frame: triangle of reds, colors and cue on their spots.
pub fn standard_layout(geometry: &TableGeometry) -> Layout {
    Layout {
        reds: red_triangle(geometry.rack_apex(), geometry.ball_radius).to_vec(),
        colors: standard_colors(geometry),
        cue: geometry.spot(BallRole::Cue),
    }
}

/// `count` positions sampled uniformly inside the table, keeping one ball
/// radius clear of every edge.
pub fn random_reds<R: Rng + ?Sized>(
    geometry: &TableGeometry,
    count: usize,
    rng: &mut R,
) -> Vec<Vec2> {
    let mut placed = Vec::with_capacity(count);
    for _ in 0..count {
        let pos = sample_clear(geometry, &placed, rng);
        placed.push(pos);
    }
    placed
}

/// Random positions for the six colors, plus the cue when `include_cue`.
/// When the cue is excluded it sits on its standard spot, and the colors
/// keep clear of it.
pub fn random_colors<R: Rng + ?Sized>(
    geometry: &TableGeometry,
    include_cue: bool,
    rng: &mut R,
) -> (Vec<(BallRole, Vec2)>, Vec2) {
    let mut taken = Vec::with_capacity(BallRole::COLORS.len() + 1);
    let cue = if include_cue {
        sample_clear(geometry, &taken, rng)
    } else {
        geometry.spot(BallRole::Cue)
    };
    taken.push(cue);

    let mut colors = Vec::with_capacity(BallRole::COLORS.len());
    for role in BallRole::COLORS {
        let pos = sample_clear(geometry, &taken, rng);
        taken.push(pos);
        colors.push((role, pos));
    }
    (colors, cue)
}

/// Build the layout for a mode.
pub fn arrange<R: Rng + ?Sized>(mode: LayoutMode, geometry: &TableGeometry, rng: &mut R) -> Layout {
    match mode {
        LayoutMode::Standard => standard_layout(geometry),
        LayoutMode::RandomReds => {
            let colors = standard_colors(geometry);
            let cue = geometry.spot(BallRole::Cue);
            let mut taken: Vec<Vec2> = colors.iter().map(|&(_, p)| p).collect();
            taken.push(cue);
            let reds = random_reds_avoiding(geometry, RED_COUNT, &taken, rng);
            Layout { reds, colors, cue }
        }
        LayoutMode::RandomAll => {
            let (colors, cue) = random_colors(geometry, false, rng);
            let mut taken: Vec<Vec2> = colors.iter().map(|&(_, p)| p).collect();
            taken.push(cue);
            let reds = random_reds_avoiding(geometry, RED_COUNT, &taken, rng);
            Layout { reds, colors, cue }
        }
    }
}

fn standard_colors(geometry: &TableGeometry) -> Vec<(BallRole, Vec2)> {
    BallRole::COLORS
        .iter()
        .map(|&role| (role, geometry.spot(role)))
        .collect()
}

fn random_reds_avoiding<R: Rng + ?Sized>(
    geometry: &TableGeometry,
    count: usize,
    avoid: &[Vec2],
    rng: &mut R,
) -> Vec<Vec2> {
    let mut taken = avoid.to_vec();
    let mut reds = Vec::with_capacity(count);
    for _ in 0..count {
        let pos = sample_clear(geometry, &taken, rng);
        taken.push(pos);
        reds.push(pos);
    }
    reds
}

/// Uniform sample inside the inner bounds, retried while it overlaps a taken spot.
fn sample_clear<R: Rng + ?Sized>(geometry: &TableGeometry, taken: &[Vec2], rng: &mut R) -> Vec2 {
    let (min, max) = geometry.inner_bounds(geometry.ball_radius);
    let min_dist = geometry.ball_radius * 2.0;
    let mut pos = min;
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        pos = Vec2::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));
        if taken.iter().all(|t| t.distance(pos) >= min_dist) {
            return pos;
        }
    }
    log::debug!("no clear spot after {} attempts, accepting overlap", MAX_PLACEMENT_ATTEMPTS);
    pos
}
