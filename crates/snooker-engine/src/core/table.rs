//! Table geometry: dimensions, spots, the "D", pockets and cushions.
//!
//! Everything is derived from the table width and offsets, so the whole table
//! scales with a single number. The table is twice as wide as it is tall; the
//! baulk line sits a quarter of the way along and the "D" opens to the left.

use glam::Vec2;

use crate::api::config::SnookerConfig;
use crate::core::ball::BallRole;

/// Cushion thickness in world units.
const CUSHION: f32 = 10.0;

/// Black spot position as a fraction of the table width.
const BLACK_SPOT_FRAC: f32 = 10.0 / 11.0;

/// An axis-aligned rectangle given by center and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Immutable table dimensions. Built once per game.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGeometry {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// X coordinate of the baulk line.
    pub baulk_x: f32,
    /// Radius of the "D" semicircle.
    pub d_radius: f32,
    pub ball_radius: f32,
    pub pocket_radius: f32,
    /// Radius of the sensor that detects a pot, centered on each pocket.
    pub pocket_sensor_radius: f32,
    pub cushion: f32,
    /// Corner pockets first (TL, TR, BL, BR), then the middle pockets (top, bottom).
    pub pockets: [Vec2; 6],
}

impl TableGeometry {
    pub fn new(width: f32, offset_x: f32, offset_y: f32) -> Self {
        let height = width / 2.0;
        let ball_radius = width / 72.0;
        let pocket_radius = ball_radius * 1.5;
        let left = offset_x;
        let right = offset_x + width;
        let top = offset_y;
        let bottom = offset_y + height;
        let mid_x = offset_x + width / 2.0;
        let inset = pocket_radius * 0.5;

        Self {
            width,
            height,
            offset_x,
            offset_y,
            baulk_x: offset_x + width / 4.0,
            d_radius: width * 0.1,
            ball_radius,
            pocket_radius,
            pocket_sensor_radius: pocket_radius * 0.5,
            cushion: CUSHION,
            pockets: [
                Vec2::new(left + inset, top + inset),
                Vec2::new(right - inset, top + inset),
                Vec2::new(left + inset, bottom - inset),
                Vec2::new(right - inset, bottom - inset),
                Vec2::new(mid_x, top),
                Vec2::new(mid_x, bottom),
            ],
        }
    }

    pub fn from_config(config: &SnookerConfig) -> Self {
        Self::new(config.table_width, config.table_offset_x, config.table_offset_y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.offset_x + self.width / 2.0,
            self.offset_y + self.height / 2.0,
        )
    }

    /// Standard spot for a role. Reds have no spot of their own; the apex of
    /// the triangle is returned for them.
    pub fn spot(&self, role: BallRole) -> Vec2 {
        let c = self.center();
        match role {
            BallRole::Yellow => Vec2::new(self.baulk_x, c.y + self.d_radius),
            BallRole::Green => Vec2::new(self.baulk_x, c.y - self.d_radius),
            BallRole::Brown => Vec2::new(self.baulk_x, c.y),
            BallRole::Blue => c,
            BallRole::Pink => Vec2::new(self.offset_x + self.width * 0.75, c.y),
            BallRole::Black => Vec2::new(self.offset_x + self.width * BLACK_SPOT_FRAC, c.y),
            BallRole::Cue => Vec2::new(self.baulk_x - self.d_radius / 2.0, c.y),
            BallRole::Red => self.rack_apex(),
        }
    }

    /// Front ball of the red triangle, just behind the pink.
    pub fn rack_apex(&self) -> Vec2 {
        self.spot(BallRole::Pink) + Vec2::new(self.ball_radius * 2.0 + 1.0, 0.0)
    }

    /// True if `pos` is inside the "D": within the semicircle around the
    /// middle of the baulk line, on the baulk side.
    pub fn in_d(&self, pos: Vec2) -> bool {
        let d_center = Vec2::new(self.baulk_x, self.center().y);
        pos.x <= self.baulk_x && pos.distance(d_center) <= self.d_radius
    }

    /// True if `pos` is on the playing surface.
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.offset_x
            && pos.x <= self.offset_x + self.width
            && pos.y >= self.offset_y
            && pos.y <= self.offset_y + self.height
    }

    /// Corners (min, max) of the surface shrunk by `margin` on every edge.
    pub fn inner_bounds(&self, margin: f32) -> (Vec2, Vec2) {
        (
            Vec2::new(self.offset_x + margin, self.offset_y + margin),
            Vec2::new(
                self.offset_x + self.width - margin,
                self.offset_y + self.height - margin,
            ),
        )
    }

    /// Six cushion segments with gaps for the pockets: top-left, top-right,
    /// bottom-left, bottom-right, left, right.
    pub fn cushion_rects(&self) -> [Rect; 6] {
        let gap = self.pocket_radius * 2.0;
        let half_t = self.cushion / 2.0;
        let seg_w = self.width / 2.0 - gap * 1.5;
        let side_h = self.height - gap * 2.0;
        let top_y = self.offset_y + half_t;
        let bottom_y = self.offset_y + self.height - half_t;
        let left_x = self.offset_x + gap + seg_w / 2.0;
        let right_x = self.offset_x + self.width - gap - seg_w / 2.0;
        let horizontal = Vec2::new(seg_w / 2.0, half_t);
        let vertical = Vec2::new(half_t, side_h / 2.0);
        let mid_y = self.center().y;

        [
            Rect { center: Vec2::new(left_x, top_y), half_extents: horizontal },
            Rect { center: Vec2::new(right_x, top_y), half_extents: horizontal },
            Rect { center: Vec2::new(left_x, bottom_y), half_extents: horizontal },
            Rect { center: Vec2::new(right_x, bottom_y), half_extents: horizontal },
            Rect { center: Vec2::new(self.offset_x + half_t, mid_y), half_extents: vertical },
            Rect {
                center: Vec2::new(self.offset_x + self.width - half_t, mid_y),
                half_extents: vertical,
            },
        ]
    }
}

impl Default for TableGeometry {
    fn default() -> Self {
        Self::from_config(&SnookerConfig::default())
    }
}
