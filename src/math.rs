//! Angle and rectangle helpers
//!
//! Headings are radians in the atan2 convention (0 = +x, counter-clockwise
//! positive). The screen convention (degrees, 0 = up, clockwise positive) is
//! only produced by [`rad_to_screen_angle`] for presentation.

use std::f32::consts::PI;

use glam::Vec2;

/// Bound `val` to `[min, max]`
#[inline]
pub fn clamp(val: f32, min: f32, max: f32) -> f32 {
    if val < min {
        min
    } else if val > max {
        max
    } else {
        val
    }
}

/// Fold `val` back into `[min, max)` by whole multiples of the range width.
///
/// Closed form, so values arbitrarily far outside the range cost the same as
/// values just outside it. NaN, infinities and empty ranges fold to `min`.
#[inline]
pub fn wrap_range(val: f32, min: f32, max: f32) -> f32 {
    let width = max - min;
    if !val.is_finite() || width.is_nan() || width <= 0.0 {
        return min;
    }
    let folded = (val - min).rem_euclid(width) + min;
    // rem_euclid can round up to exactly `width` for tiny negative inputs
    if folded >= max { min } else { folded }
}

/// Shortest signed distance from `from` to `to` on an axis that wraps at `size`
#[inline]
pub fn wrap_delta(from: f32, to: f32, size: f32) -> f32 {
    wrap_range(to - from, -size / 2.0, size / 2.0)
}

/// Radians to degrees
#[inline]
pub fn rad_to_deg(rad: f32) -> f32 {
    rad * 180.0 / PI
}

/// Radians (atan2 convention) to screen degrees: 0 = up, clockwise positive
#[inline]
pub fn rad_to_screen_angle(rad: f32) -> f32 {
    -(rad_to_deg(rad) - 90.0)
}

/// Heading from `src` to `dst`. Returns 0.0 when the points coincide.
#[inline]
pub fn destination_angle(src_x: f32, src_y: f32, dst_x: f32, dst_y: f32) -> f32 {
    let dx = dst_x - src_x;
    let dy = dst_y - src_y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dy.atan2(dx)
}

/// Shorter turn direction from heading `angle` toward the point `dst`:
/// +1 counter-clockwise, -1 clockwise, 0 when already facing it.
/// A target exactly behind turns counter-clockwise.
pub fn rotation_direction(angle: f32, src_x: f32, src_y: f32, dst_x: f32, dst_y: f32) -> i32 {
    let dest = destination_angle(src_x, src_y, dst_x, dst_y);
    let diff = wrap_range(dest - angle, -PI, PI);
    if diff == 0.0 {
        0
    } else if diff > 0.0 || diff == -PI {
        1
    } else {
        -1
    }
}

/// `count` angles spread symmetrically around `center`, `spacing` apart,
/// leftmost (most negative offset) first.
///
/// Odd counts put the middle angle exactly on `center`; even counts straddle it.
pub fn n_way_angles(count: usize, center: f32, spacing: f32) -> impl Iterator<Item = f32> {
    let mid = (count as f32 - 1.0) / 2.0;
    (0..count).map(move |i| center + (i as f32 - mid) * spacing)
}

/// Axis-aligned rectangle, origin at the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }
}

/// Whether `point` lies inside `rect` (edges inclusive)
#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    point.x >= rect.x && point.x <= rect.max_x() && point.y >= rect.y && point.y <= rect.max_y()
}

/// Rectangle of size `w` x `h` centered on `center`
#[inline]
pub fn rect_from_center(center: Vec2, w: f32, h: f32) -> Rect {
    Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
}
