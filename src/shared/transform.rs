// This is free and unencumbered software released into the public domain.

//! Display transforms for preview surfaces.
//!
//! [`AffineTransform`] follows the platform matrix conventions: `post_*`
//! operations apply after everything already in the transform, and rotation
//! angles are clockwise in screen space (y grows downward).

use super::{Dimensions, Rotation};
use derive_more::Display;
use std::borrow::Cow;

#[derive(Clone, Copy, Debug, Default, Display, PartialEq)]
#[display("[{left}, {top}, {right}, {bottom}]")]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// `[0, 0, width, height]`.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.left < self.right && self.top < self.bottom)
    }

    pub fn offset(&mut self, dx: f32, dy: f32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    /// Moves the rectangle so its center sits at `(cx, cy)`.
    pub fn center_on(&mut self, cx: f32, cy: f32) {
        let (dx, dy) = (cx - self.center_x(), cy - self.center_y());
        self.offset(dx, dy);
    }
}

impl From<Dimensions> for Rect {
    fn from(d: Dimensions) -> Self {
        Self::from_size(d.width() as f32, d.height() as f32)
    }
}

/// A 2D affine transform.
///
/// ```text
/// | scale_x  skew_x   trans_x |
/// | skew_y   scale_y  trans_y |
/// |   0        0         1    |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub scale_x: f32,
    pub skew_x: f32,
    pub trans_x: f32,
    pub skew_y: f32,
    pub scale_y: f32,
    pub trans_y: f32,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        skew_x: 0.0,
        trans_x: 0.0,
        skew_y: 0.0,
        scale_y: 1.0,
        trans_y: 0.0,
    };

    /// Maps `src` onto `dst`, scaling each axis independently so the two
    /// rectangles coincide. Returns `None` when `src` is empty.
    pub fn rect_to_rect(src: &Rect, dst: &Rect) -> Option<Self> {
        if src.is_empty() {
            return None;
        }
        let sx = dst.width() / src.width();
        let sy = dst.height() / src.height();
        Some(Self {
            scale_x: sx,
            skew_x: 0.0,
            trans_x: dst.left - src.left * sx,
            skew_y: 0.0,
            scale_y: sy,
            trans_y: dst.top - src.top * sy,
        })
    }

    pub fn scale(sx: f32, sy: f32, px: f32, py: f32) -> Self {
        Self {
            scale_x: sx,
            skew_x: 0.0,
            trans_x: px - sx * px,
            skew_y: 0.0,
            scale_y: sy,
            trans_y: py - sy * py,
        }
    }

    /// Clockwise rotation about `(px, py)`. Quarter turns are exact.
    pub fn rotate(degrees: f32, px: f32, py: f32) -> Self {
        let (sin, cos) = sin_cos_degrees(degrees);
        Self {
            scale_x: cos,
            skew_x: -sin,
            trans_x: px - cos * px + sin * py,
            skew_y: sin,
            scale_y: cos,
            trans_y: py - sin * px - cos * py,
        }
    }

    pub fn translate(dx: f32, dy: f32) -> Self {
        Self {
            trans_x: dx,
            trans_y: dy,
            ..Self::IDENTITY
        }
    }

    /// Applies `other` after `self`.
    pub fn post_concat(&mut self, other: &Self) -> &mut Self {
        let (a, b) = (other, *self);
        *self = Self {
            scale_x: a.scale_x * b.scale_x + a.skew_x * b.skew_y,
            skew_x: a.scale_x * b.skew_x + a.skew_x * b.scale_y,
            trans_x: a.scale_x * b.trans_x + a.skew_x * b.trans_y + a.trans_x,
            skew_y: a.skew_y * b.scale_x + a.scale_y * b.skew_y,
            scale_y: a.skew_y * b.skew_x + a.scale_y * b.scale_y,
            trans_y: a.skew_y * b.trans_x + a.scale_y * b.trans_y + a.trans_y,
        };
        self
    }

    pub fn post_scale(&mut self, sx: f32, sy: f32, px: f32, py: f32) -> &mut Self {
        self.post_concat(&Self::scale(sx, sy, px, py))
    }

    pub fn post_rotate(&mut self, degrees: f32, px: f32, py: f32) -> &mut Self {
        self.post_concat(&Self::rotate(degrees, px, py))
    }

    pub fn post_translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.post_concat(&Self::translate(dx, dy))
    }

    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.scale_x * x + self.skew_x * y + self.trans_x,
            self.skew_y * x + self.scale_y * y + self.trans_y,
        )
    }

    /// Bounding box of the four mapped corners.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.map_point(rect.left, rect.top),
            self.map_point(rect.right, rect.top),
            self.map_point(rect.right, rect.bottom),
            self.map_point(rect.left, rect.bottom),
        ];
        corners.iter().skip(1).fold(
            Rect::new(corners[0].0, corners[0].1, corners[0].0, corners[0].1),
            |r, &(x, y)| Rect::new(r.left.min(x), r.top.min(y), r.right.max(x), r.bottom.max(y)),
        )
    }

    /// Rotation component in degrees, within (-180, 180].
    ///
    /// Assumes the transform carries no shear, which holds for everything
    /// built from scales, quarter-turn rotations and translations.
    pub fn rotation_degrees(&self) -> f32 {
        let degrees = self.skew_y.atan2(self.scale_x).to_degrees();
        if degrees <= -180.0 { degrees + 360.0 } else { degrees }
    }

    /// Length of the transformed x axis.
    pub fn axis_scale_x(&self) -> f32 {
        self.scale_x.hypot(self.skew_y)
    }

    /// Length of the transformed y axis.
    pub fn axis_scale_y(&self) -> f32 {
        self.skew_x.hypot(self.scale_y)
    }

    #[inline]
    pub fn translation(&self) -> (f32, f32) {
        (self.trans_x, self.trans_y)
    }

    /// Row-major `[scale_x, skew_x, trans_x, skew_y, scale_y, trans_y]`.
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.scale_x,
            self.skew_x,
            self.trans_x,
            self.skew_y,
            self.scale_y,
            self.trans_y,
        ]
    }
}

fn sin_cos_degrees(degrees: f32) -> (f32, f32) {
    let turned = degrees.rem_euclid(360.0);
    if turned == 0.0 {
        (0.0, 1.0)
    } else if turned == 90.0 {
        (1.0, 0.0)
    } else if turned == 180.0 {
        (0.0, -1.0)
    } else if turned == 270.0 {
        (-1.0, 0.0)
    } else {
        degrees.to_radians().sin_cos()
    }
}

/// How ROT_0 and ROT_180 are handled.
///
/// Both modes agree at ROT_90 and ROT_270.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransformMode {
    /// A uniform cover scale at every rotation. The image keeps its aspect
    /// ratio and overflow is cropped.
    #[default]
    Unified,
    /// At ROT_0 and ROT_180 the transposed buffer is stretched onto the
    /// viewport with independent X and Y factors, then rotated by the
    /// display rotation.
    Legacy,
}

impl dogma::Named for TransformMode {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Unified => "unified".into(),
            Self::Legacy => "legacy".into(),
        }
    }
}

/// Builds the surface transform for `buffer_size` shown in `viewport` at
/// `rotation`, using [`TransformMode::Unified`].
pub fn build_preview_transform(
    buffer_size: Dimensions,
    viewport: Dimensions,
    rotation: Rotation,
) -> AffineTransform {
    build_preview_transform_with(TransformMode::default(), buffer_size, viewport, rotation)
}

pub fn build_preview_transform_with(
    mode: TransformMode,
    buffer_size: Dimensions,
    viewport: Dimensions,
    rotation: Rotation,
) -> AffineTransform {
    let view_rect = Rect::from(viewport);
    // Buffer sizes are sensor-native; the surface sees them transposed.
    let mut buffer_rect = Rect::from(buffer_size.transposed());
    let (cx, cy) = (view_rect.center_x(), view_rect.center_y());

    let (vw, vh) = (viewport.width() as f32, viewport.height() as f32);
    let (bw, bh) = (buffer_size.width() as f32, buffer_size.height() as f32);

    if mode == TransformMode::Legacy && !rotation.is_quarter_turn() {
        let mut matrix =
            AffineTransform::rect_to_rect(&buffer_rect, &view_rect).unwrap_or_default();
        matrix.post_rotate(rotation.degrees() as f32, cx, cy);
        return matrix;
    }

    buffer_rect.center_on(cx, cy);
    let mut matrix = AffineTransform::rect_to_rect(&view_rect, &buffer_rect).unwrap_or_default();

    // Extent of the buffer once rotated upright for this display.
    let (ew, eh) = if rotation.is_quarter_turn() {
        (bw, bh)
    } else {
        (bh, bw)
    };
    let scale = (vw / ew).max(vh / eh);
    matrix.post_scale(scale, scale, cx, cy);
    matrix.post_rotate(counter_rotation_degrees(rotation), cx, cy);
    matrix
}

/// `-90 * index`, normalized into (-180, 180].
fn counter_rotation_degrees(rotation: Rotation) -> f32 {
    match rotation {
        Rotation::Rot0 => 0.0,
        Rotation::Rot90 => -90.0,
        Rotation::Rot180 => 180.0,
        Rotation::Rot270 => 90.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h).unwrap()
    }

    fn assert_point(actual: (f32, f32), expected: (f32, f32)) {
        assert_relative_eq!(actual.0, expected.0, epsilon = 1e-3);
        assert_relative_eq!(actual.1, expected.1, epsilon = 1e-3);
    }

    #[test]
    fn identity_maps_points_unchanged() {
        assert_point(AffineTransform::IDENTITY.map_point(3.0, -7.5), (3.0, -7.5));
        assert_eq!(AffineTransform::default(), AffineTransform::IDENTITY);
    }

    #[test]
    fn rect_to_rect_fill() {
        let src = Rect::from_size(100.0, 50.0);
        let dst = Rect::new(10.0, 20.0, 60.0, 220.0);
        let m = AffineTransform::rect_to_rect(&src, &dst).unwrap();
        assert_point(m.map_point(0.0, 0.0), (10.0, 20.0));
        assert_point(m.map_point(100.0, 50.0), (60.0, 220.0));
        assert_relative_eq!(m.scale_x, 0.5);
        assert_relative_eq!(m.scale_y, 4.0);
        assert!(AffineTransform::rect_to_rect(&Rect::from_size(0.0, 5.0), &dst).is_none());
    }

    #[test]
    fn quarter_turn_rotation_is_exact() {
        let m = AffineTransform::rotate(90.0, 0.0, 0.0);
        assert_eq!(m.map_point(1.0, 0.0), (0.0, 1.0));
        let m = AffineTransform::rotate(-90.0, 0.0, 0.0);
        assert_eq!(m.map_point(1.0, 0.0), (0.0, -1.0));
        assert_relative_eq!(m.rotation_degrees(), -90.0, epsilon = 1e-4);
        let half = AffineTransform::rotate(180.0, 0.0, 0.0);
        assert_relative_eq!(half.rotation_degrees(), 180.0, epsilon = 1e-4);
    }

    #[test]
    fn rotation_about_pivot() {
        let m = AffineTransform::rotate(90.0, 10.0, 10.0);
        assert_point(m.map_point(10.0, 10.0), (10.0, 10.0));
        assert_point(m.map_point(20.0, 10.0), (10.0, 20.0));
        let m = AffineTransform::rotate(45.0, 0.0, 0.0);
        assert_relative_eq!(m.rotation_degrees(), 45.0, epsilon = 1e-4);
    }

    #[test]
    fn post_operations_apply_in_order() {
        let mut m = AffineTransform::IDENTITY;
        m.post_translate(5.0, 0.0).post_scale(2.0, 2.0, 0.0, 0.0);
        // translate first, then scale: (1,1) -> (6,1) -> (12,2)
        assert_point(m.map_point(1.0, 1.0), (12.0, 2.0));

        let mut m = AffineTransform::IDENTITY;
        m.post_scale(2.0, 2.0, 0.0, 0.0).post_translate(5.0, 0.0);
        assert_point(m.map_point(1.0, 1.0), (7.0, 2.0));
    }

    #[test]
    fn map_rect_bounds_rotated_corners() {
        let m = AffineTransform::rotate(90.0, 0.0, 0.0);
        let r = m.map_rect(&Rect::from_size(4.0, 2.0));
        assert_relative_eq!(r.left, -2.0);
        assert_relative_eq!(r.right, 0.0);
        assert_relative_eq!(r.top, 0.0);
        assert_relative_eq!(r.bottom, 4.0);
    }

    #[test]
    fn rot90_counter_rotates_by_minus_90() {
        for mode in [TransformMode::Unified, TransformMode::Legacy] {
            let m = build_preview_transform_with(mode, d(1920, 1080), d(1080, 1920), Rotation::Rot90);
            assert_relative_eq!(m.rotation_degrees(), -90.0, epsilon = 1e-4);
        }
        let m = build_preview_transform(d(1920, 1080), d(1920, 1080), Rotation::Rot270);
        assert_relative_eq!(m.rotation_degrees(), 90.0, epsilon = 1e-4);
    }

    #[test]
    fn legacy_rot0_stretches_per_axis() {
        let m = build_preview_transform_with(
            TransformMode::Legacy,
            d(1920, 1080),
            d(1920, 1080),
            Rotation::Rot0,
        );
        assert_relative_eq!(m.rotation_degrees(), 0.0);
        assert_relative_eq!(m.axis_scale_x(), 1920.0 / 1080.0, max_relative = 1e-6);
        assert_relative_eq!(m.axis_scale_y(), 1080.0 / 1920.0, max_relative = 1e-6);
        assert_point(m.translation(), (0.0, 0.0));
    }

    #[test]
    fn legacy_rot180_flips_about_center() {
        let m = build_preview_transform_with(
            TransformMode::Legacy,
            d(1920, 1080),
            d(1080, 1920),
            Rotation::Rot180,
        );
        assert_relative_eq!(m.rotation_degrees(), 180.0, epsilon = 1e-4);
        assert_point(m.map_point(0.0, 0.0), (1080.0, 1920.0));
        assert_point(m.map_point(540.0, 960.0), (540.0, 960.0));
    }

    #[test]
    fn quarter_turns_keep_center_fixed() {
        let viewports = [d(1080, 1920), d(1920, 1080), d(720, 720), d(2400, 1080)];
        for mode in [TransformMode::Unified, TransformMode::Legacy] {
            for rotation in [Rotation::Rot90, Rotation::Rot270] {
                for viewport in viewports {
                    let m = build_preview_transform_with(mode, d(1440, 1080), viewport, rotation);
                    let (cx, cy) = (viewport.width() as f32 / 2.0, viewport.height() as f32 / 2.0);
                    assert_point(m.map_point(cx, cy), (cx, cy));
                }
            }
        }
    }

    #[test]
    fn unified_matching_portrait_is_identity() {
        let m = build_preview_transform(d(1920, 1080), d(1080, 1920), Rotation::Rot0);
        for (a, b) in m.to_array().iter().zip(AffineTransform::IDENTITY.to_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-4);
        }
    }

    #[test]
    fn unified_covers_viewport_without_distortion() {
        let buffer = d(1920, 1080);
        for rotation in Rotation::ALL {
            for viewport in [d(1920, 1080), d(1080, 1920), d(1000, 1000), d(1080, 2400)] {
                let m = build_preview_transform(buffer, viewport, rotation);
                let view = Rect::from(viewport);
                let shown = m.map_rect(&view);

                assert!(shown.left <= 0.01 && shown.top <= 0.01, "{rotation} {viewport} {shown}");
                assert!(shown.right >= view.right - 0.01, "{rotation} {viewport} {shown}");
                assert!(shown.bottom >= view.bottom - 0.01, "{rotation} {viewport} {shown}");

                // Upright content keeps the sensor's aspect ratio.
                let upright = if rotation.is_quarter_turn() {
                    buffer.aspect() as f32
                } else {
                    buffer.transposed().aspect() as f32
                };
                assert_relative_eq!(shown.width() / shown.height(), upright, max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn identical_inputs_identical_output() {
        for rotation in Rotation::ALL {
            let a = build_preview_transform(d(4000, 3000), d(1080, 2340), rotation);
            let b = build_preview_transform(d(4000, 3000), d(1080, 2340), rotation);
            assert_eq!(a, b);
        }
    }
}
