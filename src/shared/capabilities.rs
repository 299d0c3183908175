// This is free and unencumbered software released into the public domain.

//! Hardware capability data.
//!
//! Capabilities are queried from the platform once per bind and then passed
//! around as plain values; nothing here talks to a live device.

use super::{PreviewError, PreviewResult, SensorOrientation, SizeCandidates};
use derive_more::Display;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum LensFacing {
    #[display("front")]
    Front,
    #[display("back")]
    Back,
}

/// Zoom ratios a lens supports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomRange {
    min: f32,
    max: f32,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 1.0, max: 1.0 }
    }
}

impl ZoomRange {
    pub fn new(min: f32, max: f32) -> PreviewResult<Self> {
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(PreviewError::invalid_config(format!(
                "zoom range {min}..{max} is not a positive ascending interval"
            )));
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn clamp(&self, ratio: f32) -> f32 {
        if ratio.is_nan() {
            return self.min;
        }
        ratio.clamp(self.min, self.max)
    }

    /// Maps linear zoom in `[0, 1]` to a ratio. Linear zoom is linear in
    /// field of view, so it interpolates the inverse ratio.
    pub fn ratio_for_linear(&self, linear: f32) -> f32 {
        let linear = if linear.is_nan() { 0.0 } else { linear.clamp(0.0, 1.0) };
        if linear == 0.0 || self.min == self.max {
            return self.min;
        }
        if linear == 1.0 {
            return self.max;
        }
        let (inv_min, inv_max) = (1.0 / self.min, 1.0 / self.max);
        1.0 / (inv_min + (inv_max - inv_min) * linear)
    }

    pub fn linear_for_ratio(&self, ratio: f32) -> f32 {
        if self.min == self.max {
            return 0.0;
        }
        let ratio = self.clamp(ratio);
        let (inv_min, inv_max) = (1.0 / self.min, 1.0 / self.max);
        ((1.0 / ratio - inv_min) / (inv_max - inv_min)).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LensCapabilities {
    pub id: String,
    pub facing: LensFacing,
    pub sensor_orientation: SensorOrientation,
    pub has_flash: bool,
    pub zoom: ZoomRange,
    pub preview_sizes: SizeCandidates,
}

impl LensCapabilities {
    pub fn new(
        id: impl Into<String>,
        facing: LensFacing,
        sensor_orientation: SensorOrientation,
        preview_sizes: SizeCandidates,
    ) -> Self {
        Self {
            id: id.into(),
            facing,
            sensor_orientation,
            has_flash: false,
            zoom: ZoomRange::default(),
            preview_sizes,
        }
    }

    pub fn with_flash(mut self, has_flash: bool) -> Self {
        self.has_flash = has_flash;
        self
    }

    pub fn with_zoom(mut self, zoom: ZoomRange) -> Self {
        self.zoom = zoom;
        self
    }
}

/// The lenses a device exposes, in platform order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraCapabilities {
    lenses: Vec<LensCapabilities>,
}

impl CameraCapabilities {
    pub fn new(lenses: impl IntoIterator<Item = LensCapabilities>) -> Self {
        Self {
            lenses: lenses.into_iter().collect(),
        }
    }

    #[inline]
    pub fn camera_count(&self) -> usize {
        self.lenses.len()
    }

    pub fn lenses(&self) -> &[LensCapabilities] {
        &self.lenses
    }

    pub fn lens(&self, index: usize) -> Option<&LensCapabilities> {
        self.lenses.get(index)
    }

    /// Index of the first lens facing `facing`.
    pub fn find(&self, facing: LensFacing) -> Option<usize> {
        self.lenses.iter().position(|l| l.facing == facing)
    }

    /// Picks the lens to bind: the front one when preferred and present,
    /// otherwise back, otherwise front.
    pub fn select(&self, prefer_front: bool) -> PreviewResult<usize> {
        let front = self.find(LensFacing::Front);
        let back = self.find(LensFacing::Back);
        match (prefer_front, front, back) {
            (true, Some(index), _) => Ok(index),
            (_, _, Some(index)) => Ok(index),
            (_, Some(index), None) => Ok(index),
            (_, None, None) => Err(PreviewError::NoCamera),
        }
    }
}
