// This is free and unencumbered software released into the public domain.

use crate::shared::{
    AspectRatio, Dimensions, FlashMode, PreviewError, PreviewResult, Rotation, SizePolicy,
    TransformMode,
};

/// Largest preview output the platform guarantees to support, in landscape
/// display orientation.
pub const MAX_PREVIEW_SIZE: Dimensions = Dimensions::new_const(1920, 1080);

#[derive(Clone, Debug)]
pub struct ControllerConfig {
    pub prefer_front: bool,
    pub tap_to_focus: bool,
    pub pinch_zoom: bool,
    pub flash_mode: FlashMode,
    pub rotation: Rotation,
    pub size_policy: SizePolicy,
    pub transform_mode: TransformMode,
    pub event_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            prefer_front: true,
            tap_to_focus: false,
            pinch_zoom: false,
            flash_mode: FlashMode::Off,
            rotation: Rotation::Rot0,
            size_policy: SizePolicy::ClosestAspect,
            transform_mode: TransformMode::Unified,
            event_capacity: 32,
        }
    }
}

impl ControllerConfig {
    pub fn new(prefer_front: bool) -> Self {
        Self {
            prefer_front,
            ..Default::default()
        }
    }

    pub fn with_tap_to_focus(mut self, enabled: bool) -> Self {
        self.tap_to_focus = enabled;
        self
    }

    pub fn with_pinch_zoom(mut self, enabled: bool) -> Self {
        self.pinch_zoom = enabled;
        self
    }

    pub fn with_flash_mode(mut self, mode: FlashMode) -> Self {
        self.flash_mode = mode;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.size_policy = policy;
        self
    }

    /// Selects the bounded policy capped at [`MAX_PREVIEW_SIZE`].
    pub fn with_bounded_preview(self) -> Self {
        self.with_size_policy(SizePolicy::Bounded {
            max: MAX_PREVIEW_SIZE,
        })
    }

    /// Shapes the preview as a fixed 4:3 or 16:9 frame inside the viewport.
    pub fn with_target_aspect(self, ratio: AspectRatio) -> Self {
        self.with_size_policy(SizePolicy::FixedAspect(ratio))
    }

    pub fn with_transform_mode(mut self, mode: TransformMode) -> Self {
        self.transform_mode = mode;
        self
    }

    pub fn with_event_capacity(mut self, n: usize) -> Self {
        self.event_capacity = n.max(1);
        self
    }

    pub fn validate(&self) -> PreviewResult<()> {
        if self.event_capacity == 0 {
            return Err(PreviewError::invalid_config("event capacity must be at least 1"));
        }
        Ok(())
    }
}
