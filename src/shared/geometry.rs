// This is free and unencumbered software released into the public domain.

use super::{
    AffineTransform, Dimensions, Rotation, SensorOrientation, SizeCandidates, SizePolicy,
    TransformMode, build_preview_transform_with, is_sensor_rotated, select_with_policy,
};

/// Everything a host needs to configure and present a preview surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewGeometry {
    /// Sensor-native size to configure the preview output with.
    pub buffer_size: Dimensions,
    pub viewport: Dimensions,
    pub rotation: Rotation,
    pub sensor_rotated: bool,
    pub transform: AffineTransform,
}

/// Resolves size and transform for a surface of `viewport` pixels shown at
/// `rotation`, given what the active camera can output.
pub fn resolve_preview_geometry(
    candidates: &SizeCandidates,
    sensor: SensorOrientation,
    viewport: Dimensions,
    rotation: Rotation,
    policy: SizePolicy,
    mode: TransformMode,
) -> PreviewGeometry {
    let sensor_rotated = is_sensor_rotated(sensor, rotation);
    let buffer_size = select_with_policy(policy, candidates, viewport, sensor_rotated);
    let transform = build_preview_transform_with(mode, buffer_size, viewport, rotation);

    #[cfg(feature = "tracing")]
    asimov_module::tracing::debug!(
        target: "camera_preview",
        %viewport, %rotation, %sensor, sensor_rotated, %buffer_size,
        "resolved preview geometry"
    );

    PreviewGeometry {
        buffer_size,
        viewport,
        rotation,
        sensor_rotated,
        transform,
    }
}
