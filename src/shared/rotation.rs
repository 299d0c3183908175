// This is free and unencumbered software released into the public domain.

use super::{PreviewError, PreviewResult};
use derive_more::Display;

/// Display rotation relative to the device's natural orientation.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    #[display("0")]
    Rot0,
    #[display("90")]
    Rot90,
    #[display("180")]
    Rot180,
    #[display("270")]
    Rot270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Self::Rot0, Self::Rot90, Self::Rot180, Self::Rot270];

    /// From the platform's surface rotation index (0..=3).
    pub fn from_index(index: i32) -> PreviewResult<Self> {
        match index {
            0 => Ok(Self::Rot0),
            1 => Ok(Self::Rot90),
            2 => Ok(Self::Rot180),
            3 => Ok(Self::Rot270),
            _ => Err(PreviewError::InvalidRotation(index)),
        }
    }

    pub fn from_degrees(degrees: i32) -> PreviewResult<Self> {
        match degrees {
            0 => Ok(Self::Rot0),
            90 => Ok(Self::Rot90),
            180 => Ok(Self::Rot180),
            270 => Ok(Self::Rot270),
            _ => Err(PreviewError::InvalidRotation(degrees)),
        }
    }

    /// Number of clockwise quarter turns, 0..=3.
    #[inline]
    pub fn index(&self) -> i32 {
        match self {
            Self::Rot0 => 0,
            Self::Rot90 => 1,
            Self::Rot180 => 2,
            Self::Rot270 => 3,
        }
    }

    #[inline]
    pub fn degrees(&self) -> i32 {
        self.index() * 90
    }

    /// Landscape rotations swap the natural width and height.
    #[inline]
    pub fn is_quarter_turn(&self) -> bool {
        matches!(self, Self::Rot90 | Self::Rot270)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = PreviewError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
    }
}

/// Mounting angle of a physical sensor, in degrees.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
#[display("{_0}")]
pub struct SensorOrientation(i32);

impl SensorOrientation {
    pub const DEG_0: Self = Self(0);
    pub const DEG_90: Self = Self(90);
    pub const DEG_180: Self = Self(180);
    pub const DEG_270: Self = Self(270);

    pub fn new(degrees: i32) -> PreviewResult<Self> {
        match degrees {
            0 | 90 | 180 | 270 => Ok(Self(degrees)),
            _ => Err(PreviewError::InvalidSensorOrientation(degrees)),
        }
    }

    #[inline]
    pub fn degrees(&self) -> i32 {
        self.0
    }

    #[inline]
    fn is_quarter_turn(&self) -> bool {
        self.0 == 90 || self.0 == 270
    }
}

impl TryFrom<i32> for SensorOrientation {
    type Error = PreviewError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Self::new(degrees)
    }
}

/// Whether sensor-native width/height must be swapped before being compared
/// against the viewport.
///
/// Holds when the sensor and the display are a quarter turn apart. Both the
/// size selection and the transform branch key off this one predicate.
#[inline]
pub fn is_sensor_rotated(sensor: SensorOrientation, display: Rotation) -> bool {
    sensor.is_quarter_turn() != display.is_quarter_turn()
}
