// This is free and unencumbered software released into the public domain.

use super::{PreviewError, PreviewResult};
use core::str::FromStr;
use derive_more::Display;

/// A strictly positive pixel size.
///
/// Used both for hardware output sizes and for the on-screen viewport.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[display("{width}x{height}")]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> PreviewResult<Self> {
        if width == 0 || height == 0 {
            return Err(PreviewError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Constructor for constants. Panics on a zero side, which fails the
    /// build when evaluated in a `const` item.
    pub const fn new_const(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "dimensions must be positive");
        Self { width, height }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Pixel count, widened so large sensors cannot overflow.
    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// The same size with width and height swapped.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// True when both sides are at least those of `other`.
    #[inline]
    pub fn covers(&self, other: &Self) -> bool {
        self.width >= other.width && self.height >= other.height
    }

    /// True when neither side exceeds those of `bound`.
    #[inline]
    pub fn fits_within(&self, bound: &Self) -> bool {
        self.width <= bound.width && self.height <= bound.height
    }
}

impl TryFrom<(u32, u32)> for Dimensions {
    type Error = PreviewError;

    fn try_from((width, height): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(width, height)
    }
}

impl From<Dimensions> for (u32, u32) {
    fn from(d: Dimensions) -> Self {
        (d.width, d.height)
    }
}

impl FromStr for Dimensions {
    type Err = PreviewError;

    /// Parses `WIDTHxHEIGHT`, e.g. `1920x1080`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PreviewError::MalformedDimensions(s.to_string());
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(malformed)?;
        let width = w.trim().parse::<u32>().map_err(|_| malformed())?;
        let height = h.trim().parse::<u32>().map_err(|_| malformed())?;
        Self::new(width, height)
    }
}
