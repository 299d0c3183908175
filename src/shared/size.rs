// This is free and unencumbered software released into the public domain.

//! Preview output size selection.
//!
//! Two policies are supported. [`SizePolicy::ClosestAspect`] matches the
//! viewport's aspect ratio first and its absolute size second.
//! [`SizePolicy::Bounded`] takes the smallest size covering the viewport
//! under a cap, falling back to the largest size below it.
//! [`SizePolicy::FixedAspect`] matches a fixed preview frame of 4:3 or 16:9
//! instead of the whole viewport.

use super::{Dimensions, PreviewError, PreviewResult};
use core::str::FromStr;
use derive_more::Display;
use std::borrow::Cow;

/// Output sizes supported by one camera for one output target.
///
/// Never empty. Order is preserved so that ties resolve to the size the
/// hardware listed first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeCandidates(Vec<Dimensions>);

impl SizeCandidates {
    pub fn new(sizes: impl IntoIterator<Item = Dimensions>) -> PreviewResult<Self> {
        let sizes: Vec<Dimensions> = sizes.into_iter().collect();
        if sizes.is_empty() {
            return Err(PreviewError::EmptyCandidates);
        }
        Ok(Self(sizes))
    }

    #[inline]
    pub fn first(&self) -> Dimensions {
        self.0[0]
    }

    #[inline]
    pub fn as_slice(&self) -> &[Dimensions] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimensions> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, size: &Dimensions) -> bool {
        self.0.contains(size)
    }
}

impl TryFrom<Vec<Dimensions>> for SizeCandidates {
    type Error = PreviewError;

    fn try_from(sizes: Vec<Dimensions>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

impl FromStr for SizeCandidates {
    type Err = PreviewError;

    /// Parses a comma-separated list such as `1920x1080,1280x720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sizes = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse::<Dimensions>)
            .collect::<PreviewResult<Vec<Dimensions>>>()?;
        Self::new(sizes)
    }
}

impl<'a> IntoIterator for &'a SizeCandidates {
    type Item = &'a Dimensions;
    type IntoIter = core::slice::Iter<'a, Dimensions>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Preview frame shape, long side to short side.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    #[display("4:3")]
    Ratio4x3,
    #[display("16:9")]
    Ratio16x9,
}

impl AspectRatio {
    #[inline]
    fn sides(&self) -> (u64, u64) {
        match self {
            Self::Ratio4x3 => (4, 3),
            Self::Ratio16x9 => (16, 9),
        }
    }

    /// Long side over short side.
    pub fn value(&self) -> f64 {
        let (long, short) = self.sides();
        long as f64 / short as f64
    }

    /// The frame of this shape laid out in `viewport`.
    ///
    /// The viewport's short side is kept and the long side follows from the
    /// ratio, in the viewport's orientation. Square viewports count as
    /// portrait.
    pub fn frame(&self, viewport: Dimensions) -> Dimensions {
        let (long, short) = self.sides();
        let stretch = |side: u32| {
            let scaled = (side as u64 * long + short / 2) / short;
            u32::try_from(scaled).unwrap_or(u32::MAX)
        };
        let frame = if viewport.width() <= viewport.height() {
            Dimensions::new(viewport.width(), stretch(viewport.width()))
        } else {
            Dimensions::new(stretch(viewport.height()), viewport.height())
        };
        frame.unwrap_or(viewport)
    }
}

impl FromStr for AspectRatio {
    type Err = PreviewError;

    /// Parses `4:3` or `16:9`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4:3" => Ok(Self::Ratio4x3),
            "16:9" => Ok(Self::Ratio16x9),
            other => Err(PreviewError::invalid_config(format!(
                "aspect ratio {other:?} is not one of 4:3, 16:9"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizePolicy {
    /// Closest aspect ratio, then closest absolute size.
    #[default]
    ClosestAspect,
    /// Smallest size covering the viewport without exceeding `max`.
    Bounded { max: Dimensions },
    /// Like [`ClosestAspect`](Self::ClosestAspect), against the frame of
    /// this shape that fits the viewport.
    FixedAspect(AspectRatio),
}

impl dogma::Named for SizePolicy {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::ClosestAspect => "closest-aspect".into(),
            Self::Bounded { .. } => "bounded".into(),
            Self::FixedAspect(_) => "fixed-aspect".into(),
        }
    }
}

#[inline]
fn effective_viewport(viewport: Dimensions, is_sensor_rotated: bool) -> Dimensions {
    if is_sensor_rotated {
        viewport.transposed()
    } else {
        viewport
    }
}

#[inline]
fn size_distance(candidate: &Dimensions, target: &Dimensions) -> u64 {
    candidate.width().abs_diff(target.width()) as u64
        + candidate.height().abs_diff(target.height()) as u64
}

/// Picks the candidate whose aspect ratio is closest to the viewport's,
/// breaking ties by the smallest width plus height difference.
///
/// When `is_sensor_rotated` is set the viewport is transposed first, since
/// candidates are listed in sensor-native order.
pub fn select_preview_size(
    candidates: &SizeCandidates,
    viewport: Dimensions,
    is_sensor_rotated: bool,
) -> Dimensions {
    let target = effective_viewport(viewport, is_sensor_rotated);
    let target_aspect = target.aspect();

    let score = |c: &Dimensions| ((c.aspect() - target_aspect).abs(), size_distance(c, &target));

    let mut best = candidates.first();
    let (mut best_aspect, mut best_size) = score(&best);

    for candidate in candidates.iter().skip(1) {
        if best_aspect == 0.0 && best_size == 0 {
            break;
        }
        let (aspect_diff, size_diff) = score(candidate);
        if aspect_diff < best_aspect || (aspect_diff == best_aspect && size_diff < best_size) {
            best = *candidate;
            best_aspect = aspect_diff;
            best_size = size_diff;
        }
    }

    best
}

/// Picks the smallest candidate that covers the viewport and fits under
/// `max`, else the largest one under `max`, else the first candidate.
///
/// `max` is given in display terms and is transposed along with the viewport.
pub fn select_bounded_preview_size(
    candidates: &SizeCandidates,
    viewport: Dimensions,
    max: Dimensions,
    is_sensor_rotated: bool,
) -> Dimensions {
    let target = effective_viewport(viewport, is_sensor_rotated);
    let max = effective_viewport(max, is_sensor_rotated);

    let mut big_enough: Option<Dimensions> = None;
    let mut not_big_enough: Option<Dimensions> = None;

    for candidate in candidates.iter().filter(|c| c.fits_within(&max)) {
        if candidate.covers(&target) {
            if big_enough.is_none_or(|b| candidate.area() < b.area()) {
                big_enough = Some(*candidate);
            }
        } else if not_big_enough.is_none_or(|b| candidate.area() > b.area()) {
            not_big_enough = Some(*candidate);
        }
    }

    big_enough
        .or(not_big_enough)
        .unwrap_or_else(|| candidates.first())
}

/// Dispatches to the selector for `policy`.
pub fn select_with_policy(
    policy: SizePolicy,
    candidates: &SizeCandidates,
    viewport: Dimensions,
    is_sensor_rotated: bool,
) -> Dimensions {
    match policy {
        SizePolicy::ClosestAspect => select_preview_size(candidates, viewport, is_sensor_rotated),
        SizePolicy::Bounded { max } => {
            select_bounded_preview_size(candidates, viewport, max, is_sensor_rotated)
        },
        SizePolicy::FixedAspect(ratio) => {
            select_preview_size(candidates, ratio.frame(viewport), is_sensor_rotated)
        },
    }
}
