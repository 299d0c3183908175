// This is free and unencumbered software released into the public domain.

use std::error::Error as StdError;
use thiserror::Error;

pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("invalid dimensions {width}x{height}: both sides must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("cannot parse dimensions from {0:?}, expected WIDTHxHEIGHT")]
    MalformedDimensions(String),

    #[error("no output sizes supplied")]
    EmptyCandidates,

    #[error("invalid display rotation: {0}")]
    InvalidRotation(i32),

    #[error("invalid sensor orientation: {0} degrees")]
    InvalidSensorOrientation(i32),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no camera device available")]
    NoCamera,

    #[error("camera is not bound")]
    NotBound,

    #[error("host error while {context}")]
    HostError {
        context: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("{0}")]
    Other(String),
}

impl PreviewError {
    #[inline]
    pub fn host(context: &'static str, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::HostError {
            context,
            source: Box::new(source),
        }
    }

    #[inline]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether the error stems from bad caller input rather than the host.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions { .. }
                | Self::MalformedDimensions(_)
                | Self::EmptyCandidates
                | Self::InvalidRotation(_)
                | Self::InvalidSensorOrientation(_)
                | Self::InvalidConfig(_)
        )
    }
}
