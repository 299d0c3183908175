// This is free and unencumbered software released into the public domain.

#![deny(unsafe_code)]

//! Preview geometry for camera front-ends.
//!
//! Picks the best output size for a preview surface and computes the display
//! transform that compensates for sensor/display rotation mismatch. A small
//! controller models the camera state a UI layer keeps around the geometry.

pub mod cli;
pub mod shared;
