// This is free and unencumbered software released into the public domain.

mod capabilities;
pub use capabilities::*;

mod config;
pub use config::*;

mod controller;
pub use controller::*;

mod dimensions;
pub use dimensions::*;

mod error;
pub use error::*;

mod geometry;
pub use geometry::*;

mod rotation;
pub use rotation::*;

pub mod size;
pub use size::*;

pub mod transform;
pub use transform::*;
