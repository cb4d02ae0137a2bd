//! Geography for the state map: TopoJSON decoding, the Albers USA
//! projection, and the static state tables.

pub mod projection;
pub mod states;
pub mod topology;

/// `[longitude, latitude]` in degrees before projection, `[x, y]` in pixels after.
pub type Point = [f64; 2];
