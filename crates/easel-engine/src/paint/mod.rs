//! Paint model shared by the drawing primitives and the rasterizers.
//!
//! Only solid colors exist: a primitive is filled or stroked with one [`Color`].

pub mod color;

pub use color::Color;
