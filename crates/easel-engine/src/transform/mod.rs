//! Transform stack.
//!
//! Transforms are homogeneous 3x3 affine matrices (`glam::Mat3`).
//! Drawing primitives read the top of the stack to map local-space geometry
//! into device space (logical pixels, top-left origin, +Y down).

mod stack;

pub use glam::Mat3 as Transform;
pub use stack::TransformStack;
