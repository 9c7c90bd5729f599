//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! [`platform::winit`] translates window system events into [`Event`]s.

pub(crate) mod platform;
mod types;

pub use types::{ButtonState, Event, Key, KeyState, Modifiers, MouseButton, MouseWheelDelta};
