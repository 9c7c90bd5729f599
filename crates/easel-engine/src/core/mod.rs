//! Application shell and client contract.
//!
//! [`Engine`] is the state a sketch draws through; [`Sketch`] is the hook set the
//! runtime drives each frame. Neither depends on the windowing platform, so both
//! run headless against any [`Rasterizer`](crate::draw::Rasterizer).

mod app;
mod config;
mod engine;

pub use app::Sketch;
pub use config::EngineConfig;
pub use engine::Engine;

/// Linearly remaps `x` from `[min, max]` onto `[new_min, new_max]`.
///
/// Values outside the source range extrapolate. An empty source range
/// (`min == max`) maps everything to `new_min`.
pub fn map(x: f32, min: f32, max: f32, new_min: f32, new_max: f32) -> f32 {
    if max == min {
        return new_min;
    }
    new_min + (x - min) / (max - min) * (new_max - new_min)
}

#[cfg(test)]
mod tests {
    use super::map;

    #[test]
    fn map_midpoint() {
        assert_eq!(map(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
    }

    #[test]
    fn map_inverted_target_range() {
        assert_eq!(map(2.0, 0.0, 4.0, 1.0, -1.0), 0.0);
    }

    #[test]
    fn map_extrapolates() {
        assert_eq!(map(20.0, 0.0, 10.0, 0.0, 1.0), 2.0);
    }

    #[test]
    fn map_empty_source_range() {
        assert_eq!(map(3.0, 1.0, 1.0, 7.0, 9.0), 7.0);
    }
}
