use crate::paint::Color;

/// Window, cadence, and randomness settings for an [`Engine`](super::Engine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub title: String,

    /// Initial logical window width.
    pub width: u32,

    /// Initial logical window height.
    pub height: u32,

    pub resizable: bool,

    /// Seconds between `Sketch::update` calls.
    pub update_interval: f32,

    /// Color the surface is cleared to at the start of each frame.
    pub clear_color: Color,

    /// Fixed seed for `Engine::random`. `None` seeds from the OS.
    pub random_seed: Option<u64>,
}

impl EngineConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_update_interval(mut self, seconds: f32) -> Self {
        self.update_interval = seconds;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            update_interval: 1.0 / 60.0,
            clear_color: Color::BLACK,
            random_seed: None,
        }
    }
}
