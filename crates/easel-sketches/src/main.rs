use std::f32::consts::TAU;

use anyhow::Context;
use glam::Vec2;

use easel_engine::device::GpuInit;
use easel_engine::input::{Event, Key, KeyState};
use easel_engine::logging::{init_logging, LoggingConfig};
use easel_engine::window::Runtime;
use easel_engine::{map, Color, DrawError, Engine, EngineConfig, Sketch};

const STAR_COUNT: usize = 120;
const ARMS: usize = 6;

struct Star {
    pos: Vec2,
    speed: f32,
}

/// Rotating arms of nested squares over a drifting star field.
/// Space (unmodified) pauses the spin, Escape quits; the pointer pulls the hub around.
struct Orbits {
    stars: Vec<Star>,
    angle: f32,
    paused: bool,
    pointer: Vec2,
}

impl Orbits {
    fn new() -> Self {
        Self {
            stars: Vec::with_capacity(STAR_COUNT),
            angle: 0.0,
            paused: false,
            pointer: Vec2::ZERO,
        }
    }

    fn spawn_star(engine: &mut Engine, x: Option<f32>) -> Star {
        let w = engine.window_width() as f32;
        let h = engine.window_height() as f32;
        Star {
            pos: Vec2::new(x.unwrap_or_else(|| engine.random(0.0, w)), engine.random(0.0, h)),
            speed: engine.random(0.5, 3.0),
        }
    }

    fn hub(&self, engine: &Engine) -> Vec2 {
        let center = Vec2::new(
            engine.window_width() as f32 * 0.5,
            engine.window_height() as f32 * 0.5,
        );
        center.lerp(self.pointer, 0.25)
    }
}

impl Sketch for Orbits {
    fn setup(&mut self, engine: &mut Engine) {
        self.pointer = Vec2::new(
            engine.window_width() as f32 * 0.5,
            engine.window_height() as f32 * 0.5,
        );
        for _ in 0..STAR_COUNT {
            let star = Self::spawn_star(engine, None);
            self.stars.push(star);
        }
        log::info!("spawned {} stars", self.stars.len());
    }

    fn update(&mut self, engine: &mut Engine) {
        if !self.paused {
            self.angle = (self.angle + 0.01) % TAU;
        }

        let w = engine.window_width() as f32;
        for i in 0..self.stars.len() {
            self.stars[i].pos.x -= self.stars[i].speed;
            if self.stars[i].pos.x < 0.0 {
                self.stars[i] = Self::spawn_star(engine, Some(w));
            }
        }
    }

    fn draw(&mut self, engine: &mut Engine) -> Result<(), DrawError> {
        for star in &self.stars {
            let shade = map(star.speed, 0.5, 3.0, 60.0, 255.0) as u8;
            engine.fill_circle(star.pos, star.speed * 0.6, Color::rgb(shade, shade, shade))?;
        }

        let hub = self.hub(engine);
        engine.translate(hub);
        engine.rotate(self.angle);

        for arm in 0..ARMS {
            engine.push_matrix();
            engine.rotate(arm as f32 * TAU / ARMS as f32);

            let hue = map(arm as f32, 0.0, ARMS as f32, 80.0, 255.0) as u8;
            let color = Color::from((hue, 255 - hue, 200));
            engine.draw_line(Vec2::ZERO, Vec2::new(180.0, 0.0), color.with_alpha(120))?;

            for step in 1..=4 {
                engine.push_matrix();
                engine.translate(Vec2::new(step as f32 * 40.0, 0.0));
                engine.rotate(-2.0 * self.angle);
                engine.scale_uniform(1.0 - step as f32 * 0.15);
                engine.fill_rectangle(Vec2::splat(-12.0), Vec2::splat(12.0), color.with_alpha(90))?;
                engine.draw_rectangle(Vec2::splat(-12.0), Vec2::splat(12.0), color)?;
                engine.pop_matrix()?;
            }

            engine.pop_matrix()?;
        }

        engine.draw_circle(Vec2::ZERO, 200.0, Color::rgb(90, 90, 140))?;
        engine.fill_circle(Vec2::ZERO, 10.0, Color::WHITE)?;
        Ok(())
    }

    fn handle_event(&mut self, engine: &mut Engine, event: &Event) {
        match *event {
            Event::Key { key: Key::Escape, state: KeyState::Pressed, .. } => engine.quit(),
            Event::Key {
                key: Key::Space,
                state: KeyState::Pressed,
                repeat: false,
                modifiers,
            } if !modifiers.any() => {
                self.paused = !self.paused;
                log::info!("spin {}", if self.paused { "paused" } else { "resumed" });
            }
            Event::PointerMoved { x, y } => self.pointer = Vec2::new(x, y),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = EngineConfig::new("easel · orbits", 960, 640)
        .with_update_interval(1.0 / 60.0)
        .with_clear_color(Color::rgb(12, 12, 24));

    Runtime::run(config, GpuInit::default(), Orbits::new()).context("orbits sketch failed")?;
    Ok(())
}
