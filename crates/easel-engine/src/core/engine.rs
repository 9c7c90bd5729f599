use std::time::Instant;

use glam::{Mat3, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::draw::{primitives, Rasterizer};
use crate::error::DrawError;
use crate::input::Event;
use crate::paint::Color;
use crate::time::IntervalTimer;
use crate::transform::TransformStack;

use super::{EngineConfig, Sketch};

/// Application shell state: rasterizer ownership, transform stack, update
/// timer, random source, and the cached logical window size.
///
/// The engine is active while it owns its rasterizer. Ownership leaves through
/// [`transfer`](Self::transfer) or [`shutdown`](Self::shutdown); an inactive
/// engine rejects drawing with [`DrawError::Inactive`] and never releases
/// anything, so the rasterizer is released exactly once however many
/// transfers happened.
pub struct Engine {
    raster: Option<Box<dyn Rasterizer>>,
    stack: TransformStack,
    timer: IntervalTimer,
    rng: StdRng,
    width: u32,
    height: u32,
    clear_color: Color,
    quit_requested: bool,
    frame_index: u64,
}

impl Engine {
    pub fn new(config: &EngineConfig, raster: Box<dyn Rasterizer>) -> Self {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            raster: Some(raster),
            stack: TransformStack::new(),
            timer: IntervalTimer::new(config.update_interval),
            rng,
            width: config.width,
            height: config.height,
            clear_color: config.clear_color,
            quit_requested: false,
            frame_index: 0,
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[inline]
    pub fn is_active(&self) -> bool {
        self.raster.is_some()
    }

    /// Moves the rasterizer and all engine state into a new engine.
    ///
    /// `self` becomes inactive; dropping it afterwards releases nothing.
    pub fn transfer(&mut self) -> Engine {
        if self.raster.is_none() {
            log::warn!("transferring an inactive engine");
        }

        Engine {
            raster: self.raster.take(),
            stack: std::mem::take(&mut self.stack),
            timer: self.timer.clone(),
            rng: std::mem::replace(&mut self.rng, StdRng::seed_from_u64(0)),
            width: self.width,
            height: self.height,
            clear_color: self.clear_color,
            quit_requested: self.quit_requested,
            frame_index: self.frame_index,
        }
    }

    /// Releases the rasterizer if this engine still owns it. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(mut raster) = self.raster.take() {
            raster.release();
            log::info!("engine resources released after {} frames", self.frame_index);
        }
    }

    /// Asks the runtime to stop after the current frame.
    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    #[inline]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Runs one frame: update (if the timer fired), clear, draw, present.
    pub fn frame<S: Sketch + ?Sized>(&mut self, sketch: &mut S) -> Result<(), DrawError> {
        self.frame_at(sketch, Instant::now())
    }

    /// Like [`frame`](Self::frame) with an explicit timer sample.
    pub fn frame_at<S: Sketch + ?Sized>(
        &mut self,
        sketch: &mut S,
        now: Instant,
    ) -> Result<(), DrawError> {
        if !self.is_active() {
            return Err(DrawError::Inactive);
        }

        if self.timer.tick_at(now) {
            sketch.update(self);
        }

        self.stack.reset();
        let clear = self.clear_color;
        self.raster()?.clear(clear)?;
        sketch.draw(self)?;
        self.raster()?.present()?;

        self.frame_index = self.frame_index.wrapping_add(1);
        Ok(())
    }

    /// Number of frames presented so far.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    // ── events ────────────────────────────────────────────────────────────

    /// Base event handling: tracks logical size on resize.
    ///
    /// `Event::Quit` is left to the runtime, which stops the loop after dispatch.
    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Resized { width, height } = *event {
            log::debug!("window resized to {width}x{height}");
            self.width = width;
            self.height = height;
        }
    }

    /// Base handling followed by the sketch's own handler.
    pub fn dispatch_event<S: Sketch + ?Sized>(&mut self, sketch: &mut S, event: &Event) {
        self.handle_event(event);
        sketch.handle_event(self, event);
    }

    /// Forwards a drawable size change (physical pixels) to the rasterizer.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if let Some(raster) = self.raster.as_mut() {
            raster.resize(width, height);
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn window_width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn window_height(&self) -> u32 {
        self.height
    }

    /// Uniform draw in `[min, max)`. Returns `min` for an empty or unbounded range.
    pub fn random(&mut self, min: f32, max: f32) -> f32 {
        if !(min < max) || !(max - min).is_finite() {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// See [`map`](super::map).
    #[inline]
    pub fn map(&self, x: f32, min: f32, max: f32, new_min: f32, new_max: f32) -> f32 {
        super::map(x, min, max, new_min, new_max)
    }

    /// Changes the update interval; the next update is measured from now.
    pub fn set_interval(&mut self, seconds: f32) {
        self.timer.set_interval(seconds);
    }

    /// Like [`set_interval`](Self::set_interval), measured from `now`.
    pub fn set_interval_at(&mut self, seconds: f32, now: Instant) {
        self.timer.set_interval_at(seconds, now);
    }

    /// Current top of the transform stack.
    #[inline]
    pub fn matrix(&self) -> &Mat3 {
        self.stack.top()
    }

    #[inline]
    pub fn transform_stack(&self) -> &TransformStack {
        &self.stack
    }

    // ── transform stack ───────────────────────────────────────────────────

    pub fn reset_matrix(&mut self) {
        self.stack.reset();
    }

    pub fn push_matrix(&mut self) {
        self.stack.push();
    }

    /// Fails with [`TransformStackError::Underflow`](crate::error::TransformStackError)
    /// when only the base transform is left.
    pub fn pop_matrix(&mut self) -> Result<(), DrawError> {
        self.stack.pop()?;
        Ok(())
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.stack.translate(offset);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.stack.rotate(radians);
    }

    pub fn scale(&mut self, factor: Vec2) {
        self.stack.scale(factor);
    }

    pub fn scale_uniform(&mut self, factor: f32) {
        self.stack.scale_uniform(factor);
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Clears the surface now and makes `color` the per-frame clear color.
    pub fn clear(&mut self, color: Color) -> Result<(), DrawError> {
        self.clear_color = color;
        self.raster()?.clear(color)?;
        Ok(())
    }

    pub fn draw_line(&mut self, start: Vec2, end: Vec2, color: Color) -> Result<(), DrawError> {
        let (stack, raster) = self.split()?;
        primitives::line(stack, raster, start, end, color)?;
        Ok(())
    }

    pub fn draw_rectangle(
        &mut self,
        top_left: Vec2,
        bottom_right: Vec2,
        color: Color,
    ) -> Result<(), DrawError> {
        let (stack, raster) = self.split()?;
        primitives::rectangle(stack, raster, top_left, bottom_right, color)?;
        Ok(())
    }

    pub fn fill_rectangle(
        &mut self,
        top_left: Vec2,
        bottom_right: Vec2,
        color: Color,
    ) -> Result<(), DrawError> {
        let (stack, raster) = self.split()?;
        primitives::fill_rectangle(stack, raster, top_left, bottom_right, color)?;
        Ok(())
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), DrawError> {
        let (stack, raster) = self.split()?;
        primitives::circle(stack, raster, center, radius, color)?;
        Ok(())
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), DrawError> {
        let (stack, raster) = self.split()?;
        primitives::fill_circle(stack, raster, center, radius, color)?;
        Ok(())
    }

    fn raster(&mut self) -> Result<&mut dyn Rasterizer, DrawError> {
        match self.raster.as_deref_mut() {
            Some(raster) => Ok(raster),
            None => Err(DrawError::Inactive),
        }
    }

    fn split(&mut self) -> Result<(&TransformStack, &mut dyn Rasterizer), DrawError> {
        match self.raster.as_deref_mut() {
            Some(raster) => Ok((&self.stack, raster)),
            None => Err(DrawError::Inactive),
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::draw::{RasterCall, Recorder};
    use crate::error::{RasterError, RasterOp, TransformStackError};

    fn engine_with(config: EngineConfig) -> (Engine, Recorder) {
        let rec = Recorder::new();
        let engine = Engine::new(&config, Box::new(rec.clone()));
        (engine, rec)
    }

    fn engine() -> (Engine, Recorder) {
        engine_with(EngineConfig::new("test", 800, 600).with_random_seed(7))
    }

    /// Sketch that logs hook calls and draws one translated square.
    #[derive(Default)]
    struct TestSketch {
        log: Vec<&'static str>,
        events: Vec<Event>,
        pop_twice: bool,
    }

    impl Sketch for TestSketch {
        fn update(&mut self, _engine: &mut Engine) {
            self.log.push("update");
        }

        fn draw(&mut self, engine: &mut Engine) -> Result<(), DrawError> {
            self.log.push("draw");
            engine.translate(Vec2::new(10.0, 0.0));
            engine.fill_rectangle(Vec2::ZERO, Vec2::ONE, Color::WHITE)?;
            if self.pop_twice {
                engine.push_matrix();
                engine.pop_matrix()?;
                engine.pop_matrix()?;
            }
            Ok(())
        }

        fn handle_event(&mut self, engine: &mut Engine, event: &Event) {
            // Base handling has already run.
            assert_eq!(engine.window_width(), 400);
            self.events.push(event.clone());
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[test]
    fn window_size_comes_from_config() {
        let (engine, _) = engine();
        assert_eq!((engine.window_width(), engine.window_height()), (800, 600));
    }

    #[test]
    fn resize_event_updates_size_before_sketch_sees_it() {
        let (mut engine, _) = engine();
        let mut sketch = TestSketch::default();
        let ev = Event::Resized { width: 400, height: 300 };

        engine.dispatch_event(&mut sketch, &ev);

        assert_eq!((engine.window_width(), engine.window_height()), (400, 300));
        assert_eq!(sketch.events, vec![ev]);
    }

    #[test]
    fn unrelated_events_leave_size_alone() {
        let (mut engine, _) = engine();
        engine.handle_event(&Event::Focused(false));
        engine.handle_event(&Event::PointerMoved { x: 3.0, y: 4.0 });
        assert_eq!((engine.window_width(), engine.window_height()), (800, 600));
        assert!(!engine.quit_requested());
    }

    #[test]
    fn quit_event_reaches_sketch_without_latching() {
        let (mut engine, _) = engine();
        engine.handle_event(&Event::Resized { width: 400, height: 300 });
        let mut sketch = TestSketch::default();

        engine.dispatch_event(&mut sketch, &Event::Quit);

        assert!(!engine.quit_requested());
        assert_eq!(sketch.events, vec![Event::Quit]);
    }

    #[test]
    fn quit_is_requested_explicitly() {
        let (mut engine, _) = engine();
        engine.quit();
        assert!(engine.quit_requested());
    }

    #[test]
    fn map_remaps_linearly() {
        let (engine, _) = engine();
        assert_eq!(engine.map(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_eq!(engine.map(0.0, -1.0, 1.0, 10.0, 20.0), 15.0);
    }

    #[test]
    fn random_stays_in_half_open_range() {
        let (mut engine, _) = engine();
        for _ in 0..1000 {
            let v = engine.random(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&v), "{v}");
        }
        assert_eq!(engine.random(4.0, 4.0), 4.0);
        assert_eq!(engine.random(5.0, 1.0), 5.0);
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let (mut a, _) = engine();
        let (mut b, _) = engine();
        let xs: Vec<f32> = (0..8).map(|_| a.random(0.0, 1.0)).collect();
        let ys: Vec<f32> = (0..8).map(|_| b.random(0.0, 1.0)).collect();
        assert_eq!(xs, ys);
    }

    // ── frame ─────────────────────────────────────────────────────────────

    #[test]
    fn frame_runs_update_only_when_timer_fires() {
        let (mut engine, rec) = engine_with(EngineConfig::default().with_update_interval(1.0));
        let mut sketch = TestSketch::default();
        let t0 = Instant::now();

        engine.frame_at(&mut sketch, t0).unwrap();
        engine.frame_at(&mut sketch, t0 + Duration::from_millis(1500)).unwrap();
        engine.frame_at(&mut sketch, t0 + Duration::from_millis(1600)).unwrap();

        assert_eq!(sketch.log, vec!["draw", "update", "draw", "draw"]);
        assert_eq!(rec.present_count(), 3);
        assert_eq!(engine.frame_index(), 3);
    }

    #[test]
    fn set_interval_measures_next_update_from_call() {
        let (mut engine, _) = engine_with(EngineConfig::default().with_update_interval(1.0));
        let mut sketch = TestSketch::default();
        let t0 = Instant::now();

        engine.set_interval_at(0.5, t0 + Duration::from_millis(900));
        engine.frame_at(&mut sketch, t0 + Duration::from_millis(1000)).unwrap();
        engine.frame_at(&mut sketch, t0 + Duration::from_millis(1399)).unwrap();
        assert!(!sketch.log.contains(&"update"));

        engine.frame_at(&mut sketch, t0 + Duration::from_millis(1400)).unwrap();
        assert_eq!(sketch.log, vec!["draw", "draw", "update", "draw"]);
    }

    #[test]
    fn frame_clears_then_draws_from_identity() {
        let (mut engine, rec) = engine_with(EngineConfig::default().with_clear_color(Color::BLUE));
        let mut sketch = TestSketch::default();

        engine.frame(&mut sketch).unwrap();
        engine.frame(&mut sketch).unwrap();

        // The second frame's translate does not stack on the first.
        let calls = rec.calls();
        assert_eq!(calls[0], RasterCall::Clear { color: Color::BLUE });
        let RasterCall::FillPolygon { points, .. } = &calls[1] else {
            panic!("expected filled polygon, got {calls:?}");
        };
        assert_eq!(points[0], Vec2::new(10.0, 0.0));
    }

    #[test]
    fn clear_sets_next_frame_color() {
        let (mut engine, rec) = engine();
        engine.clear(Color::RED).unwrap();
        engine.frame(&mut TestSketch::default()).unwrap();
        assert_eq!(rec.calls()[0], RasterCall::Clear { color: Color::RED });
    }

    #[test]
    fn present_failure_surfaces_from_frame() {
        let (mut engine, rec) = engine();
        rec.fail_on(RasterOp::Present, "device lost");

        let err = engine.frame(&mut TestSketch::default()).unwrap_err();
        assert_eq!(
            err,
            DrawError::Raster(RasterError::backend(RasterOp::Present, "device lost"))
        );
        assert_eq!(engine.frame_index(), 0);
    }

    #[test]
    fn clear_failure_surfaces_from_frame() {
        let (mut engine, rec) = engine();
        rec.fail_on(RasterOp::Clear, "surface gone");
        let mut sketch = TestSketch::default();

        let err = engine.frame(&mut sketch).unwrap_err();
        assert_eq!(
            err,
            DrawError::Raster(RasterError::backend(RasterOp::Clear, "surface gone"))
        );
        assert!(!sketch.log.contains(&"draw"));
        assert_eq!(rec.present_count(), 0);
        assert_eq!(engine.frame_index(), 0);

        assert_eq!(
            engine.clear(Color::RED),
            Err(DrawError::Raster(RasterError::backend(RasterOp::Clear, "surface gone")))
        );
    }

    #[test]
    fn draw_failure_skips_present() {
        let (mut engine, rec) = engine();
        rec.fail_on(RasterOp::FillPolygon, "bad state");

        assert!(engine.frame(&mut TestSketch::default()).is_err());
        assert_eq!(rec.present_count(), 0);
    }

    #[test]
    fn unbalanced_pop_is_a_stack_error() {
        let (mut engine, _) = engine();
        let mut sketch = TestSketch { pop_twice: true, ..TestSketch::default() };

        let err = engine.frame(&mut sketch).unwrap_err();
        assert_eq!(err, DrawError::Stack(TransformStackError::Underflow));
    }

    #[test]
    fn matrix_ops_forward_to_stack() {
        let (mut engine, _) = engine();
        engine.push_matrix();
        engine.scale_uniform(2.0);
        engine.rotate(0.0);
        assert_eq!(*engine.matrix(), Mat3::from_scale(Vec2::splat(2.0)));
        engine.pop_matrix().unwrap();
        engine.scale(Vec2::new(1.0, 3.0));
        engine.reset_matrix();
        assert_eq!(*engine.matrix(), Mat3::IDENTITY);
        assert_eq!(engine.transform_stack().depth(), 1);
    }

    // ── ownership ─────────────────────────────────────────────────────────

    #[test]
    fn shutdown_releases_once() {
        let (mut engine, rec) = engine();
        engine.shutdown();
        engine.shutdown();
        assert!(!engine.is_active());
        drop(engine);
        assert_eq!(rec.release_count(), 1);
    }

    #[test]
    fn inactive_engine_rejects_drawing() {
        let (mut engine, _) = engine();
        engine.shutdown();
        assert_eq!(
            engine.draw_line(Vec2::ZERO, Vec2::ONE, Color::WHITE),
            Err(DrawError::Inactive)
        );
        assert_eq!(engine.frame(&mut TestSketch::default()), Err(DrawError::Inactive));
    }

    #[test]
    fn transfer_moves_ownership_and_state() {
        let (mut source, rec) = engine();
        source.handle_event(&Event::Resized { width: 320, height: 240 });
        source.translate(Vec2::new(1.0, 2.0));

        let mut moved = source.transfer();
        assert!(!source.is_active());
        assert!(moved.is_active());
        assert_eq!(moved.window_width(), 320);
        assert_eq!(*moved.matrix(), Mat3::from_translation(Vec2::new(1.0, 2.0)));

        moved.draw_circle(Vec2::ZERO, 3.0, Color::GREEN).unwrap();
        assert_eq!(source.fill_circle(Vec2::ZERO, 3.0, Color::GREEN), Err(DrawError::Inactive));

        let again = moved.transfer();
        drop(source);
        drop(moved);
        assert_eq!(rec.release_count(), 0);
        drop(again);
        assert_eq!(rec.release_count(), 1);
    }

    #[test]
    fn resize_surface_reaches_rasterizer() {
        let (mut engine, rec) = engine();
        engine.resize_surface(1600, 1200);
        assert_eq!(rec.last_resize(), Some((1600, 1200)));
    }
}
