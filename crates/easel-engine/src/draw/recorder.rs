use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use crate::error::{RasterError, RasterOp};
use crate::paint::Color;

use super::Rasterizer;

/// One rasterizer call as seen by [`Recorder`], in device space.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterCall {
    Clear { color: Color },
    Line { start: Vec2, end: Vec2, color: Color },
    Polygon { points: Vec<Vec2>, color: Color },
    FillPolygon { points: Vec<Vec2>, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
}

#[derive(Debug, Default)]
struct RecorderState {
    calls: Vec<RasterCall>,
    presents: usize,
    releases: usize,
    size: Option<(u32, u32)>,
    failures: HashMap<RasterOp, String>,
}

/// Headless rasterizer that records every call.
///
/// Clones share the same log, so a handle kept outside an engine still sees
/// what the engine did with its copy (including release on drop).
/// `present` keeps the log; `clear` drops the calls recorded so far, matching
/// what a real surface shows.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    state: Rc<RefCell<RecorderState>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the last `clear`, plus that `clear` itself.
    pub fn calls(&self) -> Vec<RasterCall> {
        self.state.borrow().calls.clone()
    }

    pub fn present_count(&self) -> usize {
        self.state.borrow().presents
    }

    pub fn release_count(&self) -> usize {
        self.state.borrow().releases
    }

    /// Last size passed to `resize`, in physical pixels.
    pub fn last_resize(&self) -> Option<(u32, u32)> {
        self.state.borrow().size
    }

    /// Makes every subsequent `op` call fail with `message`.
    pub fn fail_on(&self, op: RasterOp, message: impl Into<String>) {
        self.state.borrow_mut().failures.insert(op, message.into());
    }

    pub fn clear_failures(&self) {
        self.state.borrow_mut().failures.clear();
    }

    fn check(&self, op: RasterOp) -> Result<(), RasterError> {
        match self.state.borrow().failures.get(&op) {
            Some(message) => Err(RasterError::backend(op, message.clone())),
            None => Ok(()),
        }
    }

    fn record(&self, op: RasterOp, call: RasterCall) -> Result<(), RasterError> {
        self.check(op)?;
        self.state.borrow_mut().calls.push(call);
        Ok(())
    }
}

impl Rasterizer for Recorder {
    fn clear(&mut self, color: Color) -> Result<(), RasterError> {
        self.check(RasterOp::Clear)?;
        let mut state = self.state.borrow_mut();
        state.calls.clear();
        state.calls.push(RasterCall::Clear { color });
        Ok(())
    }

    fn present(&mut self) -> Result<(), RasterError> {
        self.check(RasterOp::Present)?;
        self.state.borrow_mut().presents += 1;
        Ok(())
    }

    fn line(&mut self, start: Vec2, end: Vec2, color: Color) -> Result<(), RasterError> {
        self.record(RasterOp::Line, RasterCall::Line { start, end, color })
    }

    fn polygon(&mut self, points: &[Vec2], color: Color) -> Result<(), RasterError> {
        self.record(RasterOp::Polygon, RasterCall::Polygon { points: points.to_vec(), color })
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) -> Result<(), RasterError> {
        self.record(
            RasterOp::FillPolygon,
            RasterCall::FillPolygon { points: points.to_vec(), color },
        )
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), RasterError> {
        self.record(RasterOp::Circle, RasterCall::Circle { center, radius, color })
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), RasterError> {
        self.record(RasterOp::FillCircle, RasterCall::FillCircle { center, radius, color })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.state.borrow_mut().size = Some((width, height));
    }

    fn release(&mut self) {
        self.state.borrow_mut().releases += 1;
    }
}
