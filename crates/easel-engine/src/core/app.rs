use crate::error::DrawError;
use crate::input::Event;

use super::Engine;

/// Client contract implemented by sketches.
///
/// The runtime calls, in order, once per frame:
/// 1. `handle_event` for each pending event (after the engine's own handling)
/// 2. `update` when the engine's interval timer fires
/// 3. `draw` between the surface clear and present
pub trait Sketch {
    /// Called once after the window and surface exist, before the first frame.
    fn setup(&mut self, engine: &mut Engine) {
        let _ = engine;
    }

    /// Fixed-interval simulation step.
    fn update(&mut self, engine: &mut Engine);

    /// Issues this frame's drawing. The transform stack starts at identity.
    fn draw(&mut self, engine: &mut Engine) -> Result<(), DrawError>;

    /// Custom input handling. Resize tracking has already happened when this runs.
    /// `Event::Quit` is delivered here too; the runtime stops once dispatch returns.
    fn handle_event(&mut self, engine: &mut Engine, event: &Event) {
        let _ = (engine, event);
    }
}
