//! Time subsystem.
//!
//! Provides the fixed-interval update gate without coupling to the runtime.
//! Intended usage:
//! - one `IntervalTimer` per engine
//! - call `tick()` once per presented frame; run a simulation step when it returns true

mod interval_timer;

pub use interval_timer::IntervalTimer;
