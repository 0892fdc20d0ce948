//! Animation loop engine.
//!
//! [`AnimationLoop`] is the pure phase machine; [`AnimationScheduler`] runs
//! one of them per entity key on a tokio timer.

mod scheduler;
mod state;

pub use scheduler::{AnimationScheduler, TickCallback};
pub use state::{AnimationLoop, AnimationRunState, LoopConfig, TickEvent};
