//! Simulation core: trajectory synthesis, the tracked-object arena and the
//! per-frame animator.
//!
//! Nothing in here depends on rendering or UI. The host calls [`tick`] once per
//! frame and reads the resulting [`DisplayState`] of every object.

pub mod animator;
pub mod occlusion;
pub mod picking;
pub mod registry;
pub mod trajectory;
pub mod visibility;

#[cfg(test)]
mod proptest_sim;

pub use animator::{object_progress, position_at, progress_at, tick, DegenerateTiming, FrameInput};
pub use picking::{pick, PickHit};
pub use registry::{build_registry, BuildReport, DisplayState, NeoRegistry, TrackedObject};
pub use trajectory::{synthesize, QuadraticBezier, ValidationError};
pub use visibility::{apply_visibility, VisibilityClass, VisibilityToggles};
