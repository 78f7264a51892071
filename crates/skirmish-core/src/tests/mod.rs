//! Pipeline and determinism tests.
//!
//! The capabilities are replaced by scripted fakes so every frame's
//! detections and tracker results are known in advance:
//! - **Integration tests**: perception recovery, behavior transitions and the
//!   agent loop end to end
//! - **Determinism tests**: the same seed gives the same command stream
//!
//! # Test Structure
//!
//! - `integration.rs`: end-to-end tests of the frame loop
//! - `determinism.rs`: seeded reproducibility
//! - `helpers.rs`: scripted frames, detector, trackers, source and actuator

mod helpers;

// Re-export for convenience
pub use helpers::*;
