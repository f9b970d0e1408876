//! Mock content generators.
//!
//! Implementations of [`companion_core::ContentGenerator`] for tests and
//! local runs without an LLM backend:
//!
//! - [`FixedGenerator`] - always returns the same content, counts calls
//! - [`FailingGenerator`] - always fails with a chosen error
//! - [`FlakyGenerator`] - fails transiently N times, then succeeds
//! - [`DelayedGenerator`] - wraps another generator with artificial delay

mod delayed;
mod failing;
mod fixed;
mod flaky;

pub use delayed::DelayedGenerator;
pub use failing::FailingGenerator;
pub use fixed::FixedGenerator;
pub use flaky::FlakyGenerator;
