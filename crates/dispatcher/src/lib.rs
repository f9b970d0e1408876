//! Activity tracking and scheduled notification dispatch.
//!
//! Two entry points:
//!
//! - [`record_activity`] - the synchronous per-event path: advances a
//!   user's streak, counters, and classification when they do something.
//! - [`Dispatcher`] - the scheduler-triggered path: one pass over a
//!   notification family's settings records, sending to every eligible
//!   user at most once per day.
//!
//! The dispatcher isolates failures per user: a generation error or
//! timeout for one user is recorded in the run's [`DispatchReport`] and
//! processing continues. Only an inability to list the settings records at
//! all aborts a run.

mod activity;
mod dispatch;
mod error;

pub use activity::record_activity;
pub use dispatch::{DispatchFailure, DispatchReport, Dispatcher, DispatcherConfig};
pub use error::DispatchError;
