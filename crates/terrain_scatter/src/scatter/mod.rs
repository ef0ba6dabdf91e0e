//! Scatter front end: requests, the runner, event sinks and background jobs.
pub mod events;
pub mod plan;
pub mod runner;
pub mod task;
