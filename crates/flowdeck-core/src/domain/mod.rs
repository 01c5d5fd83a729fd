//! Domain model for the launcher.
//!
//! This module contains the core domain objects: flow definitions, the
//! catalog that holds them, editor sessions, execution-run state and the
//! simulated system report.

/// Flow catalog trait and the in-memory implementation.
pub mod catalog;

/// Editor sessions: detached working copies of one flow.
pub mod editor;

/// Flow and step definitions.
pub mod flow;

/// Execution-run state: step states, reports, cancellation.
pub mod run;

/// Seed flow definitions the catalog starts with.
pub mod seed;

/// Simulated system detection report.
pub mod system;
