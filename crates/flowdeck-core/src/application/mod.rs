/// Flow execution engine
pub mod execution;

/// Launcher facade tying catalog, editor, runs and detection together
pub mod launcher;
