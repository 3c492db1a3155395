//! Ambient services the core depends on but does not itself implement fully:
//! the logger sinks named in spec §6.

pub mod logger;

pub use logger::{LogLevel, Logger, RunLoggers};
