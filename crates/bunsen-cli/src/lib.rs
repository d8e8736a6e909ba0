//! Library components for the bunsen command-line tool.

pub mod logging;
pub mod replay;
