//! Library components of the `airq` command-line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
