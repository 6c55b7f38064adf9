//! Library side of the `varcur` binary: logging setup, command
//! implementations and table rendering.

pub mod commands;
pub mod logging;
pub mod report;
