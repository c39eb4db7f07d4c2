//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes the clap command definitions, the global options, and the `App`
//! that dispatches each command to its handler.

mod commands;

pub use commands::*;
