//! Subcommand modules for the `bbh` binary.

pub mod compare;
pub mod parse;
pub mod run;
pub mod size;
