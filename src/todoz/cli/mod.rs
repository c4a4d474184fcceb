//! Terminal front end: argument parsing, rendering and the interactive shell.

mod commands;
mod print;
mod setup;
mod shell;

pub use commands::run;
