//! # ntc-cli
//!
//! Terminal front end: clap commands that drive the view models of
//! `ntc-view` and render their state with `tabled`.

pub mod commands;
pub mod output;
pub mod terminal;

pub use commands::Cli;
