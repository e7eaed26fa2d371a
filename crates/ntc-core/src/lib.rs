//! # ntc-core
//!
//! Core crate for the NTC reservation client. Contains the unified error
//! system, configuration schemas, typed identifiers, and the collaborator
//! traits (session store, navigator, notifier) that view models depend on.
//!
//! This crate has **no** internal dependencies on other NTC crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
