//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! configuration once, builds the [`Toolchain`](crate::toolchain::Toolchain)
//! and routes CLI subcommands to their implementations.

pub mod cache;
pub mod dispatcher;
pub mod find;
pub mod libs;
pub mod probe;
pub mod provision;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, EXIT_NOT_FOUND};
