#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform abstraction layer for pscaf.
//!
//! This crate provides the operations a scaffolding run performs against the
//! host system:
//! - Process execution with optional echo and line streaming as events
//! - Filesystem helpers for staging and cleaning the build directory
//!
//! External programs are invoked through the [`ProcessRunner`] trait so the
//! workflow can be exercised against a scripted runner.

pub mod core;
pub mod fs;
pub mod implementations;
pub mod process;

pub use core::PlatformContext;
pub use implementations::native::TokioProcessRunner;
pub use process::{CommandOutput, PlatformCommand, ProcessRunner};
