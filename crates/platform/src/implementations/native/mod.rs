//! Implementation backed by tokio's process support

pub mod process;

pub use process::TokioProcessRunner;
