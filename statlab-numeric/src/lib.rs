// statlab-numeric/src/lib.rs
//! Numerical primitives for statlab.
//!
//! Everything here is `no_std` + `alloc` so the same routines can be reused
//! by the server, the headless CLI and any embedded front-end build.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod descriptive;
pub mod distribution;
pub mod error;
pub mod histogram;
pub mod hypothesis;
pub mod regression;
pub mod special;

pub use error::NumericError;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, NumericError>;
