//! Core abstractions for stock-research
//!
//! This crate defines the [`Chain`] trait that every prompt-driven step
//! implements, the [`ChainValues`] store that steps read from and write to,
//! and the shared [`Error`] type.

pub mod chain;
pub mod error;
pub mod values;

pub use chain::Chain;
pub use error::{Error, Result};
pub use values::ChainValues;
