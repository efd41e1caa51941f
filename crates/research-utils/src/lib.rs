//! Shared utilities for stock-research
//!
//! Logging setup and environment-driven configuration used by the library
//! crates and the `stock-research` binary.

pub mod env;
pub mod logging;

pub use env::{EnvError, env_or, env_parse, env_var, load_dotenv};
pub use logging::{init_environment, init_tracing};
