//! Core Chain trait definition

use crate::{ChainValues, Result};
use async_trait::async_trait;

/// A single step in an analysis pipeline
///
/// A chain declares which variables it reads and which it writes. Callers
/// hand it a shared [`ChainValues`] store; the chain reads its inputs from
/// the store and inserts its outputs back into it. This keeps chains
/// composable: a sequential runner only has to check that every input key
/// is produced by someone before the chain runs.
#[async_trait]
pub trait Chain: Send + Sync {
    /// Get the chain's name (used in progress reporting and logs)
    fn name(&self) -> &str;

    /// Variables this chain reads
    fn input_keys(&self) -> Vec<String>;

    /// Variables this chain writes
    fn output_keys(&self) -> Vec<String>;

    /// Run the chain against the shared value store
    async fn call(&self, values: &mut ChainValues) -> Result<()>;
}
