//! Error types produced by the lookup engine.

mod constructors;
mod types;

pub use types::HieraError;

/// Result alias used throughout the crate.
pub type HieraResult<T> = Result<T, HieraError>;

#[cfg(test)]
mod tests;
