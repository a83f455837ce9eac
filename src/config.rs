//! Configuration loader and schema types.
//!
//! This module exposes the daemon's configuration schema and the
//! helpers that load it from disk and environment.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
