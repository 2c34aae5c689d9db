//! Test helpers shared across crates.
//!
//! This crate currently provides [`tree::DataTree`], a temporary hieradata
//! directory with helpers for writing data files and base configurations.

pub mod tree;
