//! Plot utilities

pub mod colors;

pub use colors::*;
