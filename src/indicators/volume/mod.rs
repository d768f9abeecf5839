//! Volume indicators

pub mod profile;

pub use profile::*;
