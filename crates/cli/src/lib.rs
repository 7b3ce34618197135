//! Support code for the `dirwatch` binary

pub mod output;
pub mod settings;
