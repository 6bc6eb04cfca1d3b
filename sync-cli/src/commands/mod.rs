//! CLI command implementations.

pub mod clear;
pub mod load;
pub mod render;
pub mod show;
pub mod status;
