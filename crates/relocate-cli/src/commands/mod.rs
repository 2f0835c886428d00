//! CLI commands

pub mod relocate;
