//! Command line tooling for Platinum Games archives.
//!
//! The binary is a thin layer over [`commands`]; [`registry`] and [`tree`] are usable on their
//! own to open nested archives the same way the `tree` command does.

pub mod commands;
pub mod registry;
pub mod tree;
