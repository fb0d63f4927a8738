//! Utility modules shared by the pack tools
//!
//! This module contains various utility functions organized by functionality:
//! - `files`: Directory replication and deterministic tree walking
//! - `flags`: Strict boolean flag parsing for the command line
//! - `paths`: Relative path rendering and name validation

pub mod files;
pub mod flags;
pub mod paths;
