//! Common utilities for the Trellis layout tree.
//!
//! This crate provides shared infrastructure used by all layout components:
//! - **Warning System** - deduplicated `tracing` warnings for unsupported features

pub mod warning;
