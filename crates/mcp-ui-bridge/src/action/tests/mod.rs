//! Property-based tests for the action protocol.
//!
//! Unit tests for each function live alongside their implementation
//! (`validate.rs`, `origin.rs`, `sanitize.rs`); this module holds the
//! randomized invariant checks called for in the spec's testable
//! properties section.

mod proptests;
