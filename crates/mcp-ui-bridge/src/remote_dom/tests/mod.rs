//! Property-based tests for reconciliation and serialization.
//!
//! Unit tests for each piece live alongside their implementation
//! (`component.rs`, `reconcile.rs`, `render.rs`, `format.rs`); this module
//! holds the randomized invariant checks called for in the spec's
//! testable properties section.
