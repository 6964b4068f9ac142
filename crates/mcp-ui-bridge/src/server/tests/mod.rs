//! Cross-module server tests; unit tests for individual pieces live
//! alongside their implementation files.

mod end_to_end;
