//! Unit tests for `sift_core` types.

mod kind_tests;
mod query_tests;
mod result_tests;
