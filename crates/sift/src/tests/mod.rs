//! Unit tests for the `sift` pipeline stages.

mod algebra_tests;
mod compiler_tests;
mod engine_tests;
