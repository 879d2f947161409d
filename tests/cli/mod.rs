//! Tests for the dateindex binary

mod args_tests;
#[cfg(unix)]
mod run_tests;
