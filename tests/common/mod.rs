//! Common test utilities and fixtures for dateindex integration tests
//!
//! This module provides:
//! - `IndexFixture` builder for a scratch source tree and index root
//! - Helpers for waiting on filesystem state written by background threads

#![allow(dead_code)]


pub use fixture::{wait_until, IndexFixture};
