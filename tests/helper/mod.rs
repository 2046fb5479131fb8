//! Shared utilities for integration tests

#![allow(dead_code)]

mod source;

pub use source::*;
