//! Common test utilities for doyline.
//!
//! This module provides shared utilities for the integration tests.

// Not every test binary uses every helper
#![allow(dead_code)]

pub mod assertions;
pub mod image_utils;
pub mod test_data;
