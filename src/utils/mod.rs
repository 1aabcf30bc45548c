//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - constants: Constants for the application
//! - logging: Logging utilities
//! - parsing: Address and amount parsing helpers
//! - tests: Test helper builders

pub mod constants;
pub mod logging;
pub mod parsing;


pub use constants::*;
pub use parsing::*;
