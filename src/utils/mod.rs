//! Utility modules for common functionality
//!
//! This module provides the logger and small helpers used throughout the application.

pub mod logger;
pub(crate) mod string_utils;
