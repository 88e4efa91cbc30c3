//! # Shiftline Core
//!
//! Core types and errors for the Shiftline API.
//!
//! This crate provides the foundational error type used throughout the
//! Shiftline application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use shiftline_core::AppError;
//!
//! let error = AppError::unauthorized("Could not validate credentials");
//! ```

pub mod errors;

// Re-export commonly used types at crate root
pub use errors::AppError;
