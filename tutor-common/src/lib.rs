//! # Adaptive Tutor Common Library
//!
//! Shared code for the adaptive tutor services:
//! - Error type used during bootstrap and configuration
//! - TOML configuration discovery and loading
//! - Request authentication primitives (timestamp + hash)

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
