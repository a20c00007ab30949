//! Utility types and functions for XDMF import.
//!
//! This module contains fundamental types used throughout the library:
//! - [`NumberType`] - Element types of binary payloads
//! - [`Dimensions`] - DataItem array shape
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod number_type;
mod error;
mod math;
mod dimensions;

pub use number_type::*;
pub use error::*;
pub use math::*;
pub use dimensions::*;
