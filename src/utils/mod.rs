//! Shared utility functions.
//!
//! - `dates`: archive coverage window and quarter arithmetic
//! - `html`: filing body extraction

pub mod dates;
pub mod html;
