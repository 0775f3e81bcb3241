//! Illustration URLs and their availability.

#[cfg(feature = "http")]
pub mod probe;
pub mod resolver;
