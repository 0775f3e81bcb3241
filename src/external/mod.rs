//! Collaboration with external text models.

#[cfg(feature = "http")]
pub mod gemini;
pub mod generator;
pub mod translate;
pub mod writer;
