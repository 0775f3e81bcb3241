//! Storybook Engine — passages and illustrations for picture books.
//!
//! Writes short Korean passages for each page of a story from its
//! keywords, pacing them across a five-stage dramatic arc with correct
//! particle inflection, and resolves every page to an illustration URL
//! against a renderer that is allowed to fail. Passages written by an
//! external text model are reconciled onto the pages that asked for them.

pub mod assets;
pub mod config;
pub mod core;
pub mod error;
pub mod external;
pub mod schema;
#[cfg(feature = "http")]
pub mod service;

pub use crate::config::StorybookConfig;
pub use crate::error::StoryError;
pub use crate::schema::batch::GenerationBatch;
#[cfg(feature = "http")]
pub use crate::service::{StoryService, WritingMode};
