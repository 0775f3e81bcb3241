//! The deterministic core: particle selection, arc staging, passage
//! synthesis, and reconciliation of externally written passages.

pub mod extraction;
pub mod josa;
pub mod outline;
pub mod phrasing;
pub mod reconcile;
pub mod stage;
pub mod synthesizer;
