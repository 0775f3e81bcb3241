//! Plain records exchanged with callers: page requests and results,
//! story context, and the arc stages pages are assigned to.

pub mod batch;
pub mod page;
pub mod stage;
pub mod story;
