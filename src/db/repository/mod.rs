//! Repository layer — knowledge-base scoped database operations.
//!
//! One sub-module per persisted record set. All public functions are
//! re-exported here.

mod drug;
mod interaction;

pub use drug::*;
pub use interaction::*;
