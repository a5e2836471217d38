//! Domain data model
//!
//! - `common`: opaque identifier newtypes
//! - `booking`: booking record and status sum type
//! - `audit`: audit trail entries and drafts

mod audit;
mod booking;
mod common;

pub use audit::*;
pub use booking::*;
pub use common::*;
