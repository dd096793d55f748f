//! # Mapping Module
//!
//! Bindings from logical controls to replayable actions.

pub mod action;
pub mod table;

pub use action::{ActionParseError, ActionSpec};
pub use table::MappingTable;
