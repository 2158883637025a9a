//! Common utilities for language backend implementations
//!
//! # Modules
//!
//! - [`lexical`] - identifier scanning, keyword tables, whole-word replacement
//! - [`statements`] - grouping a selection into complete statements
//! - [`declarations`] - regex-driven declaration tables
//! - [`jvm`] - Java/Kotlin source roots, package declarations and type moves
//! - [`refusal`] - identify-but-refuse outcomes

pub mod declarations;
pub mod jvm;
pub mod lexical;
pub mod refusal;
pub mod statements;

pub use declarations::{declaration_at, scan_declarations, Declaration};
pub use refusal::{refuse_extract, refuse_move, RefusalStyle};
pub use statements::statements_in_range;
