//! Command implementations for the ARCL CLI
//!
//! Each command reads its input through [`crate::source`] and delegates to
//! the `arcl` crate.

pub mod ast;
pub mod check;
pub mod eval;
pub mod tokens;
