//! Emission routines, one per recognized node kind.

mod expr;
mod stmt;
