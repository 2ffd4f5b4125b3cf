//! Feature implementations for breathe.

pub mod breathing;
