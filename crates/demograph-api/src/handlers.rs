//! Request handlers.

pub mod health;
pub mod predict;

pub use health::*;
