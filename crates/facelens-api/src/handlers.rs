//! Request handlers.

pub mod faces;
pub mod health;

pub use faces::*;
pub use health::*;
