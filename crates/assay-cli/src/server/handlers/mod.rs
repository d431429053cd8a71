//! API request handlers.

mod analyze;
mod clean;
mod health;

pub use analyze::*;
pub use clean::*;
pub use health::*;
