//! Data models
//!
//! Shared between crave-server and its API clients.
//! Wire format is camelCase JSON; ids are UUID strings.

pub mod category;
pub mod order;
pub mod product;
pub mod report;

// Re-exports
pub use category::*;
pub use order::*;
pub use product::*;
pub use report::*;
