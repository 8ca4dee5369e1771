//! Configuration system for keepachange

pub mod defaults;
mod loader;
mod types;

pub use defaults::*;
pub use loader::*;
pub use types::*;
