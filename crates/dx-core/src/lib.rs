pub mod command;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod inventory;
pub mod io;
pub mod paths;
pub mod prompt;
pub mod runner;
pub mod schema;
pub mod templates;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{DxError, Result};
