pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod registry;
pub mod runner;
pub mod ui;
pub mod warnings;

pub use error::{PublishError, Result};
