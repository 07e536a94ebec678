pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod files;
pub mod forge;
pub mod git;
pub mod outcome;
pub mod output;
pub mod publish;
pub mod ui;
pub mod upstream;

pub use error::{BumpError, Result};
