// Library crate exposing modules for the binary and integration tests

pub mod config;
pub mod error;
pub mod forge;
pub mod inspect;
pub mod model;
pub mod repository;
pub mod util;

pub use error::{CrawlError, Result};
