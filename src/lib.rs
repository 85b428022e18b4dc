pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod market;
pub mod response;
pub mod service;
pub mod universe;

#[cfg(test)]
mod testing;

pub use error::{AppError, FetchError, Result};
