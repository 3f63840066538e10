#![forbid(unsafe_code)]

pub mod catalog;
pub mod merge;
pub mod model;
pub mod progress;
pub mod time;

pub use catalog::{Catalog, CatalogError};
pub use time::Clock;
