//! Loading of review records

pub mod loader;

pub use loader::{LoadReport, ReviewLoader};
