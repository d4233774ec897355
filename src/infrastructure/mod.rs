//! Environment-facing helpers: data directory resolution and path expansion.

pub mod paths;

pub use paths::{data_dir, expand_tilde};
