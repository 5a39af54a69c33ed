//! Outbound HTTP helper

pub mod adapter;

pub use adapter::{HttpAdapter, delete, get, patch, post, put};
