//! Clients produced by the service factory

pub mod attributes;
pub mod queue;
pub mod table;

pub use queue::{QueueClient, ReceivedMessage};
pub use table::{KeyValueTable, TableBinding};
