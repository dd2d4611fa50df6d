//! Integration layer - interfaces to the event source.

pub mod connection;

pub use connection::{BoxedConnection, Connection};
