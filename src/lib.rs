pub mod access;
pub mod entity;
pub mod error;
pub mod graph;
pub mod payload;
pub mod traversal;

pub use access::{Action, Gate};
pub use error::{CausewayError, Result};
pub use graph::BoardGraph;
pub use payload::BoardPayload;
