pub mod adjacency;
pub mod edges;
pub mod error;
pub mod hidden;
pub mod math;
pub mod mesh;
pub mod surface;
pub mod visibility;

pub use error::{Result, VergeError};
