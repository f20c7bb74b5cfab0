//! Core types for the mind map kernel.

pub mod node;
pub mod edge;
pub mod mode;
pub mod seed;
pub mod payload;

pub use node::{NodeId, Node, Position, Side};
pub use edge::Edge;
pub use mode::Mode;
pub use seed::{SeedNode, SeedError};
pub use payload::{SavePayload, PayloadNode, PayloadEdge, SaveReceipt};
