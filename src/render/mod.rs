//! Display-surface abstraction
//!
//! The widget renders through the `RenderTree` trait instead of a real
//! DOM, and every instance owns the node handles it creates; nothing is
//! ever looked up by a global identifier. `MemoryTree` is a complete
//! in-memory implementation used by tests and headless hosts.

pub mod memory;
pub mod tree;

// Re-export main types
pub use memory::MemoryTree;
pub use tree::{
    ListenerId, NodeId, NodeKind, PointerEvent, PointerHandler, PointerKind, RenderTree,
};
