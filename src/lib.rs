//! Clock Widget - An embeddable analog clock with a pausable scheduler
//!
//! This library renders an analog clock face into a host-provided
//! render tree and animates its hands on a pausable, retunable interval
//! timer. The simulated time can run forward, backward (countdown), or
//! oscillate (low-battery mode), and the widget can optionally be
//! repositioned by dragging.

pub mod geometry;
pub mod options;
pub mod render;
pub mod state;
pub mod tasks;
pub mod widget;

// Re-export commonly used types
pub use options::{ClockOptions, ClockPatch, SizeSpec};
pub use render::{MemoryTree, NodeId, NodeKind, PointerEvent, PointerKind, RenderTree};
pub use state::ClockState;
pub use tasks::IntervalTimer;
pub use widget::ClockWidget;
