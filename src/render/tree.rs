//! Render-tree trait and event types

/// Handle to a node owned by a render tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Handle to a registered pointer listener. Ordered so registrations
/// can be kept and dispatched in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// The node kinds the widget needs from a host surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Container,
    Svg,
    Group,
    Circle,
    Line,
    Text,
}

/// Pointer event kinds the drag interaction listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in host surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

/// Pointer listener callback. The tree is handed back mutably so a
/// handler can restyle nodes during dispatch.
pub type PointerHandler<T> = Box<dyn FnMut(&mut T, &PointerEvent) + Send>;

/// A DOM-like tree of visual nodes provided by the host.
///
/// Operations on unknown or removed nodes must be tolerated as no-ops;
/// the widget is best-effort and never validates its rendering.
pub trait RenderTree: Sized {
    /// The host surface node that widgets mount into
    fn surface(&self) -> NodeId;

    fn create_node(&mut self, kind: NodeKind) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Remove a node and its subtree
    fn remove_node(&mut self, node: NodeId);

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);

    fn set_text(&mut self, node: NodeId, text: &str);

    /// Mutate one inline style property
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn add_listener(
        &mut self,
        node: NodeId,
        kind: PointerKind,
        handler: PointerHandler<Self>,
    ) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);
}
