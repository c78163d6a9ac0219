//! In-memory render tree for tests and headless hosts

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::trace;

use super::tree::{
    ListenerId, NodeId, NodeKind, PointerEvent, PointerHandler, PointerKind, RenderTree,
};

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            styles: BTreeMap::new(),
            classes: BTreeSet::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

struct ListenerEntry {
    node: NodeId,
    kind: PointerKind,
    // Taken out of the slot while its handler runs, so dispatch can
    // hand the tree to the handler mutably
    handler: Option<PointerHandler<MemoryTree>>,
}

/// An in-memory `RenderTree`.
///
/// Mirrors the tolerance of a real DOM host: operations on nodes that
/// were never created or already removed are silent no-ops.
pub struct MemoryTree {
    surface: NodeId,
    nodes: HashMap<NodeId, NodeData>,
    listeners: BTreeMap<ListenerId, ListenerEntry>,
    next_node: u64,
    next_listener: u64,
}

impl MemoryTree {
    pub fn new() -> Self {
        let surface = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(surface, NodeData::new(NodeKind::Container));
        Self {
            surface,
            nodes,
            listeners: BTreeMap::new(),
            next_node: 1,
            next_listener: 0,
        }
    }

    /// Deliver a pointer event to every listener registered for this
    /// node and kind, in registration order
    pub fn dispatch(&mut self, node: NodeId, kind: PointerKind, event: PointerEvent) {
        let ids: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|(_, entry)| entry.node == node && entry.kind == kind)
            .map(|(id, _)| *id)
            .collect();

        for id in ids {
            let Some(mut handler) = self
                .listeners
                .get_mut(&id)
                .and_then(|entry| entry.handler.take())
            else {
                continue;
            };
            handler(self, &event);
            // The handler may have removed its own registration
            if let Some(entry) = self.listeners.get_mut(&id) {
                entry.handler = Some(handler);
            }
        }
    }

    // Read accessors for hosts and tests

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.get(&node).map(|n| n.kind)
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|n| n.styles.get(property))
            .map(String::as_str)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.text.as_str())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(&node)
            .map(|n| n.classes.contains(class))
            .unwrap_or(false)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Children of the given kind, in document order
    pub fn children_of_kind(&self, node: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.children(node)
            .into_iter()
            .filter(|child| self.kind(*child) == Some(kind))
            .collect()
    }

    /// Number of live listener registrations across the whole tree
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of live listener registrations on one node
    pub fn listener_count_on(&self, node: NodeId) -> usize {
        self.listeners
            .values()
            .filter(|entry| entry.node == node)
            .count()
    }

    fn remove_subtree(&mut self, node: NodeId) {
        let Some(data) = self.nodes.remove(&node) else {
            return;
        };
        for child in data.children {
            self.remove_subtree(child);
        }
        self.listeners.retain(|_, entry| entry.node != node);
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTree for MemoryTree {
    fn surface(&self) -> NodeId {
        self.surface
    }

    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(id, NodeData::new(kind));
        trace!("Created {:?} node {:?}", kind, id);
        id
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        // Appending moves the node: detach it from its prior parent
        let prior = self.nodes.get(&child).and_then(|n| n.parent);
        if let Some(prior) = prior {
            if let Some(data) = self.nodes.get_mut(&prior) {
                data.children.retain(|c| *c != child);
            }
        }
        if let Some(data) = self.nodes.get_mut(&child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.nodes.get_mut(&parent) {
            data.children.push(child);
        }
    }

    fn remove_node(&mut self, node: NodeId) {
        let parent = self.nodes.get(&node).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(data) = self.nodes.get_mut(&parent) {
                data.children.retain(|c| *c != node);
            }
        }
        self.remove_subtree(node);
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.text = text.to_string();
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.classes.remove(class);
        }
    }

    fn add_listener(
        &mut self,
        node: NodeId,
        kind: PointerKind,
        handler: PointerHandler<Self>,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(
            id,
            ListenerEntry {
                node,
                kind,
                handler: Some(handler),
            },
        );
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn nodes_carry_attrs_styles_and_classes() {
        let mut tree = MemoryTree::new();
        let node = tree.create_node(NodeKind::Line);
        tree.append_child(tree.surface(), node);

        tree.set_attr(node, "x1", "50");
        tree.set_style(node, "left", "10px");
        tree.add_class(node, "dragging");

        assert_eq!(tree.attr(node, "x1"), Some("50"));
        assert_eq!(tree.style(node, "left"), Some("10px"));
        assert!(tree.has_class(node, "dragging"));

        tree.remove_class(node, "dragging");
        assert!(!tree.has_class(node, "dragging"));
    }

    #[test]
    fn remove_node_drops_subtree_and_its_listeners() {
        let mut tree = MemoryTree::new();
        let group = tree.create_node(NodeKind::Group);
        let line = tree.create_node(NodeKind::Line);
        tree.append_child(tree.surface(), group);
        tree.append_child(group, line);
        tree.add_listener(line, PointerKind::Down, Box::new(|_, _| {}));

        tree.remove_node(group);

        assert!(!tree.contains(group));
        assert!(!tree.contains(line));
        assert_eq!(tree.listener_count(), 0);
        assert!(tree.children(tree.surface()).is_empty());
    }

    #[test]
    fn append_moves_a_node_between_parents() {
        let mut tree = MemoryTree::new();
        let first = tree.create_node(NodeKind::Group);
        let second = tree.create_node(NodeKind::Group);
        let line = tree.create_node(NodeKind::Line);
        tree.append_child(tree.surface(), first);
        tree.append_child(tree.surface(), second);

        tree.append_child(first, line);
        tree.append_child(second, line);

        assert!(tree.children(first).is_empty());
        assert_eq!(tree.children(second), vec![line]);
    }

    #[test]
    fn dispatch_runs_listeners_in_registration_order() {
        let mut tree = MemoryTree::new();
        let node = tree.create_node(NodeKind::Container);
        tree.append_child(tree.surface(), node);

        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            tree.add_listener(
                node,
                PointerKind::Down,
                Box::new(move |_, _| {
                    order.lock().unwrap().push(tag);
                }),
            );
        }

        tree.dispatch(node, PointerKind::Down, PointerEvent { x: 0.0, y: 0.0 });
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn operations_on_removed_nodes_are_no_ops() {
        let mut tree = MemoryTree::new();
        let node = tree.create_node(NodeKind::Circle);
        tree.remove_node(node);

        tree.set_attr(node, "r", "45");
        tree.set_style(node, "left", "1px");
        tree.add_class(node, "x");
        tree.append_child(tree.surface(), node);

        assert_eq!(tree.attr(node, "r"), None);
        assert!(tree.children(tree.surface()).is_empty());
    }

    #[test]
    fn dispatch_reaches_matching_listeners_only() {
        let mut tree = MemoryTree::new();
        let node = tree.create_node(NodeKind::Container);
        tree.append_child(tree.surface(), node);

        let downs = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&downs);
        tree.add_listener(
            node,
            PointerKind::Down,
            Box::new(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tree.dispatch(node, PointerKind::Down, PointerEvent { x: 1.0, y: 2.0 });
        tree.dispatch(node, PointerKind::Move, PointerEvent { x: 1.0, y: 2.0 });
        tree.dispatch(
            tree.surface(),
            PointerKind::Down,
            PointerEvent { x: 1.0, y: 2.0 },
        );

        assert_eq!(downs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handlers_may_mutate_the_tree_during_dispatch() {
        let mut tree = MemoryTree::new();
        let node = tree.create_node(NodeKind::Container);
        tree.append_child(tree.surface(), node);

        tree.add_listener(
            node,
            PointerKind::Move,
            Box::new(move |tree, event| {
                tree.set_style(node, "left", &format!("{}px", event.x));
            }),
        );

        tree.dispatch(node, PointerKind::Move, PointerEvent { x: 40.0, y: 0.0 });
        assert_eq!(tree.style(node, "left"), Some("40px"));
    }

    #[test]
    fn removed_listeners_no_longer_fire() {
        let mut tree = MemoryTree::new();
        let node = tree.create_node(NodeKind::Container);

        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        let id = tree.add_listener(
            node,
            PointerKind::Up,
            Box::new(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        tree.remove_listener(id);

        tree.dispatch(node, PointerKind::Up, PointerEvent { x: 0.0, y: 0.0 });
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(tree.listener_count(), 0);
    }
}
