//! Drag-to-reposition interaction
//!
//! Enabling drag registers exactly three listeners: pointer-down on the
//! widget root, pointer-move and pointer-up on the host surface. The
//! registrations are kept as an explicit set so disabling removes
//! precisely what enabling added.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use crate::render::{ListenerId, NodeId, PointerKind, RenderTree};

/// Shared drag interaction state.
///
/// Lives behind its own lock, separate from the widget state, because
/// the handlers run inside host event dispatch.
#[derive(Debug, Default)]
pub(crate) struct DragState {
    dragging: bool,
    /// Pointer-to-widget offset recorded on pointer-down
    offset: (f64, f64),
    /// Current absolute position of the widget, in pixels
    position: (f64, f64),
}

/// One listener registration made by `enable`
#[derive(Debug)]
pub(crate) struct DragBinding {
    pub node: NodeId,
    pub kind: PointerKind,
    pub id: ListenerId,
}

/// Attach the three drag listeners and return their registrations
pub(crate) fn enable<T: RenderTree>(
    tree: &mut T,
    root: NodeId,
    state: Arc<Mutex<DragState>>,
) -> Vec<DragBinding> {
    let surface = tree.surface();
    debug!("Enabling drag interaction");

    let down = {
        let state = Arc::clone(&state);
        Box::new(move |tree: &mut T, event: &crate::render::PointerEvent| {
            let mut drag = state.lock().unwrap_or_else(PoisonError::into_inner);
            drag.dragging = true;
            drag.offset = (event.x - drag.position.0, event.y - drag.position.1);
            drop(drag);
            tree.add_class(root, "dragging");
        })
    };

    let moved = {
        let state = Arc::clone(&state);
        Box::new(move |tree: &mut T, event: &crate::render::PointerEvent| {
            let mut drag = state.lock().unwrap_or_else(PoisonError::into_inner);
            if !drag.dragging {
                return;
            }
            drag.position = (event.x - drag.offset.0, event.y - drag.offset.1);
            let (left, top) = drag.position;
            drop(drag);
            tree.set_style(root, "left", &format!("{}px", left));
            tree.set_style(root, "top", &format!("{}px", top));
        })
    };

    let up = Box::new(move |tree: &mut T, _: &crate::render::PointerEvent| {
        let mut drag = state.lock().unwrap_or_else(PoisonError::into_inner);
        drag.dragging = false;
        drop(drag);
        tree.remove_class(root, "dragging");
    });

    vec![
        DragBinding {
            node: root,
            kind: PointerKind::Down,
            id: tree.add_listener(root, PointerKind::Down, down),
        },
        DragBinding {
            node: surface,
            kind: PointerKind::Move,
            id: tree.add_listener(surface, PointerKind::Move, moved),
        },
        DragBinding {
            node: surface,
            kind: PointerKind::Up,
            id: tree.add_listener(surface, PointerKind::Up, up),
        },
    ]
}

/// Remove every registration made by `enable`
pub(crate) fn disable<T: RenderTree>(tree: &mut T, bindings: Vec<DragBinding>) {
    debug!("Disabling drag interaction ({} listeners)", bindings.len());
    for binding in bindings {
        trace!("Removing {:?} listener on {:?}", binding.kind, binding.node);
        tree.remove_listener(binding.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MemoryTree, NodeKind, PointerEvent};

    fn setup() -> (MemoryTree, NodeId, Vec<DragBinding>) {
        let mut tree = MemoryTree::new();
        let root = tree.create_node(NodeKind::Container);
        tree.append_child(tree.surface(), root);
        let bindings = enable(&mut tree, root, Arc::default());
        (tree, root, bindings)
    }

    #[test]
    fn enable_registers_exactly_three_listeners() {
        let (tree, root, bindings) = setup();
        assert_eq!(bindings.len(), 3);
        assert_eq!(tree.listener_count(), 3);
        assert_eq!(tree.listener_count_on(root), 1);
        assert_eq!(tree.listener_count_on(tree.surface()), 2);
    }

    #[test]
    fn disable_removes_exactly_those_listeners() {
        let (mut tree, _, bindings) = setup();
        disable(&mut tree, bindings);
        assert_eq!(tree.listener_count(), 0);
    }

    #[test]
    fn down_move_up_repositions_by_pointer_offset() {
        let (mut tree, root, _bindings) = setup();
        let surface = tree.surface();

        tree.dispatch(root, PointerKind::Down, PointerEvent { x: 30.0, y: 40.0 });
        assert!(tree.has_class(root, "dragging"));

        tree.dispatch(surface, PointerKind::Move, PointerEvent { x: 90.0, y: 45.0 });
        assert_eq!(tree.style(root, "left"), Some("60px"));
        assert_eq!(tree.style(root, "top"), Some("5px"));

        tree.dispatch(surface, PointerKind::Up, PointerEvent { x: 90.0, y: 45.0 });
        assert!(!tree.has_class(root, "dragging"));
    }

    #[test]
    fn moves_without_a_down_are_ignored() {
        let (mut tree, root, _bindings) = setup();
        let surface = tree.surface();

        tree.dispatch(surface, PointerKind::Move, PointerEvent { x: 90.0, y: 45.0 });
        assert_eq!(tree.style(root, "left"), None);
    }

    #[test]
    fn second_drag_starts_from_the_last_position() {
        let (mut tree, root, _bindings) = setup();
        let surface = tree.surface();

        tree.dispatch(root, PointerKind::Down, PointerEvent { x: 10.0, y: 10.0 });
        tree.dispatch(surface, PointerKind::Move, PointerEvent { x: 20.0, y: 10.0 });
        tree.dispatch(surface, PointerKind::Up, PointerEvent { x: 20.0, y: 10.0 });
        assert_eq!(tree.style(root, "left"), Some("10px"));

        // Grab the widget again at its new position
        tree.dispatch(root, PointerKind::Down, PointerEvent { x: 25.0, y: 12.0 });
        tree.dispatch(surface, PointerKind::Move, PointerEvent { x: 30.0, y: 12.0 });
        assert_eq!(tree.style(root, "left"), Some("15px"));
    }
}
