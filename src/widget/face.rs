//! Clock face construction and repainting

use crate::geometry::{
    self, HandAngles, FACE_CENTER, FACE_RADIUS, HANDS, NUMBERS, TICKS, VIEWBOX,
};
use crate::options::{ClockOptions, SizeSpec};
use crate::render::{NodeId, NodeKind, RenderTree};

/// Handles to the nodes a widget instance owns
#[derive(Debug, Clone)]
pub(crate) struct FaceNodes {
    pub root: NodeId,
    pub svg: NodeId,
    /// Hour, minute, second
    pub hands: [NodeId; 3],
}

/// Build the static face under the host surface: circle, four numbers,
/// three unrotated hands, twelve ticks
pub(crate) fn build_face<T: RenderTree>(tree: &mut T, options: &ClockOptions) -> FaceNodes {
    let root = tree.create_node(NodeKind::Container);
    tree.add_class(root, "clock-widget");
    tree.set_style(root, "position", "absolute");
    tree.set_style(root, "transition", "width .5s, height .5s");
    apply_size(tree, root, options.size);
    if let Some(transform) = mirror_transform(options) {
        tree.set_style(root, "transform", transform);
    }

    let svg = tree.create_node(NodeKind::Svg);
    tree.set_attr(svg, "viewBox", VIEWBOX);
    tree.set_attr(svg, "width", "100%");
    tree.set_attr(svg, "height", "100%");
    tree.append_child(root, svg);

    let circle = tree.create_node(NodeKind::Circle);
    tree.set_attr(circle, "cx", &FACE_CENTER.0.to_string());
    tree.set_attr(circle, "cy", &FACE_CENTER.1.to_string());
    tree.set_attr(circle, "r", &FACE_RADIUS.to_string());
    tree.append_child(svg, circle);

    let numbers = tree.create_node(NodeKind::Group);
    tree.add_class(numbers, "numbers");
    tree.append_child(svg, numbers);
    for label in NUMBERS {
        let text = tree.create_node(NodeKind::Text);
        tree.set_attr(text, "x", &label.x.to_string());
        tree.set_attr(text, "y", &label.y.to_string());
        tree.set_text(text, &label.number.to_string());
        tree.append_child(numbers, text);
    }

    let ticks = tree.create_node(NodeKind::Group);
    tree.add_class(ticks, "ticks");
    tree.append_child(svg, ticks);
    for tick in TICKS {
        let line = tree.create_node(NodeKind::Line);
        set_segment(tree, line, tick.x1, tick.y1, tick.x2, tick.y2);
        tree.append_child(ticks, line);
    }

    let hand_group = tree.create_node(NodeKind::Group);
    tree.add_class(hand_group, "hands");
    tree.append_child(svg, hand_group);
    let mut hands = [root; 3];
    for (i, hand) in HANDS.iter().enumerate() {
        let line = tree.create_node(NodeKind::Line);
        set_segment(tree, line, hand.x1, hand.y1, hand.x2, hand.y2);
        tree.append_child(hand_group, line);
        hands[i] = line;
    }

    tree.append_child(tree.surface(), root);

    FaceNodes { root, svg, hands }
}

fn set_segment<T: RenderTree>(tree: &mut T, node: NodeId, x1: f64, y1: f64, x2: f64, y2: f64) {
    tree.set_attr(node, "x1", &x1.to_string());
    tree.set_attr(node, "y1", &y1.to_string());
    tree.set_attr(node, "x2", &x2.to_string());
    tree.set_attr(node, "y2", &y2.to_string());
}

/// Rotate the three hands to the given angles
pub(crate) fn apply_hand_angles<T: RenderTree>(
    tree: &mut T,
    nodes: &FaceNodes,
    angles: &HandAngles,
) {
    let rotations = [angles.hour, angles.minute, angles.second];
    for (node, angle) in nodes.hands.iter().zip(rotations) {
        tree.set_attr(*node, "transform", &geometry::rotate_transform(angle));
    }
}

/// Resize the widget container; the transition installed at build time
/// animates the change
pub(crate) fn apply_size<T: RenderTree>(tree: &mut T, root: NodeId, size: SizeSpec) {
    let px = format!("{}px", size.resolve());
    tree.set_style(root, "width", &px);
    tree.set_style(root, "height", &px);
}

/// Compose the axis flips into a single transform. Both flags flip
/// about the face center, so they compose into one scale.
pub(crate) fn mirror_transform(options: &ClockOptions) -> Option<&'static str> {
    match (options.h_mirrored, options.v_mirrored) {
        (false, false) => None,
        (true, false) => Some("scale(-1, 1)"),
        (false, true) => Some("scale(1, -1)"),
        (true, true) => Some("scale(-1, -1)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemoryTree;

    #[test]
    fn face_has_circle_numbers_hands_and_ticks() {
        let mut tree = MemoryTree::new();
        let nodes = build_face(&mut tree, &ClockOptions::default());

        assert_eq!(tree.children(tree.surface()), vec![nodes.root]);
        assert_eq!(tree.attr(nodes.svg, "viewBox"), Some("0 0 100 100"));

        let groups = tree.children_of_kind(nodes.svg, NodeKind::Group);
        assert_eq!(groups.len(), 3);
        assert_eq!(tree.children(groups[0]).len(), 4); // numbers
        assert_eq!(tree.children(groups[1]).len(), 12); // ticks
        assert_eq!(tree.children(groups[2]).len(), 3); // hands

        let circle = tree.children_of_kind(nodes.svg, NodeKind::Circle)[0];
        assert_eq!(tree.attr(circle, "r"), Some("45"));
    }

    #[test]
    fn default_size_is_medium() {
        let mut tree = MemoryTree::new();
        let nodes = build_face(&mut tree, &ClockOptions::default());
        assert_eq!(tree.style(nodes.root, "width"), Some("200px"));
        assert_eq!(tree.style(nodes.root, "height"), Some("200px"));
    }

    #[test]
    fn resize_transition_is_installed_at_build_time() {
        let mut tree = MemoryTree::new();
        let nodes = build_face(&mut tree, &ClockOptions::default());
        assert_eq!(
            tree.style(nodes.root, "transition"),
            Some("width .5s, height .5s")
        );
    }

    #[test]
    fn mirror_flags_compose() {
        let both = ClockOptions {
            h_mirrored: true,
            v_mirrored: true,
            ..Default::default()
        };
        assert_eq!(mirror_transform(&both), Some("scale(-1, -1)"));
        assert_eq!(mirror_transform(&ClockOptions::default()), None);
    }

    #[test]
    fn hand_rotations_land_on_the_hand_nodes() {
        let mut tree = MemoryTree::new();
        let nodes = build_face(&mut tree, &ClockOptions::default());

        apply_hand_angles(
            &mut tree,
            &nodes,
            &HandAngles {
                hour: 315.0,
                minute: 180.0,
                second: 0.0,
            },
        );

        assert_eq!(
            tree.attr(nodes.hands[0], "transform"),
            Some("rotate(315 50 50)")
        );
        assert_eq!(
            tree.attr(nodes.hands[1], "transform"),
            Some("rotate(180 50 50)")
        );
        assert_eq!(
            tree.attr(nodes.hands[2], "transform"),
            Some("rotate(0 50 50)")
        );
    }
}
