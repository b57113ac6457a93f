//! Boundary tree navigation for interactive visualization.

use bsp_solid::SubPlane;
use bsp_solid::bsp::{BoundaryNode, BoundaryTree};
use macroquad::prelude::*;

use crate::{draw_facet, facet_color};

/// Side taken at each node in the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Plus,
    Minus,
}

/// Interactive navigator for exploring the structure of a boundary tree.
#[derive(Debug, Default)]
pub struct TreeNavigator {
    path: Vec<Direction>,
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to step into the subtree on `direction`'s side of the cut.
    ///
    /// Returns true if there is such a subtree.
    pub fn go(&mut self, tree: &BoundaryTree, direction: Direction) -> bool {
        let child = self.current_node(tree).and_then(|node| match direction {
            Direction::Plus => node.plus(),
            Direction::Minus => node.minus(),
        });
        if child.is_some() {
            self.path.push(direction);
        }
        child.is_some()
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update(&mut self, tree: &BoundaryTree) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::Equal) {
            changed = self.go(tree, Direction::Plus);
        }
        if is_key_pressed(KeyCode::Minus) {
            changed = self.go(tree, Direction::Minus);
        }
        if is_key_pressed(KeyCode::P) {
            changed = self.go_parent();
        }
        if is_key_pressed(KeyCode::R) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        changed
    }

    /// Returns the current node, if the tree is non-empty.
    pub fn current_node<'a>(&self, tree: &'a BoundaryTree) -> Option<&'a BoundaryNode> {
        tree.root().and_then(|root| node_at_path(root, &self.path))
    }

    /// Draws the facets of the current subtree, the cut's own facets brighter.
    pub fn render(&self, tree: &BoundaryTree) {
        let Some(node) = self.current_node(tree) else {
            return;
        };
        let mut facets = Vec::new();
        subtree_facets(node, &mut facets);
        for facet in facets {
            draw_facet(facet, facet_color(facet));
        }
        for facet in node.attribute().facets() {
            draw_facet(facet, WHITE);
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, tree: &BoundaryTree, y_offset: f32) {
        let (facets, has_plus, has_minus) = match self.current_node(tree) {
            Some(node) => (node.facet_count(), node.plus().is_some(), node.minus().is_some()),
            None => (0, false, false),
        };

        let path = if self.path.is_empty() {
            "root".to_owned()
        } else {
            self.path
                .iter()
                .map(|d| match d {
                    Direction::Plus => "+",
                    Direction::Minus => "-",
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        draw_text(&format!("Subtree: {facets} facets"), 10.0, y_offset, 18.0, WHITE);
        draw_text(
            &format!("Path: {path} (depth {})", self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            &format!(
                "Children: {}{}",
                if has_plus { "[+] outside " } else { "(outside cell) " },
                if has_minus { "[-] inside" } else { "(inside cell)" },
            ),
            10.0,
            y_offset + 40.0,
            18.0,
            GREEN,
        );
        draw_text("[P]arent | [R]oot", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }
}

/// Follows the path from `root`; `None` if the path leaves the tree.
fn node_at_path<'a>(root: &'a BoundaryNode, path: &[Direction]) -> Option<&'a BoundaryNode> {
    let mut current = root;
    for direction in path {
        current = match direction {
            Direction::Plus => current.plus()?,
            Direction::Minus => current.minus()?,
        };
    }
    Some(current)
}

fn subtree_facets<'a>(node: &'a BoundaryNode, facets: &mut Vec<&'a SubPlane>) {
    facets.extend(node.attribute().facets());
    for child in [node.minus(), node.plus()].into_iter().flatten() {
        subtree_facets(child, facets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_solid::Polyhedron;
    use nalgebra::Point3;

    fn cube_tree() -> BoundaryTree {
        Polyhedron::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0), 1e-10)
            .unwrap()
            .tree()
            .clone()
    }

    #[test]
    fn walks_down_and_back() {
        let tree = cube_tree();
        let mut navigator = TreeNavigator::new();

        // The outside of a face cut is empty.
        assert!(!navigator.go(&tree, Direction::Plus));
        assert!(navigator.go(&tree, Direction::Minus));
        assert_eq!(navigator.depth(), 1);
        assert_eq!(navigator.current_node(&tree).unwrap().facet_count(), 5);

        assert!(navigator.go_parent());
        assert!(!navigator.go_parent());
        assert!(navigator.path().is_empty());
    }

    #[test]
    fn subtree_collects_every_facet() {
        let tree = cube_tree();
        let mut facets = Vec::new();
        subtree_facets(tree.root().unwrap(), &mut facets);
        assert_eq!(facets.len(), 6);
    }

    #[test]
    fn empty_tree_has_no_node() {
        let mut navigator = TreeNavigator::new();
        assert!(navigator.current_node(&BoundaryTree::new()).is_none());
        assert!(!navigator.go(&BoundaryTree::new(), Direction::Minus));
    }
}
