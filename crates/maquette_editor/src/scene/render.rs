//! Render host seam.
//!
//! The renderer owns the actual GPU resources; the editor core only needs a
//! narrow capability surface from it: node bounds for picking, parent links
//! for resolving a primitive hit to its wrapper, appearance get/set for
//! highlighting, deep clone, and synchronous release. `MeshHost` is the
//! in-crate arena implementation used by the facade and the test suite.

use std::collections::HashMap;

use maquette_math::Aabb;

use crate::scene::object::ObjectId;

/// Opaque handle to a render node. Released ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RenderNodeId(pub u64);

impl std::fmt::Display for RenderNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RenderNode({})", self.0)
    }
}

/// Visual state of a node that highlighting overrides and restores.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: [0.8, 0.8, 0.8],
            opacity: 1.0,
        }
    }
}

/// Highlight styles applied by the selection tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    Select,
    Hover,
}

impl Highlight {
    /// Appearance override for this highlight.
    pub fn appearance(&self) -> Appearance {
        match self {
            Highlight::Select => Appearance {
                color: [0.0, 1.0, 0.0],
                opacity: 0.5,
            },
            Highlight::Hover => Appearance {
                color: [0.0, 0.53, 1.0],
                opacity: 0.3,
            },
        }
    }
}

/// Capability surface the editor core consumes from the renderer.
pub trait RenderHost {
    /// Create a node with the given local bounds, optionally parented under
    /// an existing node.
    fn create_node(&mut self, bounds: Aabb, parent: Option<RenderNodeId>) -> RenderNodeId;

    /// Release a node and its descendants, freeing their resources. Must be
    /// synchronous; the node id is invalid afterwards.
    fn release(&mut self, node: RenderNodeId);

    /// Check whether a node id is live.
    fn contains(&self, node: RenderNodeId) -> bool;

    /// Parent link of a node.
    fn node_parent(&self, node: RenderNodeId) -> Option<RenderNodeId>;

    /// Wrapper object bound directly to this node, if any.
    fn wrapper_of(&self, node: RenderNodeId) -> Option<ObjectId>;

    /// Bind a wrapper object id to a node.
    fn bind_wrapper(&mut self, node: RenderNodeId, id: ObjectId);

    /// Deep-clone a node subtree. Wrapper bindings are not copied.
    fn clone_subtree(&mut self, node: RenderNodeId) -> Option<RenderNodeId>;

    /// Local-space bounds of a node.
    fn local_bounds(&self, node: RenderNodeId) -> Option<Aabb>;

    /// Pickable leaf nodes. Ray hits land on these, not on wrappers.
    fn primitives(&self) -> Vec<RenderNodeId>;

    /// Current appearance of a node.
    fn appearance(&self, node: RenderNodeId) -> Option<Appearance>;

    /// Override a node's appearance.
    fn set_appearance(&mut self, node: RenderNodeId, appearance: Appearance);

    /// Walk up the parent chain until a node with a bound wrapper is found.
    fn wrapper_above(&self, node: RenderNodeId) -> Option<ObjectId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(id) = self.wrapper_of(n) {
                return Some(id);
            }
            current = self.node_parent(n);
        }
        None
    }
}

struct MeshNode {
    parent: Option<RenderNodeId>,
    children: Vec<RenderNodeId>,
    wrapper: Option<ObjectId>,
    bounds: Aabb,
    appearance: Appearance,
}

/// Arena-backed render host: nodes in one id-indexed table, links as ids.
pub struct MeshHost {
    nodes: HashMap<RenderNodeId, MeshNode>,
    next_node_id: u64,
}

impl MeshHost {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_node_id: 1,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn next_id(&mut self) -> RenderNodeId {
        let id = RenderNodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    fn clone_recursive(&mut self, node: RenderNodeId, parent: Option<RenderNodeId>) -> Option<RenderNodeId> {
        let (bounds, appearance, children) = {
            let src = self.nodes.get(&node)?;
            (src.bounds, src.appearance, src.children.clone())
        };

        let id = self.next_id();
        self.nodes.insert(
            id,
            MeshNode {
                parent,
                children: Vec::new(),
                wrapper: None,
                bounds,
                appearance,
            },
        );
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.push(id);
            }
        }

        for child in children {
            self.clone_recursive(child, Some(id));
        }

        Some(id)
    }
}

impl Default for MeshHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderHost for MeshHost {
    fn create_node(&mut self, bounds: Aabb, parent: Option<RenderNodeId>) -> RenderNodeId {
        let id = self.next_id();
        self.nodes.insert(
            id,
            MeshNode {
                parent,
                children: Vec::new(),
                wrapper: None,
                bounds,
                appearance: Appearance::default(),
            },
        );
        if let Some(parent) = parent {
            match self.nodes.get_mut(&parent) {
                Some(p) => p.children.push(id),
                None => log::warn!("create_node: unknown parent {parent}"),
            }
        }
        id
    }

    fn release(&mut self, node: RenderNodeId) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        for child in removed.children {
            self.release(child);
        }
        if let Some(parent) = removed.parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|&c| c != node);
            }
        }
    }

    fn contains(&self, node: RenderNodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn node_parent(&self, node: RenderNodeId) -> Option<RenderNodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn wrapper_of(&self, node: RenderNodeId) -> Option<ObjectId> {
        self.nodes.get(&node).and_then(|n| n.wrapper)
    }

    fn bind_wrapper(&mut self, node: RenderNodeId, id: ObjectId) {
        match self.nodes.get_mut(&node) {
            Some(n) => n.wrapper = Some(id),
            None => log::warn!("bind_wrapper: unknown node {node}"),
        }
    }

    fn clone_subtree(&mut self, node: RenderNodeId) -> Option<RenderNodeId> {
        self.clone_recursive(node, None)
    }

    fn local_bounds(&self, node: RenderNodeId) -> Option<Aabb> {
        self.nodes.get(&node).map(|n| n.bounds)
    }

    fn primitives(&self) -> Vec<RenderNodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.children.is_empty())
            .map(|(&id, _)| id)
            .collect()
    }

    fn appearance(&self, node: RenderNodeId) -> Option<Appearance> {
        self.nodes.get(&node).map(|n| n.appearance)
    }

    fn set_appearance(&mut self, node: RenderNodeId, appearance: Appearance) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.appearance = appearance;
        }
    }
}
