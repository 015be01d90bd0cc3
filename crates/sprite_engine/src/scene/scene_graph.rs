//! Scene graph
//!
//! Nodes live in a slot map. A parent owns the list of its children; a
//! child refers back to its parent by [`NodeId`] only. World transforms are
//! never cached: they are recomputed from the parent chain on demand.
//!
//! Code that cannot borrow the graph (action callbacks) posts edits through
//! [`GraphEdits`]. They are applied at the start of the next
//! [`SceneGraph::update`], before any node updates.

use super::entity::{NodeKind, Updatable};
use crate::foundation::math::{Mat4, Rect, Transform2D, Vec2};
use crate::render::{BatchRenderer, BatchResult, DrawItem, MaterialLibrary, RenderContext, SpriteBatch};
use slotmap::SlotMap;
use std::fmt;
use thiserror::Error;

slotmap::new_key_type! {
    /// Key of a node in a [`SceneGraph`]
    pub struct NodeId;
}

/// Scene graph errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// The node does not exist (or was removed)
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Re-parenting would make a node its own ancestor
    #[error("Making {parent:?} the parent of {node:?} would create a cycle")]
    CycleDetected {
        /// Node being re-parented
        node: NodeId,
        /// Requested parent
        parent: NodeId,
    },
}

/// One entity in the graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Transform relative to the parent
    pub transform: Transform2D,

    /// Hidden nodes are skipped, with their subtree, when drawing. They are
    /// still updated.
    pub visible: bool,

    /// What the node is
    pub kind: NodeKind,

    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    /// Parent node, if any
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

type GraphEdit = Box<dyn FnOnce(&mut SceneGraph)>;

/// Cloneable sender of deferred graph edits
#[derive(Clone)]
pub struct GraphEdits {
    sender: flume::Sender<GraphEdit>,
}

impl GraphEdits {
    /// Post an edit of the whole graph
    pub fn edit(&self, edit: impl FnOnce(&mut SceneGraph) + 'static) {
        if self.sender.send(Box::new(edit)).is_err() {
            log::warn!("Graph edit dropped, the scene graph is gone");
        }
    }

    /// Post an edit of one node. Skipped if the node is removed first.
    pub fn edit_node(&self, node: NodeId, edit: impl FnOnce(&mut SceneNode) + 'static) {
        self.edit(move |graph| match graph.get_mut(node) {
            Some(entry) => edit(entry),
            None => log::debug!("Graph edit skipped, {node:?} was removed"),
        });
    }
}

impl fmt::Debug for GraphEdits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphEdits")
            .field("queued", &self.sender.len())
            .finish()
    }
}

/// Tree of renderable entities
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    edit_sender: flume::Sender<GraphEdit>,
    edit_inbox: flume::Receiver<GraphEdit>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        let (edit_sender, edit_inbox) = flume::unbounded();
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            edit_sender,
            edit_inbox,
        }
    }
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots)
            .field("queued_edits", &self.edit_inbox.len())
            .finish()
    }
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Sender for edits applied at the start of the next update
    pub fn edits(&self) -> GraphEdits {
        GraphEdits {
            sender: self.edit_sender.clone(),
        }
    }

    /// Apply the edits posted so far. Edits posted while applying wait for
    /// the next call. Returns the number applied.
    pub fn apply_edits(&mut self) -> usize {
        let edits: Vec<GraphEdit> = self.edit_inbox.try_iter().collect();
        let applied = edits.len();
        for edit in edits {
            edit(self);
        }
        applied
    }

    /// Add a node without a parent
    pub fn add_root(&mut self, kind: impl Into<NodeKind>, transform: Transform2D) -> NodeId {
        let id = self.insert(kind.into(), transform, None);
        self.roots.push(id);
        id
    }

    /// Add a node under `parent`
    pub fn add_child(&mut self, parent: NodeId, kind: impl Into<NodeKind>, transform: Transform2D) -> Result<NodeId, GraphError> {
        if !self.nodes.contains_key(parent) {
            return Err(GraphError::NodeNotFound(parent));
        }
        let id = self.insert(kind.into(), transform, Some(parent));
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    fn insert(&mut self, kind: NodeKind, transform: Transform2D, parent: Option<NodeId>) -> NodeId {
        self.nodes.insert(SceneNode {
            transform,
            visible: true,
            kind,
            parent,
            children: Vec::new(),
        })
    }

    /// Move `node` under `parent` (or make it a root with `None`).
    ///
    /// Fails with [`GraphError::CycleDetected`] when `parent` is `node` or
    /// one of its descendants; the graph is left unchanged.
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), GraphError> {
        if !self.nodes.contains_key(node) {
            return Err(GraphError::NodeNotFound(node));
        }
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(GraphError::NodeNotFound(parent));
            }
            let mut ancestor = Some(parent);
            while let Some(current) = ancestor {
                if current == node {
                    return Err(GraphError::CycleDetected { node, parent });
                }
                ancestor = self.nodes.get(current).and_then(|n| n.parent);
            }
        }

        self.detach(node);
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.push(node);
                }
            }
            None => self.roots.push(node),
        }
        if let Some(node) = self.nodes.get_mut(node) {
            node.parent = parent;
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        let old_parent = self.nodes.get(node).and_then(|n| n.parent);
        match old_parent {
            Some(old_parent) => {
                if let Some(parent_node) = self.nodes.get_mut(old_parent) {
                    parent_node.children.retain(|&child| child != node);
                }
            }
            None => self.roots.retain(|&root| root != node),
        }
    }

    /// Remove `node` and its whole subtree. Returns the number of nodes removed.
    pub fn remove(&mut self, node: NodeId) -> Result<usize, GraphError> {
        if !self.nodes.contains_key(node) {
            return Err(GraphError::NodeNotFound(node));
        }
        self.detach(node);

        let mut removed = 0;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(entry) = self.nodes.remove(current) {
                stack.extend(entry.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Borrow a node
    pub fn get(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node)
    }

    /// Borrow a node mutably
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(node)
    }

    /// Whether `node` exists
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// `parent.world * local`, walking up to the root
    pub fn world_transform(&self, node: NodeId) -> Result<Mat4, GraphError> {
        let entry = self.nodes.get(node).ok_or(GraphError::NodeNotFound(node))?;
        let mut world = entry.transform.to_matrix();
        let mut ancestor = entry.parent;
        while let Some(current) = ancestor {
            let parent = self.nodes.get(current).ok_or(GraphError::NodeNotFound(current))?;
            world = parent.transform.to_matrix() * world;
            ancestor = parent.parent;
        }
        Ok(world)
    }

    /// Axis-aligned screen rectangle of a sprite node (rotation ignored)
    pub fn sprite_bounds(&self, node: NodeId) -> Option<Rect> {
        let sprite = self.nodes.get(node)?.kind.as_sprite()?;
        let world = self.world_transform(node).ok()?;
        let origin = world.transform_point(&crate::foundation::math::Point3::origin());
        let scale = Vec2::new(world[(0, 0)].hypot(world[(1, 0)]), world[(0, 1)].hypot(world[(1, 1)]));
        let size = sprite.size().component_mul(&scale);
        let pivot = sprite.pivot();
        Some(Rect::new(origin.x - pivot.x * size.x, origin.y - pivot.y * size.y, size.x, size.y))
    }

    /// Apply posted edits, then update every node, visible or not
    pub fn update(&mut self, delta_time: f32) {
        self.apply_edits();
        for node in self.nodes.values_mut() {
            node.kind.update(delta_time);
        }
    }

    /// Bring every node's draw data up to date (text layout)
    pub fn refresh_layout(&mut self) {
        for node in self.nodes.values_mut() {
            node.kind.refresh_layout();
        }
    }

    /// Visible drawables with their world transforms, depth first from the
    /// roots in insertion order
    pub fn collect_draw_items(&self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::new();
        let mut stack: Vec<(NodeId, Mat4)> = self.roots.iter().rev().map(|&root| (root, Mat4::identity())).collect();
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.to_matrix();
            if let Some(drawable) = node.kind.as_drawable() {
                items.push(DrawItem { drawable, world });
            }
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
        items
    }

    /// Draw every visible node into `batch`, which the caller has started
    /// with the material all these nodes share
    pub fn draw(&mut self, ctx: &mut RenderContext, batch: &mut SpriteBatch) -> BatchResult<()> {
        self.refresh_layout();
        for item in self.collect_draw_items() {
            batch.draw(ctx, item.drawable, &item.world)?;
        }
        Ok(())
    }

    /// Draw every visible node, one batch bracket per material
    pub fn render(
        &mut self,
        ctx: &mut RenderContext,
        batch: &mut SpriteBatch,
        renderer: &mut BatchRenderer,
        materials: &MaterialLibrary,
    ) -> BatchResult<()> {
        self.refresh_layout();
        let items = self.collect_draw_items();
        renderer.render_groups(ctx, batch, materials, &items)?;
        Ok(())
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every node and drop queued edits. Senders handed out
    /// earlier are disconnected.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        let (edit_sender, edit_inbox) = flume::unbounded();
        self.edit_sender = edit_sender;
        self.edit_inbox = edit_inbox;
    }
}
